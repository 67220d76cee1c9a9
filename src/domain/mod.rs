// Domain layer: descriptors, creation parameters, per-dataset outcomes and
// the ports the clone engine is written against.

pub mod model;
pub mod outcome;
pub mod params;
pub mod ports;
