pub mod context;
pub mod domains;
pub mod engine;
pub mod entities;
pub mod existence;
pub mod relationships;
pub mod report;

pub use crate::domain::outcome::{BatchResult, CloneOutcome, CloneStatus, DatasetResult};
pub use crate::domain::ports::{Catalog, ConfigProvider, ProgressReporter};
pub use crate::utils::error::Result;
