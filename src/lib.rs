pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalCatalog, MemoryCatalog, TracingReporter};
pub use config::toml_config::TomlConfig;
pub use core::engine::{CloneEngine, ClonePlan, CloneRequest};
pub use core::report::RunReport;
pub use utils::error::{CloneError, Result};
