// Adapters layer: concrete catalogs and progress reporters behind the domain ports.

pub mod document;
pub mod local_catalog;
pub mod memory_catalog;
pub mod reporter;

pub use document::CatalogDocument;
pub use local_catalog::LocalCatalog;
pub use memory_catalog::{CatalogCall, MemoryCatalog};
pub use reporter::{ProgressEvent, RecordingReporter, TracingReporter};
