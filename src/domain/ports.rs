use crate::domain::model::{DatasetDescriptor, DomainDescriptor};
use crate::domain::params::{DomainParams, FeatureClassParams, RelationshipClassParams, TableParams};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Metadata catalog holding datasets, domains and relationship classes.
///
/// Paths are `<catalog path>/<dataset name>`. Calls are awaited one at a
/// time by the clone engine; implementations need not tolerate concurrent
/// mutation of the same catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn describe(&self, path: &str) -> Result<DatasetDescriptor>;
    async fn exists(&self, path: &str) -> Result<bool>;
    async fn list_domains(&self, catalog_path: &str) -> Result<Vec<DomainDescriptor>>;

    async fn create_feature_class(&self, params: &FeatureClassParams) -> Result<()>;
    async fn create_table(&self, params: &TableParams) -> Result<()>;

    async fn create_domain(&self, params: &DomainParams) -> Result<()>;
    async fn add_coded_value(
        &self,
        catalog_path: &str,
        domain: &str,
        code: &str,
        label: &str,
    ) -> Result<()>;
    async fn set_range_value(&self, catalog_path: &str, domain: &str, min: f64, max: f64)
        -> Result<()>;

    async fn create_relationship_class(&self, params: &RelationshipClassParams) -> Result<()>;
    /// Attributed variant: attribute fields come from an intermediate table.
    async fn create_relationship_class_from_table(
        &self,
        params: &RelationshipClassParams,
        table: &str,
        fields: &[String],
    ) -> Result<()>;

    async fn delete(&self, path: &str) -> Result<()>;
    /// Copies the structure of `template` into a scratch table and returns
    /// the scratch table's path. Callers must `delete` it when done.
    async fn create_transient_table(&self, template: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Step progress and leveled messages. Purely observational.
pub trait ProgressReporter: Send + Sync {
    fn start(&self, total: usize);
    fn set_label(&self, label: &str);
    fn advance(&self);
    fn message(&self, level: MessageLevel, text: &str);

    fn info(&self, text: &str) {
        self.message(MessageLevel::Info, text);
    }

    fn warning(&self, text: &str) {
        self.message(MessageLevel::Warning, text);
    }

    fn error(&self, text: &str) {
        self.message(MessageLevel::Error, text);
    }
}

/// Source of run settings (command line, TOML file).
pub trait ConfigProvider: Send + Sync {
    fn datasets(&self) -> &[String];
    fn target_catalog(&self) -> &str;
    fn overwrite(&self) -> bool;
}
