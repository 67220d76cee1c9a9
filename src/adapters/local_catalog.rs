use crate::adapters::document::{
    feature_class_from_template, relationship_from_params, relationship_target, select_fields,
    table_from_template, transient_table, CatalogDocument, TRANSIENT_WORKSPACE,
};
use crate::domain::model::{join_path, split_path, DatasetDescriptor, DomainDescriptor};
use crate::domain::params::{DomainParams, FeatureClassParams, RelationshipClassParams, TableParams};
use crate::domain::ports::Catalog;
use crate::utils::error::{CloneError, Result};
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Catalog adapter over JSON documents on disk.
///
/// Each catalog is one JSON file; a dataset path is the file path followed
/// by `/<dataset name>`. Staging tables live in process memory under the
/// `memory` workspace and never touch disk.
#[derive(Debug, Default)]
pub struct LocalCatalog {
    transient: Mutex<TransientWorkspace>,
}

#[derive(Debug, Default)]
struct TransientWorkspace {
    document: CatalogDocument,
    counter: usize,
}

impl LocalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes an empty catalog document, failing if one already exists.
    pub fn create_catalog<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(CloneError::AlreadyExistsError {
                path: path.display().to_string(),
            });
        }
        save_document(path, &CatalogDocument::new())
    }

    pub fn load(catalog_path: &str) -> Result<CatalogDocument> {
        let path = Path::new(catalog_path);
        if !path.is_file() {
            return Err(CloneError::NotFoundError {
                path: catalog_path.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn transient(&self) -> MutexGuard<'_, TransientWorkspace> {
        self.transient
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn resolve(&self, path: &str) -> Result<DatasetDescriptor> {
        let (catalog_path, name) = split_path(path).ok_or_else(|| CloneError::NotFoundError {
            path: path.to_string(),
        })?;
        if catalog_path == TRANSIENT_WORKSPACE {
            return self.transient().document.describe(catalog_path, name);
        }
        Self::load(catalog_path)?.describe(catalog_path, name)
    }

    /// Load, mutate, save. The document is only written when `apply` succeeds.
    fn update<F>(&self, catalog_path: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut CatalogDocument) -> Result<()>,
    {
        let mut document = Self::load(catalog_path)?;
        apply(&mut document)?;
        tracing::debug!("Saving catalog {}", catalog_path);
        save_document(Path::new(catalog_path), &document)
    }
}

fn save_document(path: &Path, document: &CatalogDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(document)?)?;
    Ok(())
}

#[async_trait]
impl Catalog for LocalCatalog {
    async fn describe(&self, path: &str) -> Result<DatasetDescriptor> {
        self.resolve(path)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        match split_path(path) {
            Some((catalog_path, name)) if catalog_path == TRANSIENT_WORKSPACE => {
                Ok(self.transient().document.contains(name))
            }
            Some((catalog_path, name)) if Path::new(catalog_path).is_file() => {
                Ok(Self::load(catalog_path)?.contains(name))
            }
            _ => Ok(Path::new(path).is_file()),
        }
    }

    async fn list_domains(&self, catalog_path: &str) -> Result<Vec<DomainDescriptor>> {
        Ok(Self::load(catalog_path)?.domains)
    }

    async fn create_feature_class(&self, params: &FeatureClassParams) -> Result<()> {
        let template = self.resolve(&params.template)?;
        let spatial = self.resolve(&params.spatial_reference)?;
        let dataset = feature_class_from_template(params, &template, &spatial)?;
        self.update(&params.catalog_path, |doc| {
            doc.insert_dataset(&params.catalog_path, dataset)
        })
    }

    async fn create_table(&self, params: &TableParams) -> Result<()> {
        let template = self.resolve(&params.template)?;
        let dataset = table_from_template(params, &template);
        self.update(&params.catalog_path, |doc| {
            doc.insert_dataset(&params.catalog_path, dataset)
        })
    }

    async fn create_domain(&self, params: &DomainParams) -> Result<()> {
        self.update(&params.catalog_path, |doc| doc.create_domain(params))
    }

    async fn add_coded_value(
        &self,
        catalog_path: &str,
        domain: &str,
        code: &str,
        label: &str,
    ) -> Result<()> {
        self.update(catalog_path, |doc| {
            doc.add_coded_value(catalog_path, domain, code, label)
        })
    }

    async fn set_range_value(
        &self,
        catalog_path: &str,
        domain: &str,
        min: f64,
        max: f64,
    ) -> Result<()> {
        self.update(catalog_path, |doc| {
            doc.set_range_value(catalog_path, domain, min, max)
        })
    }

    async fn create_relationship_class(&self, params: &RelationshipClassParams) -> Result<()> {
        self.resolve(&params.origin_table)?;
        self.resolve(&params.destination_table)?;
        let (catalog_path, _) = relationship_target(params)?;
        let dataset = relationship_from_params(params, Vec::new())?;
        self.update(catalog_path, |doc| doc.insert_dataset(catalog_path, dataset))
    }

    async fn create_relationship_class_from_table(
        &self,
        params: &RelationshipClassParams,
        table: &str,
        fields: &[String],
    ) -> Result<()> {
        self.resolve(&params.origin_table)?;
        self.resolve(&params.destination_table)?;
        let staging = self.resolve(table)?;
        let (catalog_path, _) = relationship_target(params)?;
        let dataset = relationship_from_params(params, select_fields(&staging, fields)?)?;
        self.update(catalog_path, |doc| doc.insert_dataset(catalog_path, dataset))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let (catalog_path, name) = split_path(path).ok_or_else(|| CloneError::NotFoundError {
            path: path.to_string(),
        })?;
        if catalog_path == TRANSIENT_WORKSPACE {
            return self
                .transient()
                .document
                .remove_dataset(catalog_path, name)
                .map(|_| ());
        }
        self.update(catalog_path, |doc| {
            doc.remove_dataset(catalog_path, name).map(|_| ())
        })
    }

    async fn create_transient_table(&self, template: &str) -> Result<String> {
        let source = self.resolve(template)?;
        let mut workspace = self.transient();
        workspace.counter += 1;
        let name = format!("relClass_{}", workspace.counter);
        let path = join_path(TRANSIENT_WORKSPACE, &name);
        workspace
            .document
            .insert_dataset(TRANSIENT_WORKSPACE, transient_table(name, &source))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DatasetKind, FieldDescriptor, FieldType, TableDescriptor};
    use tempfile::TempDir;

    fn write_catalog(dir: &TempDir, file: &str, document: &CatalogDocument) -> String {
        let path = dir.path().join(file);
        save_document(&path, document).unwrap();
        path.to_str().unwrap().replace('\\', "/")
    }

    #[tokio::test]
    async fn test_create_catalog_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("target.json");

        LocalCatalog::create_catalog(&path).unwrap();
        assert!(LocalCatalog::create_catalog(&path).is_err());
        assert!(LocalCatalog::load(path.to_str().unwrap()).unwrap().datasets.is_empty());
    }

    #[tokio::test]
    async fn test_delete_persists_to_disk() {
        let dir = TempDir::new().unwrap();
        let document = CatalogDocument::new().with_dataset(DatasetDescriptor {
            name: "Owners".to_string(),
            catalog_path: String::new(),
            kind: DatasetKind::Table(TableDescriptor {
                fields: vec![FieldDescriptor::new("NAME", FieldType::String)],
            }),
        });
        let catalog_path = write_catalog(&dir, "target.json", &document);
        let catalog = LocalCatalog::new();
        let dataset = join_path(&catalog_path, "Owners");

        assert!(catalog.exists(&dataset).await.unwrap());
        catalog.delete(&dataset).await.unwrap();

        assert!(!catalog.exists(&dataset).await.unwrap());
        assert!(LocalCatalog::load(&catalog_path).unwrap().datasets.is_empty());
    }

    #[tokio::test]
    async fn test_missing_catalog_is_not_found() {
        let catalog = LocalCatalog::new();
        let err = catalog.describe("/no/such/catalog.json/Owners").await.unwrap_err();
        assert!(matches!(err, CloneError::NotFoundError { .. }));
    }
}
