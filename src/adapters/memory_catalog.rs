use crate::adapters::document::{
    feature_class_from_template, relationship_from_params, relationship_target, select_fields,
    table_from_template, transient_table, CatalogDocument, TRANSIENT_WORKSPACE,
};
use crate::domain::model::{join_path, split_path, DatasetDescriptor, DomainDescriptor};
use crate::domain::params::{DomainParams, FeatureClassParams, RelationshipClassParams, TableParams};
use crate::domain::ports::Catalog;
use crate::utils::error::{CloneError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// A catalog call as seen by the in-memory adapter, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    Describe(String),
    CreateFeatureClass(String),
    CreateTable(String),
    CreateDomain { catalog: String, name: String },
    AddCodedValue { domain: String, code: String },
    SetRangeValue { domain: String },
    CreateRelationshipClass { path: String, attributed: bool },
    Delete(String),
    CreateTransientTable(String),
}

#[derive(Debug, Default)]
struct MemoryState {
    catalogs: BTreeMap<String, CatalogDocument>,
    journal: Vec<CatalogCall>,
    faults: BTreeSet<String>,
    transient_counter: usize,
}

impl MemoryState {
    fn check_fault(&self, path: &str) -> Result<()> {
        if self.faults.contains(path) {
            return Err(CloneError::catalog(format!("injected fault on {}", path)));
        }
        Ok(())
    }

    fn catalog(&self, catalog_path: &str) -> Result<&CatalogDocument> {
        self.catalogs
            .get(catalog_path)
            .ok_or_else(|| CloneError::NotFoundError {
                path: catalog_path.to_string(),
            })
    }

    fn catalog_mut(&mut self, catalog_path: &str) -> Result<&mut CatalogDocument> {
        self.catalogs
            .get_mut(catalog_path)
            .ok_or_else(|| CloneError::NotFoundError {
                path: catalog_path.to_string(),
            })
    }

    fn resolve(&self, path: &str) -> Result<DatasetDescriptor> {
        let (catalog_path, name) = split_path(path).ok_or_else(|| CloneError::NotFoundError {
            path: path.to_string(),
        })?;
        self.catalog(catalog_path)?.describe(catalog_path, name)
    }

    fn insert(&mut self, catalog_path: &str, dataset: DatasetDescriptor) -> Result<()> {
        self.catalog_mut(catalog_path)?.insert_dataset(catalog_path, dataset)
    }
}

/// Catalog adapter holding every catalog in process memory.
///
/// Keeps a journal of describe and mutation calls, supports schema locks and
/// injected faults, which makes it the adapter of choice for exercising the
/// clone engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        let catalog = Self::default();
        catalog
            .state()
            .catalogs
            .insert(TRANSIENT_WORKSPACE.to_string(), CatalogDocument::new());
        catalog
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_catalog(self, catalog_path: &str, document: CatalogDocument) -> Self {
        self.state()
            .catalogs
            .insert(catalog_path.to_string(), document);
        self
    }

    pub fn with_dataset(self, catalog_path: &str, dataset: DatasetDescriptor) -> Self {
        self.state()
            .catalogs
            .entry(catalog_path.to_string())
            .or_default()
            .datasets
            .push(dataset);
        self
    }

    pub fn with_domain(self, catalog_path: &str, domain: DomainDescriptor) -> Self {
        self.state()
            .catalogs
            .entry(catalog_path.to_string())
            .or_default()
            .domains
            .push(domain);
        self
    }

    /// Holds a schema lock so that deleting the dataset fails.
    pub fn lock(&self, path: &str) {
        if let Some((catalog_path, name)) = split_path(path) {
            if let Some(doc) = self.state().catalogs.get_mut(catalog_path) {
                doc.locks.insert(name.to_string());
            }
        }
    }

    /// Makes every call addressing `path` fail with a catalog error.
    pub fn inject_fault(&self, path: &str) {
        self.state().faults.insert(path.to_string());
    }

    pub fn journal(&self) -> Vec<CatalogCall> {
        self.state().journal.clone()
    }

    pub fn document(&self, catalog_path: &str) -> Option<CatalogDocument> {
        self.state().catalogs.get(catalog_path).cloned()
    }

    pub fn dataset(&self, path: &str) -> Option<DatasetDescriptor> {
        self.state().resolve(path).ok()
    }

    pub fn domain(&self, catalog_path: &str, name: &str) -> Option<DomainDescriptor> {
        self.state()
            .catalogs
            .get(catalog_path)
            .and_then(|doc| doc.domain(name).cloned())
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn describe(&self, path: &str) -> Result<DatasetDescriptor> {
        let mut state = self.state();
        state.journal.push(CatalogCall::Describe(path.to_string()));
        state.check_fault(path)?;
        state.resolve(path)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let state = self.state();
        state.check_fault(path)?;
        Ok(match split_path(path) {
            Some((catalog_path, name)) => state
                .catalogs
                .get(catalog_path)
                .is_some_and(|doc| doc.contains(name)),
            None => state.catalogs.contains_key(path),
        })
    }

    async fn list_domains(&self, catalog_path: &str) -> Result<Vec<DomainDescriptor>> {
        let state = self.state();
        state.check_fault(catalog_path)?;
        Ok(state.catalog(catalog_path)?.domains.clone())
    }

    async fn create_feature_class(&self, params: &FeatureClassParams) -> Result<()> {
        let path = join_path(&params.catalog_path, &params.name);
        let mut state = self.state();
        state.journal.push(CatalogCall::CreateFeatureClass(path.clone()));
        state.check_fault(&path)?;
        let template = state.resolve(&params.template)?;
        let spatial = state.resolve(&params.spatial_reference)?;
        let dataset = feature_class_from_template(params, &template, &spatial)?;
        state.insert(&params.catalog_path, dataset)
    }

    async fn create_table(&self, params: &TableParams) -> Result<()> {
        let path = join_path(&params.catalog_path, &params.name);
        let mut state = self.state();
        state.journal.push(CatalogCall::CreateTable(path.clone()));
        state.check_fault(&path)?;
        let template = state.resolve(&params.template)?;
        state.insert(&params.catalog_path, table_from_template(params, &template))
    }

    async fn create_domain(&self, params: &DomainParams) -> Result<()> {
        let mut state = self.state();
        state.journal.push(CatalogCall::CreateDomain {
            catalog: params.catalog_path.clone(),
            name: params.name.clone(),
        });
        state.check_fault(&join_path(&params.catalog_path, &params.name))?;
        state.catalog_mut(&params.catalog_path)?.create_domain(params)
    }

    async fn add_coded_value(
        &self,
        catalog_path: &str,
        domain: &str,
        code: &str,
        label: &str,
    ) -> Result<()> {
        let mut state = self.state();
        state.journal.push(CatalogCall::AddCodedValue {
            domain: domain.to_string(),
            code: code.to_string(),
        });
        state
            .catalog_mut(catalog_path)?
            .add_coded_value(catalog_path, domain, code, label)
    }

    async fn set_range_value(
        &self,
        catalog_path: &str,
        domain: &str,
        min: f64,
        max: f64,
    ) -> Result<()> {
        let mut state = self.state();
        state.journal.push(CatalogCall::SetRangeValue {
            domain: domain.to_string(),
        });
        state
            .catalog_mut(catalog_path)?
            .set_range_value(catalog_path, domain, min, max)
    }

    async fn create_relationship_class(&self, params: &RelationshipClassParams) -> Result<()> {
        let mut state = self.state();
        state.journal.push(CatalogCall::CreateRelationshipClass {
            path: params.out_path.clone(),
            attributed: false,
        });
        state.check_fault(&params.out_path)?;
        state.resolve(&params.origin_table)?;
        state.resolve(&params.destination_table)?;
        let (catalog_path, _) = relationship_target(params)?;
        let dataset = relationship_from_params(params, Vec::new())?;
        state.insert(catalog_path, dataset)
    }

    async fn create_relationship_class_from_table(
        &self,
        params: &RelationshipClassParams,
        table: &str,
        fields: &[String],
    ) -> Result<()> {
        let mut state = self.state();
        state.journal.push(CatalogCall::CreateRelationshipClass {
            path: params.out_path.clone(),
            attributed: true,
        });
        state.check_fault(&params.out_path)?;
        state.resolve(&params.origin_table)?;
        state.resolve(&params.destination_table)?;
        let staging = state.resolve(table)?;
        let (catalog_path, _) = relationship_target(params)?;
        let dataset = relationship_from_params(params, select_fields(&staging, fields)?)?;
        state.insert(catalog_path, dataset)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let mut state = self.state();
        state.journal.push(CatalogCall::Delete(path.to_string()));
        state.check_fault(path)?;
        let (catalog_path, name) = split_path(path).ok_or_else(|| CloneError::NotFoundError {
            path: path.to_string(),
        })?;
        state
            .catalog_mut(catalog_path)?
            .remove_dataset(catalog_path, name)
            .map(|_| ())
    }

    async fn create_transient_table(&self, template: &str) -> Result<String> {
        let mut state = self.state();
        state.check_fault(template)?;
        let source = state.resolve(template)?;
        state.transient_counter += 1;
        let name = format!("relClass_{}", state.transient_counter);
        let path = join_path(TRANSIENT_WORKSPACE, &name);
        state.journal.push(CatalogCall::CreateTransientTable(path.clone()));
        state.insert(TRANSIENT_WORKSPACE, transient_table(name, &source))?;
        Ok(path)
    }
}
