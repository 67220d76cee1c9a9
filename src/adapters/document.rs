use crate::domain::model::{
    join_path, split_path, unqualified_name, DatasetDescriptor, DatasetKind, DomainDescriptor,
    DomainKind, FeatureClassDescriptor, FeatureType, FieldDescriptor, KeyPair,
    RelationshipClassDescriptor, TableDescriptor,
};
use crate::domain::params::{
    DomainParams, FeatureClassParams, RelationshipClassParams, RelationshipTypeKeyword,
    TableParams,
};
use crate::utils::error::{CloneError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Catalog path under which transient staging tables are created.
pub const TRANSIENT_WORKSPACE: &str = "memory";

/// Contents of one catalog, as persisted by the catalog adapters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub datasets: Vec<DatasetDescriptor>,
    #[serde(default)]
    pub domains: Vec<DomainDescriptor>,
    /// Dataset names that cannot be deleted (schema locks held elsewhere).
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub locks: BTreeSet<String>,
}

impl CatalogDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, dataset: DatasetDescriptor) -> Self {
        self.datasets.push(dataset);
        self
    }

    pub fn with_domain(mut self, domain: DomainDescriptor) -> Self {
        self.domains.push(domain);
        self
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.datasets
            .iter()
            .position(|d| d.name == name)
            .or_else(|| {
                self.datasets
                    .iter()
                    .position(|d| d.unqualified_name() == unqualified_name(name))
            })
    }

    /// Looks a dataset up by its exact name, falling back to the unqualified name.
    pub fn dataset(&self, name: &str) -> Option<&DatasetDescriptor> {
        self.position(name).map(|index| &self.datasets[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns a copy stamped with the catalog path it was read from.
    pub fn describe(&self, catalog_path: &str, name: &str) -> Result<DatasetDescriptor> {
        let mut dataset = self
            .dataset(name)
            .cloned()
            .ok_or_else(|| CloneError::NotFoundError {
                path: join_path(catalog_path, name),
            })?;
        dataset.catalog_path = catalog_path.to_string();
        Ok(dataset)
    }

    pub fn insert_dataset(
        &mut self,
        catalog_path: &str,
        mut dataset: DatasetDescriptor,
    ) -> Result<()> {
        if self.contains(&dataset.name) {
            return Err(CloneError::AlreadyExistsError {
                path: join_path(catalog_path, &dataset.name),
            });
        }
        dataset.catalog_path.clear();
        self.datasets.push(dataset);
        Ok(())
    }

    pub fn remove_dataset(&mut self, catalog_path: &str, name: &str) -> Result<DatasetDescriptor> {
        let path = join_path(catalog_path, name);
        let index = self
            .position(name)
            .ok_or_else(|| CloneError::NotFoundError { path: path.clone() })?;
        if self.locks.contains(&self.datasets[index].name) {
            return Err(CloneError::LockedError { path });
        }
        Ok(self.datasets.remove(index))
    }

    pub fn domain(&self, name: &str) -> Option<&DomainDescriptor> {
        self.domains.iter().find(|d| d.name == name)
    }

    fn domain_mut(&mut self, catalog_path: &str, name: &str) -> Result<&mut DomainDescriptor> {
        self.domains
            .iter_mut()
            .find(|d| d.name == name)
            .ok_or_else(|| CloneError::NotFoundError {
                path: format!("{} (domain {})", catalog_path, name),
            })
    }

    pub fn create_domain(&mut self, params: &DomainParams) -> Result<()> {
        if self.domain(&params.name).is_some() {
            return Err(CloneError::AlreadyExistsError {
                path: format!("{} (domain {})", params.catalog_path, params.name),
            });
        }
        self.domains.push(DomainDescriptor {
            name: params.name.clone(),
            description: params.description.clone(),
            field_type: params.field_type.into(),
            domain_type: params.domain_type.into(),
            split_policy: params.split_policy.into(),
            merge_policy: params.merge_policy.into(),
            coded_values: Default::default(),
            range: None,
        });
        Ok(())
    }

    pub fn add_coded_value(
        &mut self,
        catalog_path: &str,
        domain: &str,
        code: &str,
        label: &str,
    ) -> Result<()> {
        let target = self.domain_mut(catalog_path, domain)?;
        if target.domain_type != DomainKind::CodedValue {
            return Err(CloneError::catalog(format!(
                "domain {} is not a coded value domain",
                domain
            )));
        }
        target.coded_values.insert(code.to_string(), label.to_string());
        Ok(())
    }

    pub fn set_range_value(
        &mut self,
        catalog_path: &str,
        domain: &str,
        min: f64,
        max: f64,
    ) -> Result<()> {
        let target = self.domain_mut(catalog_path, domain)?;
        if target.domain_type != DomainKind::Range {
            return Err(CloneError::catalog(format!(
                "domain {} is not a range domain",
                domain
            )));
        }
        if min > max {
            return Err(CloneError::catalog(format!(
                "invalid range {}..{} for domain {}",
                min, max, domain
            )));
        }
        target.range = Some((min, max));
        Ok(())
    }
}

/// Builds a feature class from its template datasets.
pub fn feature_class_from_template(
    params: &FeatureClassParams,
    template: &DatasetDescriptor,
    spatial_template: &DatasetDescriptor,
) -> Result<DatasetDescriptor> {
    let (has_m, has_z) = match &template.kind {
        DatasetKind::FeatureClass(fc) => (fc.has_m, fc.has_z),
        DatasetKind::Table(_) => (false, false),
        _ => {
            return Err(CloneError::catalog(format!(
                "{} cannot be used as a feature class template",
                params.template
            )))
        }
    };
    let spatial_reference = match &spatial_template.kind {
        DatasetKind::FeatureClass(fc) => fc.spatial_reference.clone(),
        _ => None,
    };

    Ok(DatasetDescriptor {
        name: params.name.clone(),
        catalog_path: String::new(),
        kind: DatasetKind::FeatureClass(FeatureClassDescriptor {
            shape_type: params.geometry.shape_type(),
            feature_type: FeatureType::Simple,
            has_m,
            has_z,
            spatial_reference,
            fields: template.fields().to_vec(),
        }),
    })
}

pub fn table_from_template(
    params: &TableParams,
    template: &DatasetDescriptor,
) -> DatasetDescriptor {
    DatasetDescriptor {
        name: params.name.clone(),
        catalog_path: String::new(),
        kind: DatasetKind::Table(TableDescriptor {
            fields: template.fields().to_vec(),
        }),
    }
}

/// Staging table carrying a dataset's field structure.
pub fn transient_table(name: String, template: &DatasetDescriptor) -> DatasetDescriptor {
    DatasetDescriptor {
        name,
        catalog_path: String::new(),
        kind: DatasetKind::Table(TableDescriptor {
            fields: template.fields().to_vec(),
        }),
    }
}

/// Target catalog and relationship name taken from `params.out_path`.
pub fn relationship_target(params: &RelationshipClassParams) -> Result<(&str, &str)> {
    split_path(&params.out_path).ok_or_else(|| {
        CloneError::catalog(format!("invalid relationship class path {}", params.out_path))
    })
}

pub fn relationship_from_params(
    params: &RelationshipClassParams,
    attribute_fields: Vec<FieldDescriptor>,
) -> Result<DatasetDescriptor> {
    let (_, name) = relationship_target(params)?;
    let endpoint = |path: &str| -> Result<String> {
        split_path(path)
            .map(|(_, table)| table.to_string())
            .ok_or_else(|| CloneError::catalog(format!("invalid endpoint path {}", path)))
    };
    let destination_keys = match (
        &params.destination_primary_key,
        &params.destination_foreign_key,
    ) {
        (Some(primary), Some(foreign)) => Some(KeyPair::new(primary, foreign)),
        _ => None,
    };

    Ok(DatasetDescriptor {
        name: name.to_string(),
        catalog_path: String::new(),
        kind: DatasetKind::RelationshipClass(RelationshipClassDescriptor {
            origin_class_names: vec![endpoint(&params.origin_table)?],
            destination_class_names: vec![endpoint(&params.destination_table)?],
            is_composite: params.relationship_type == RelationshipTypeKeyword::Composite,
            forward_path_label: params.forward_label.clone(),
            backward_path_label: params.backward_label.clone(),
            notification: params.message_direction.into(),
            cardinality: params.cardinality.into(),
            is_attributed: params.attributed,
            origin_keys: KeyPair::new(&params.origin_primary_key, &params.origin_foreign_key),
            destination_keys,
            relationship_rules: Vec::new(),
            fields: attribute_fields,
        }),
    })
}

/// Keeps the staging table's fields named in `fields`, in that order.
pub fn select_fields(table: &DatasetDescriptor, fields: &[String]) -> Result<Vec<FieldDescriptor>> {
    fields
        .iter()
        .map(|name| {
            table
                .fields()
                .iter()
                .find(|f| &f.name == name)
                .cloned()
                .ok_or_else(|| {
                    CloneError::catalog(format!("field {} not found in {}", name, table.name))
                })
        })
        .collect()
}
