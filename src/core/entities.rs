use crate::core::context::CloneContext;
use crate::core::domains::DomainCloner;
use crate::core::existence::{self, Resolution};
use crate::domain::model::{DatasetDescriptor, FeatureClassDescriptor, FeatureType};
use crate::domain::outcome::CloneOutcome;
use crate::domain::params::{FeatureClassParams, GeometryKeyword, TableParams, TemplateProperty};
use crate::domain::ports::{Catalog, ProgressReporter};
use crate::utils::error::{CloneError, Result};

/// Validates a feature class and translates it into creation parameters.
///
/// Schema, M/Z and spatial reference all come from the source dataset used
/// as a template rather than being itemized field by field.
pub fn feature_class_params(
    dataset: &DatasetDescriptor,
    feature_class: &FeatureClassDescriptor,
    target_catalog: &str,
) -> Result<FeatureClassParams> {
    let geometry = GeometryKeyword::from_shape(feature_class.shape_type).ok_or_else(|| {
        CloneError::precondition(&dataset.name, "the shape type is not defined")
    })?;
    if feature_class.feature_type != FeatureType::Simple {
        return Err(CloneError::precondition(
            &dataset.name,
            "it is not a simple feature class",
        ));
    }

    let template = dataset.source_path();
    Ok(FeatureClassParams {
        catalog_path: target_catalog.to_string(),
        name: dataset.unqualified_name().to_string(),
        geometry,
        spatial_reference: template.clone(),
        template,
        has_m: TemplateProperty::SameAsTemplate,
        has_z: TemplateProperty::SameAsTemplate,
    })
}

pub fn table_params(dataset: &DatasetDescriptor, target_catalog: &str) -> TableParams {
    TableParams {
        catalog_path: target_catalog.to_string(),
        name: dataset.unqualified_name().to_string(),
        template: dataset.source_path(),
    }
}

pub async fn clone_feature_class<C, R>(
    ctx: &CloneContext<'_, C, R>,
    domains: &mut DomainCloner,
    dataset: &DatasetDescriptor,
    feature_class: &FeatureClassDescriptor,
) -> Result<CloneOutcome>
where
    C: Catalog + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let params = feature_class_params(dataset, feature_class, ctx.target_catalog)?;
    domains.clone_domains(ctx, dataset).await?;

    if let Resolution::Skip { reason } = existence::resolve(ctx, &params.name).await? {
        return Ok(CloneOutcome::Skipped { reason });
    }

    ctx.catalog.create_feature_class(&params).await?;
    ctx.reporter.info(&format!("Cloned Feature Class {}", params.name));
    Ok(CloneOutcome::Cloned)
}

pub async fn clone_table<C, R>(
    ctx: &CloneContext<'_, C, R>,
    domains: &mut DomainCloner,
    dataset: &DatasetDescriptor,
) -> Result<CloneOutcome>
where
    C: Catalog + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let params = table_params(dataset, ctx.target_catalog);
    domains.clone_domains(ctx, dataset).await?;

    if let Resolution::Skip { reason } = existence::resolve(ctx, &params.name).await? {
        return Ok(CloneOutcome::Skipped { reason });
    }

    ctx.catalog.create_table(&params).await?;
    ctx.reporter.info(&format!("Cloned Table {}", params.name));
    Ok(CloneOutcome::Cloned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CatalogCall, CatalogDocument, MemoryCatalog, RecordingReporter};
    use crate::domain::model::{
        DatasetKind, FieldDescriptor, FieldType, ShapeType, TableDescriptor,
    };
    use crate::domain::ports::MessageLevel;

    fn parcels(
        shape_type: ShapeType,
        feature_type: FeatureType,
    ) -> (DatasetDescriptor, FeatureClassDescriptor) {
        let fc = FeatureClassDescriptor {
            shape_type,
            feature_type,
            has_m: false,
            has_z: true,
            spatial_reference: Some("EPSG:2950".to_string()),
            fields: vec![
                FieldDescriptor::new("OBJECTID", FieldType::Oid),
                FieldDescriptor::new("SHAPE", FieldType::Geometry),
                FieldDescriptor::new("PID", FieldType::String),
            ],
        };
        let dataset = DatasetDescriptor {
            name: "gis.owner.Parcels".to_string(),
            catalog_path: "src".to_string(),
            kind: DatasetKind::FeatureClass(fc.clone()),
        };
        (dataset, fc)
    }

    fn catalog_with(dataset: &DatasetDescriptor) -> MemoryCatalog {
        let mut stored = dataset.clone();
        stored.catalog_path.clear();
        MemoryCatalog::new()
            .with_dataset("src", stored)
            .with_catalog("tgt", CatalogDocument::new())
    }

    fn context<'a>(
        catalog: &'a MemoryCatalog,
        reporter: &'a RecordingReporter,
        overwrite: bool,
    ) -> CloneContext<'a, MemoryCatalog, RecordingReporter> {
        CloneContext {
            catalog,
            reporter,
            target_catalog: "tgt",
            overwrite,
        }
    }

    #[test]
    fn test_feature_class_params_use_source_as_template() {
        let (dataset, fc) = parcels(ShapeType::Polygon, FeatureType::Simple);
        let params = feature_class_params(&dataset, &fc, "tgt").unwrap();

        assert_eq!(params.name, "Parcels");
        assert_eq!(params.geometry, GeometryKeyword::Polygon);
        assert_eq!(params.template, "src/gis.owner.Parcels");
        assert_eq!(params.spatial_reference, params.template);
    }

    #[tokio::test]
    async fn test_undefined_shape_fails_without_creation() {
        let (dataset, fc) = parcels(ShapeType::Any, FeatureType::Simple);
        let catalog = catalog_with(&dataset);
        let reporter = RecordingReporter::new();
        let mut domains = DomainCloner::new();

        let ctx = context(&catalog, &reporter, false);
        let err = clone_feature_class(&ctx, &mut domains, &dataset, &fc)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("shape type is not defined"));
        assert!(catalog.journal().is_empty());
    }

    #[tokio::test]
    async fn test_annotation_feature_class_is_rejected() {
        let (dataset, fc) = parcels(ShapeType::Polygon, FeatureType::Annotation);
        let catalog = catalog_with(&dataset);
        let reporter = RecordingReporter::new();
        let mut domains = DomainCloner::new();

        let ctx = context(&catalog, &reporter, false);
        let err = clone_feature_class(&ctx, &mut domains, &dataset, &fc)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("not a simple feature class"));
        assert!(catalog.journal().is_empty());
    }

    #[tokio::test]
    async fn test_feature_class_inherits_template_structure() {
        let (dataset, fc) = parcels(ShapeType::Polygon, FeatureType::Simple);
        let catalog = catalog_with(&dataset);
        let reporter = RecordingReporter::new();
        let mut domains = DomainCloner::new();

        let ctx = context(&catalog, &reporter, false);
        let outcome = clone_feature_class(&ctx, &mut domains, &dataset, &fc)
            .await
            .unwrap();

        assert_eq!(outcome, CloneOutcome::Cloned);
        let created = catalog.dataset("tgt/Parcels").unwrap();
        match created.kind {
            DatasetKind::FeatureClass(copy) => {
                assert_eq!(copy.shape_type, ShapeType::Polygon);
                assert!(copy.has_z);
                assert_eq!(copy.spatial_reference.as_deref(), Some("EPSG:2950"));
                assert_eq!(copy.fields, fc.fields);
            }
            other => panic!("expected a feature class, got {:?}", other),
        }
        assert_eq!(
            reporter.messages(MessageLevel::Info),
            vec!["Cloned Feature Class Parcels"]
        );
    }

    #[tokio::test]
    async fn test_existing_table_is_skipped_with_warning() {
        let dataset = DatasetDescriptor {
            name: "Owners".to_string(),
            catalog_path: "src".to_string(),
            kind: DatasetKind::Table(TableDescriptor {
                fields: vec![FieldDescriptor::new("NAME", FieldType::String)],
            }),
        };
        let existing = DatasetDescriptor {
            name: "Owners".to_string(),
            catalog_path: String::new(),
            kind: DatasetKind::Table(TableDescriptor { fields: vec![] }),
        };
        let catalog = catalog_with(&dataset).with_dataset("tgt", existing.clone());
        let reporter = RecordingReporter::new();
        let mut domains = DomainCloner::new();

        let outcome = clone_table(&context(&catalog, &reporter, false), &mut domains, &dataset)
            .await
            .unwrap();

        assert!(matches!(outcome, CloneOutcome::Skipped { .. }));
        assert_eq!(catalog.document("tgt").unwrap().datasets, vec![existing]);
        assert_eq!(reporter.messages(MessageLevel::Warning).len(), 1);
        assert!(reporter.messages(MessageLevel::Error).is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_table() {
        let dataset = DatasetDescriptor {
            name: "Owners".to_string(),
            catalog_path: "src".to_string(),
            kind: DatasetKind::Table(TableDescriptor {
                fields: vec![FieldDescriptor::new("NAME", FieldType::String)],
            }),
        };
        let stale = DatasetDescriptor {
            name: "Owners".to_string(),
            catalog_path: String::new(),
            kind: DatasetKind::Table(TableDescriptor { fields: vec![] }),
        };
        let catalog = catalog_with(&dataset).with_dataset("tgt", stale);
        let reporter = RecordingReporter::new();
        let mut domains = DomainCloner::new();

        let outcome = clone_table(&context(&catalog, &reporter, true), &mut domains, &dataset)
            .await
            .unwrap();

        assert_eq!(outcome, CloneOutcome::Cloned);
        assert_eq!(
            catalog.journal(),
            vec![
                CatalogCall::Delete("tgt/Owners".to_string()),
                CatalogCall::CreateTable("tgt/Owners".to_string()),
            ]
        );
        assert_eq!(catalog.dataset("tgt/Owners").unwrap().fields().len(), 1);
    }
}
