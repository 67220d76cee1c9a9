use crate::core::context::CloneContext;
use crate::domain::model::{join_path, DatasetDescriptor, RelationshipClassDescriptor};
use crate::domain::outcome::CloneOutcome;
use crate::domain::params::{
    CardinalityKeyword, MessageDirection, RelationshipClassParams, RelationshipTypeKeyword,
};
use crate::domain::ports::{Catalog, ProgressReporter};
use crate::utils::error::{CloneError, Result};

/// Translates a relationship class into creation parameters against the
/// target catalog. Endpoints are addressed by their unqualified names.
pub fn relationship_params(
    dataset: &DatasetDescriptor,
    relationship: &RelationshipClassDescriptor,
    target_catalog: &str,
) -> Result<RelationshipClassParams> {
    let origin = relationship
        .origin_table()
        .ok_or_else(|| CloneError::precondition(&dataset.name, "it has no origin class"))?;
    let destination = relationship.destination_table().ok_or_else(|| {
        CloneError::precondition(&dataset.name, "it has no destination class")
    })?;

    let (destination_primary_key, destination_foreign_key) = match &relationship.destination_keys
    {
        Some(keys) => (Some(keys.primary.clone()), Some(keys.foreign.clone())),
        None => (None, None),
    };

    Ok(RelationshipClassParams {
        origin_table: join_path(target_catalog, origin),
        destination_table: join_path(target_catalog, destination),
        out_path: join_path(target_catalog, dataset.unqualified_name()),
        relationship_type: RelationshipTypeKeyword::from_composite(relationship.is_composite),
        forward_label: relationship.forward_path_label.clone(),
        backward_label: relationship.backward_path_label.clone(),
        message_direction: MessageDirection::from(relationship.notification),
        cardinality: CardinalityKeyword::from(relationship.cardinality),
        attributed: relationship.is_attributed,
        origin_primary_key: relationship.origin_keys.primary.clone(),
        origin_foreign_key: relationship.origin_keys.foreign.clone(),
        destination_primary_key,
        destination_foreign_key,
    })
}

pub async fn clone_relationship_class<C, R>(
    ctx: &CloneContext<'_, C, R>,
    dataset: &DatasetDescriptor,
    relationship: &RelationshipClassDescriptor,
) -> Result<CloneOutcome>
where
    C: Catalog + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let name = dataset.unqualified_name();
    let params = relationship_params(dataset, relationship, ctx.target_catalog)?;

    // Endpoints are cloned in the first phase; both must be there by now.
    for (role, table, path) in [
        ("origin", relationship.origin_table(), &params.origin_table),
        ("destination", relationship.destination_table(), &params.destination_table),
    ] {
        if !ctx.catalog.exists(path).await? {
            let table = table.unwrap_or_default();
            return Err(CloneError::precondition(
                name,
                format!("the {} {} table is missing", table, role),
            ));
        }
    }

    if relationship.is_attributed {
        create_attributed(ctx, dataset, relationship, &params).await?;
    } else {
        ctx.catalog.create_relationship_class(&params).await?;
    }

    if relationship.relationship_rules.is_empty() {
        ctx.reporter.info(&format!("Cloned Relationship Class {}", name));
    } else {
        ctx.reporter.warning(&format!(
            "The {} relationship class was cloned, but relationship rules could not be copied over",
            name
        ));
    }
    Ok(CloneOutcome::Cloned)
}

/// Stages the source attribute table, creates the relationship class from
/// it, then releases the staging table whether or not creation succeeded.
async fn create_attributed<C, R>(
    ctx: &CloneContext<'_, C, R>,
    dataset: &DatasetDescriptor,
    relationship: &RelationshipClassDescriptor,
    params: &RelationshipClassParams,
) -> Result<()>
where
    C: Catalog + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let fields: Vec<String> = relationship.fields.iter().map(|f| f.name.clone()).collect();
    let staging = ctx
        .catalog
        .create_transient_table(&dataset.source_path())
        .await?;
    tracing::debug!("Staged attribute table {} for {}", staging, params.out_path);

    let created = ctx
        .catalog
        .create_relationship_class_from_table(params, &staging, &fields)
        .await;

    if let Err(e) = ctx.catalog.delete(&staging).await {
        tracing::warn!("Failed to release staging table {}: {}", staging, e);
        ctx.reporter.warning(&format!("Could not remove staging table {}", staging));
    }

    created
}
