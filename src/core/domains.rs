use crate::core::context::CloneContext;
use crate::domain::model::{DatasetDescriptor, DomainDescriptor, DomainKind};
use crate::domain::params::DomainParams;
use crate::domain::ports::{Catalog, ProgressReporter};
use crate::utils::error::{CloneError, Result};
use std::collections::HashSet;

pub fn domain_params(target_catalog: &str, domain: &DomainDescriptor) -> DomainParams {
    DomainParams {
        catalog_path: target_catalog.to_string(),
        name: domain.name.clone(),
        description: domain.description.clone(),
        field_type: domain.field_type.into(),
        domain_type: domain.domain_type.into(),
        split_policy: domain.split_policy.into(),
        merge_policy: domain.merge_policy.into(),
    }
}

/// Copies the value domains a dataset's fields reference.
///
/// Lives for one run: a domain name is created at most once no matter how
/// many datasets use it, and a domain already present in the target is never
/// recreated, even when its definition differs from the source.
#[derive(Debug, Default)]
pub struct DomainCloner {
    cloned: HashSet<String>,
}

impl DomainCloner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cloned(&self, name: &str) -> bool {
        self.cloned.contains(name)
    }

    pub fn cloned_count(&self) -> usize {
        self.cloned.len()
    }

    /// Returns the number of domains created in the target.
    pub async fn clone_domains<C, R>(
        &mut self,
        ctx: &CloneContext<'_, C, R>,
        dataset: &DatasetDescriptor,
    ) -> Result<usize>
    where
        C: Catalog + ?Sized,
        R: ProgressReporter + ?Sized,
    {
        let referenced = referenced_domains(dataset);
        if referenced.is_empty() {
            return Ok(0);
        }

        let existing: HashSet<String> = ctx
            .catalog
            .list_domains(ctx.target_catalog)
            .await?
            .into_iter()
            .map(|d| d.name)
            .collect();
        let missing: Vec<&str> = referenced
            .into_iter()
            .filter(|name| !existing.contains(*name) && !self.is_cloned(name))
            .collect();
        if missing.is_empty() {
            return Ok(0);
        }

        let source_domains = ctx.catalog.list_domains(&dataset.catalog_path).await?;
        let to_create = missing
            .iter()
            .map(|name| find_source_domain(dataset, &source_domains, name))
            .collect::<Result<Vec<_>>>()?;

        for domain in to_create {
            self.create_domain(ctx, domain).await?;
        }
        Ok(missing.len())
    }

    async fn create_domain<C, R>(
        &mut self,
        ctx: &CloneContext<'_, C, R>,
        domain: &DomainDescriptor,
    ) -> Result<()>
    where
        C: Catalog + ?Sized,
        R: ProgressReporter + ?Sized,
    {
        let params = domain_params(ctx.target_catalog, domain);
        tracing::debug!(
            "Creating {} domain {} ({})",
            params.domain_type,
            params.name,
            params.field_type
        );
        ctx.catalog.create_domain(&params).await?;

        match domain.domain_type {
            DomainKind::CodedValue => {
                for (code, label) in &domain.coded_values {
                    ctx.catalog
                        .add_coded_value(ctx.target_catalog, &domain.name, code, label)
                        .await?;
                }
            }
            DomainKind::Range => {
                // Validated in find_source_domain.
                if let Some((min, max)) = domain.range {
                    ctx.catalog
                        .set_range_value(ctx.target_catalog, &domain.name, min, max)
                        .await?;
                }
            }
        }

        self.cloned.insert(domain.name.clone());
        ctx.reporter.info(&format!("Cloned Domain {}", domain.name));
        Ok(())
    }
}

/// Distinct domain names in field order.
fn referenced_domains(dataset: &DatasetDescriptor) -> Vec<&str> {
    let mut seen = HashSet::new();
    dataset
        .fields()
        .iter()
        .filter_map(|field| field.domain.as_deref())
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .collect()
}

fn find_source_domain<'a>(
    dataset: &DatasetDescriptor,
    source_domains: &'a [DomainDescriptor],
    name: &str,
) -> Result<&'a DomainDescriptor> {
    let domain = source_domains
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| {
            CloneError::precondition(
                &dataset.name,
                format!("the {} domain is missing from the source catalog", name),
            )
        })?;
    if domain.domain_type == DomainKind::Range && domain.range.is_none() {
        return Err(CloneError::precondition(
            &dataset.name,
            format!("the {} range domain has no range", name),
        ));
    }
    Ok(domain)
}
