use crate::core::context::CloneContext;
use crate::core::domains::DomainCloner;
use crate::core::{entities, relationships};
use crate::domain::model::{split_path, unqualified_name, DatasetDescriptor, DatasetKind};
use crate::domain::outcome::{BatchResult, CloneOutcome, DatasetResult};
use crate::domain::ports::{Catalog, ConfigProvider, ProgressReporter};
use crate::utils::error::{CloneError, Result};
use serde::{Deserialize, Serialize};

/// One clone run: which datasets, where to, and whether to replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneRequest {
    pub datasets: Vec<String>,
    pub target_catalog: String,
    #[serde(default)]
    pub overwrite: bool,
}

impl CloneRequest {
    pub fn new(datasets: Vec<String>, target_catalog: impl Into<String>, overwrite: bool) -> Self {
        Self {
            datasets,
            target_catalog: target_catalog.into(),
            overwrite,
        }
    }

    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Self {
        Self::new(
            provider.datasets().to_vec(),
            provider.target_catalog(),
            provider.overwrite(),
        )
    }
}

/// A relationship class waiting for the second phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRelationship {
    pub dataset_id: String,
    pub descriptor: DatasetDescriptor,
}

/// Output of the first phase.
#[derive(Debug, Default)]
pub struct EntityPhase {
    pub results: Vec<DatasetResult>,
    pub deferred: Vec<PendingRelationship>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedDataset {
    pub dataset: String,
    pub data_type: String,
    pub target_name: String,
}

/// What a run would do, without touching the target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClonePlan {
    pub entities: Vec<PlannedDataset>,
    pub relationships: Vec<PlannedDataset>,
    pub rejected: Vec<DatasetResult>,
}

/// Label used for progress: unqualified dataset name.
fn display_name(dataset_id: &str) -> &str {
    let name = split_path(dataset_id).map_or(dataset_id, |(_, name)| name);
    unqualified_name(name)
}

pub struct CloneEngine<C: Catalog, R: ProgressReporter> {
    catalog: C,
    reporter: R,
}

impl<C: Catalog, R: ProgressReporter> CloneEngine<C, R> {
    pub fn new(catalog: C, reporter: R) -> Self {
        Self { catalog, reporter }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    fn context<'a>(&'a self, request: &'a CloneRequest) -> CloneContext<'a, C, R> {
        CloneContext {
            catalog: &self.catalog,
            reporter: &self.reporter,
            target_catalog: &request.target_catalog,
            overwrite: request.overwrite,
        }
    }

    /// Clones every requested dataset. Never aborts on a single dataset:
    /// failures are recorded in the returned batch.
    pub async fn run(&self, request: &CloneRequest) -> BatchResult {
        tracing::info!(
            "Cloning {} datasets into {} (overwrite: {})",
            request.datasets.len(),
            request.target_catalog,
            request.overwrite
        );
        self.reporter.start(request.datasets.len());

        let phase = self.clone_entities(request).await;
        tracing::debug!(
            "Entity phase done: {} results, {} relationship classes deferred",
            phase.results.len(),
            phase.deferred.len()
        );

        let mut batch = BatchResult::new();
        batch.extend(phase.results);
        batch.extend(self.clone_relationships(&phase.deferred, request).await);

        tracing::info!(
            "Clone finished: {} succeeded, {} failed",
            batch.successes,
            batch.failures
        );
        batch
    }

    /// First phase: feature classes and tables. Relationship classes are
    /// only collected, in encounter order.
    pub async fn clone_entities(&self, request: &CloneRequest) -> EntityPhase {
        let ctx = self.context(request);
        let mut domains = DomainCloner::new();
        let mut phase = EntityPhase::default();

        for dataset_id in &request.datasets {
            self.reporter.set_label(&format!("Cloning {}", display_name(dataset_id)));

            let outcome = match self.catalog.describe(dataset_id).await {
                Ok(descriptor) if matches!(descriptor.kind, DatasetKind::RelationshipClass(_)) => {
                    phase.deferred.push(PendingRelationship {
                        dataset_id: dataset_id.clone(),
                        descriptor,
                    });
                    continue;
                }
                Ok(descriptor) => self.dispatch(&ctx, &mut domains, dataset_id, &descriptor).await,
                Err(e) => Err(e),
            };

            phase.results.push(self.settle(dataset_id, outcome));
            self.reporter.advance();
        }

        tracing::debug!(
            "{} domains cloned into {}",
            domains.cloned_count(),
            request.target_catalog
        );
        phase
    }

    async fn dispatch(
        &self,
        ctx: &CloneContext<'_, C, R>,
        domains: &mut DomainCloner,
        dataset_id: &str,
        descriptor: &DatasetDescriptor,
    ) -> Result<CloneOutcome> {
        match &descriptor.kind {
            DatasetKind::FeatureClass(fc) => {
                entities::clone_feature_class(ctx, domains, descriptor, fc).await
            }
            DatasetKind::Table(_) => entities::clone_table(ctx, domains, descriptor).await,
            other => Err(CloneError::UnsupportedTypeError {
                name: dataset_id.to_string(),
                data_type: other.data_type().to_string(),
            }),
        }
    }

    /// Second phase: relationship classes, after their endpoints had a
    /// chance to be created.
    pub async fn clone_relationships(
        &self,
        deferred: &[PendingRelationship],
        request: &CloneRequest,
    ) -> Vec<DatasetResult> {
        let ctx = self.context(request);
        let mut results = Vec::with_capacity(deferred.len());

        for pending in deferred {
            let descriptor = &pending.descriptor;
            self.reporter.set_label(&format!("Cloning {}", descriptor.unqualified_name()));

            let outcome = match &descriptor.kind {
                DatasetKind::RelationshipClass(rel) => {
                    relationships::clone_relationship_class(&ctx, descriptor, rel).await
                }
                other => Err(CloneError::UnsupportedTypeError {
                    name: pending.dataset_id.clone(),
                    data_type: other.data_type().to_string(),
                }),
            };

            results.push(self.settle(&pending.dataset_id, outcome));
            self.reporter.advance();
        }

        results
    }

    /// Dispatch boundary: every error becomes a failed result and a report.
    fn settle(&self, dataset_id: &str, outcome: Result<CloneOutcome>) -> DatasetResult {
        match outcome {
            Ok(outcome) => DatasetResult::new(dataset_id, outcome.into()),
            Err(e) => {
                let reason = if e.is_descriptive() {
                    e.to_string()
                } else {
                    format!("An error occurred while cloning {}: {}", dataset_id, e)
                };
                tracing::debug!("{} failed ({:?})", dataset_id, e.category());
                self.reporter.error(&reason);
                DatasetResult::failed(dataset_id, reason)
            }
        }
    }

    /// Describes every dataset and sorts it into the phase it would run in.
    pub async fn plan(&self, request: &CloneRequest) -> ClonePlan {
        let mut plan = ClonePlan::default();

        for dataset_id in &request.datasets {
            let descriptor = match self.catalog.describe(dataset_id).await {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    plan.rejected.push(DatasetResult::failed(dataset_id, e.to_string()));
                    continue;
                }
            };
            let planned = PlannedDataset {
                dataset: dataset_id.clone(),
                data_type: descriptor.data_type().to_string(),
                target_name: descriptor.unqualified_name().to_string(),
            };
            match descriptor.kind {
                DatasetKind::FeatureClass(_) | DatasetKind::Table(_) => plan.entities.push(planned),
                DatasetKind::RelationshipClass(_) => plan.relationships.push(planned),
                DatasetKind::Other { data_type } => plan.rejected.push(DatasetResult::failed(
                    dataset_id,
                    CloneError::UnsupportedTypeError {
                        name: dataset_id.clone(),
                        data_type,
                    }
                    .to_string(),
                )),
            }
        }

        plan
    }
}
