use crate::core::context::CloneContext;
use crate::domain::ports::{Catalog, ProgressReporter};
use crate::utils::error::{CloneError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Proceed,
    /// Left the existing artifact untouched.
    Skip { reason: String },
}

impl Resolution {
    pub fn should_create(&self) -> bool {
        matches!(self, Resolution::Proceed)
    }
}

/// Decides whether `name` may be created in the target catalog.
///
/// An existing artifact is deleted when overwriting, otherwise the dataset is
/// skipped with a warning. A failed delete is an error: creation must never
/// run against an artifact that is still there.
pub async fn resolve<C, R>(ctx: &CloneContext<'_, C, R>, name: &str) -> Result<Resolution>
where
    C: Catalog + ?Sized,
    R: ProgressReporter + ?Sized,
{
    let path = ctx.target_path(name);

    if !ctx.catalog.exists(&path).await? {
        return Ok(Resolution::Proceed);
    }

    if !ctx.overwrite {
        let reason = format!(
            "Could not clone {} as it already exists in output catalog.",
            path
        );
        ctx.reporter.warning(&reason);
        return Ok(Resolution::Skip { reason });
    }

    tracing::debug!("Deleting {} before overwriting", path);
    match ctx.catalog.delete(&path).await {
        Ok(()) => Ok(Resolution::Proceed),
        Err(e) => Err(CloneError::DeleteError {
            path,
            details: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CatalogCall, MemoryCatalog, RecordingReporter};
    use crate::domain::model::{DatasetDescriptor, DatasetKind, TableDescriptor};
    use crate::domain::ports::MessageLevel;

    fn catalog_with_owners() -> MemoryCatalog {
        MemoryCatalog::new().with_dataset(
            "tgt",
            DatasetDescriptor {
                name: "Owners".to_string(),
                catalog_path: String::new(),
                kind: DatasetKind::Table(TableDescriptor { fields: vec![] }),
            },
        )
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

    #[tokio::test]
    async fn test_absent_target_proceeds() {
        let catalog = catalog_with_owners();
        let reporter = RecordingReporter::new();

        let resolution = resolve(&context(&catalog, &reporter, false), "Parcels")
            .await
            .unwrap();
        assert!(resolution.should_create());
        assert!(reporter.events().is_empty());
    }

    #[tokio::test]
    async fn test_existing_target_without_overwrite_warns() {
        let catalog = catalog_with_owners();
        let reporter = RecordingReporter::new();

        let resolution = resolve(&context(&catalog, &reporter, false), "Owners")
            .await
            .unwrap();

        assert!(!resolution.should_create());
        assert_eq!(reporter.messages(MessageLevel::Warning).len(), 1);
        assert!(reporter.messages(MessageLevel::Error).is_empty());
        assert!(catalog.journal().is_empty());
        assert!(catalog.dataset("tgt/Owners").is_some());
    }

    #[tokio::test]
    async fn test_overwrite_deletes_existing_target() {
        let catalog = catalog_with_owners();
        let reporter = RecordingReporter::new();

        let resolution = resolve(&context(&catalog, &reporter, true), "Owners")
            .await
            .unwrap();

        assert_eq!(resolution, Resolution::Proceed);
        assert_eq!(
            catalog.journal(),
            vec![CatalogCall::Delete("tgt/Owners".to_string())]
        );
        assert!(catalog.dataset("tgt/Owners").is_none());
    }

    #[tokio::test]
    async fn test_locked_target_is_an_error() {
        let catalog = catalog_with_owners();
        catalog.lock("tgt/Owners");
        let reporter = RecordingReporter::new();

        let err = resolve(&context(&catalog, &reporter, true), "Owners")
            .await
            .unwrap_err();

        assert!(matches!(err, CloneError::DeleteError { .. }));
        assert!(catalog.dataset("tgt/Owners").is_some());
    }
}
