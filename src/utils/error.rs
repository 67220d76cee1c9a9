use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloneError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Catalog error: {message}")]
    CatalogError { message: String },

    #[error("{path} does not exist")]
    NotFoundError { path: String },

    #[error("Dataset {name} is of an unsupported type ({data_type})")]
    UnsupportedTypeError { name: String, data_type: String },

    #[error("Unable to clone {name} as {reason}")]
    PreconditionError { name: String, reason: String },

    #[error("{path} already exists")]
    AlreadyExistsError { path: String },

    #[error("{path} is locked")]
    LockedError { path: String },

    #[error("Could not delete {path}. Make sure it isn't locked. Dataset not cloned.")]
    DeleteError { path: String, details: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Catalog,
    Precondition,
    Conflict,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CloneError {
    pub fn catalog(message: impl Into<String>) -> Self {
        CloneError::CatalogError {
            message: message.into(),
        }
    }

    pub fn precondition(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CloneError::PreconditionError {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CloneError::ConfigError { .. }
            | CloneError::MissingConfigError { .. }
            | CloneError::InvalidConfigValueError { .. }
            | CloneError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CloneError::CatalogError { .. } | CloneError::NotFoundError { .. } => {
                ErrorCategory::Catalog
            }
            CloneError::UnsupportedTypeError { .. } | CloneError::PreconditionError { .. } => {
                ErrorCategory::Precondition
            }
            CloneError::AlreadyExistsError { .. }
            | CloneError::LockedError { .. }
            | CloneError::DeleteError { .. } => ErrorCategory::Conflict,
            CloneError::IoError(_) | CloneError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Conflict => ErrorSeverity::Low,
            ErrorCategory::Precondition => ErrorSeverity::Medium,
            ErrorCategory::Catalog | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Errors whose message already names the dataset and the cause. Anything
    /// else gets wrapped in a generic "error while cloning" report.
    pub fn is_descriptive(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Precondition | ErrorCategory::Conflict
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CloneError::ConfigError { .. }
            | CloneError::MissingConfigError { .. }
            | CloneError::InvalidConfigValueError { .. }
            | CloneError::ConfigValidationError { .. } => {
                "Check the command line arguments or the TOML configuration file"
            }
            CloneError::NotFoundError { .. } => "Check that the dataset path is spelled correctly",
            CloneError::CatalogError { .. } => "Check that the catalog is reachable and valid",
            CloneError::UnsupportedTypeError { .. } => {
                "Only feature classes, tables and relationship classes can be cloned"
            }
            CloneError::PreconditionError { .. } => {
                "Fix the source dataset or clone its dependencies first"
            }
            CloneError::AlreadyExistsError { .. } => "Re-run with overwrite enabled",
            CloneError::LockedError { .. } | CloneError::DeleteError { .. } => {
                "Close any application holding a lock on the dataset and retry"
            }
            CloneError::IoError(_) => "Check file permissions and available disk space",
            CloneError::SerializationError(_) => "Check that the catalog file is valid JSON",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Catalog => format!("Catalog problem: {}", self),
            ErrorCategory::Precondition | ErrorCategory::Conflict => self.to_string(),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CloneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_error_message_names_path() {
        let err = CloneError::DeleteError {
            path: "target.json/Parcels".to_string(),
            details: "locked".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not delete target.json/Parcels. Make sure it isn't locked. Dataset not cloned."
        );
        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert!(err.is_descriptive());
    }

    #[test]
    fn test_severity_ordering() {
        let io = CloneError::IoError(std::io::Error::other("disk"));
        let config = CloneError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert!(config.severity() > ErrorSeverity::Medium);
        assert!(!io.is_descriptive());
    }
}
