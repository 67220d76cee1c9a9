use crate::core::ConfigProvider;
use crate::domain::model::{join_path, PATH_SEPARATOR};
use crate::utils::error::{CloneError, Result};
use crate::utils::validation::{
    validate_dataset_list, validate_non_empty_string, validate_one_of, validate_path, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

/// A clone job described in a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub source: SourceConfig,
    pub target: TargetConfig,
    pub logging: Option<LoggingConfig>,
    pub report: Option<ReportConfig>,
    /// `source.datasets` with `source.catalog` applied.
    #[serde(skip)]
    resolved_datasets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Catalog prepended to dataset entries that carry no catalog of their own.
    pub catalog: Option<String>,
    pub datasets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub catalog: String,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default)]
    pub create_if_missing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub path: String,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CloneError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| CloneError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.resolved_datasets = config.resolve_datasets();
        Ok(config)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CloneError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn resolve_datasets(&self) -> Vec<String> {
        self.source
            .datasets
            .iter()
            .map(|dataset| match &self.source.catalog {
                Some(catalog) if !dataset.contains(PATH_SEPARATOR) => join_path(catalog, dataset),
                _ => dataset.clone(),
            })
            .collect()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("job.name", &self.job.name)?;
        if let Some(catalog) = &self.source.catalog {
            validate_path("source.catalog", catalog)?;
        }
        validate_dataset_list("source.datasets", &self.resolved_datasets)?;
        validate_path("target.catalog", &self.target.catalog)?;

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            validate_one_of("logging.format", format, &LOG_FORMATS)?;
        }
        if let Some(report) = &self.report {
            validate_path("report.path", &report.path)?;
        }

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().is_some_and(|l| l.verbose)
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .is_some_and(|format| format == "json")
    }

    pub fn report_path(&self) -> Option<&str> {
        self.report.as_ref().map(|r| r.path.as_str())
    }

    pub fn create_if_missing(&self) -> bool {
        self.target.create_if_missing
    }

    /// Command line values win over the job file when given.
    pub fn apply_overrides(&mut self, target: Option<&str>, overwrite: Option<bool>) {
        if let Some(target) = target {
            self.target.catalog = target.to_string();
        }
        if let Some(overwrite) = overwrite {
            self.target.overwrite = overwrite;
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn datasets(&self) -> &[String] {
        &self.resolved_datasets
    }

    fn target_catalog(&self) -> &str {
        &self.target.catalog
    }

    fn overwrite(&self) -> bool {
        self.target.overwrite
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[job]
name = "parcels-schema"
description = "Parcel fabric schema for the new county catalog"

[source]
catalog = "data/source.json"
datasets = ["gis.Parcels", "gis.Owners", "other.json/gis.ParcelOwners"]

[target]
catalog = "out/target.json"
overwrite = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.job.name, "parcels-schema");
        assert_eq!(
            config.datasets(),
            [
                "data/source.json/gis.Parcels",
                "data/source.json/gis.Owners",
                "other.json/gis.ParcelOwners"
            ]
        );
        assert_eq!(config.target_catalog(), "out/target.json");
        assert!(config.overwrite());
        assert!(!config.verbose());
        assert!(!config.json_logs());
        assert!(config.report_path().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CLONE_TEST_TARGET", "out/county.json");

        let toml_content = r#"
[job]
name = "env"

[source]
datasets = ["src.json/Roads"]

[target]
catalog = "${CLONE_TEST_TARGET}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.target_catalog(), "out/county.json");
        assert!(!config.overwrite());

        std::env::remove_var("CLONE_TEST_TARGET");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[job]
name = "broken"

[source]
datasets = []

[target]
catalog = "out/target.json"

[logging]
format = "xml"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_and_bare_ids_pass_validation() {
        let toml_content = r#"
[job]
name = "mixed"

[source]
datasets = ["src.json/Roads", "src.json/Owners", "src.json/Roads", "Parcels"]

[target]
catalog = "out/target.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.datasets().len(), 4);
    }

    #[test]
    fn test_command_line_overrides_job_file() {
        let toml_content = r#"
[job]
name = "overrides"

[source]
datasets = ["src.json/Roads"]

[target]
catalog = "out/target.json"
overwrite = true
"#;

        let mut config = TomlConfig::from_toml_str(toml_content).unwrap();
        config.apply_overrides(None, None);
        assert!(config.overwrite());
        assert_eq!(config.target_catalog(), "out/target.json");

        config.apply_overrides(Some("out/other.json"), Some(false));
        assert!(!config.overwrite());
        assert_eq!(config.target_catalog(), "out/other.json");
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let toml_content = r#"
[job]
name = "logs"

[source]
datasets = ["src.json/Roads"]

[target]
catalog = "out/target.json"

[logging]
verbose = true
format = "xml"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.verbose());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[job]
name = "file-test"

[source]
datasets = ["src.json/Roads"]

[target]
catalog = "out/target.json"
create_if_missing = true

[logging]
format = "json"

[report]
path = "out/report.json"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "file-test");
        assert!(config.create_if_missing());
        assert!(config.json_logs());
        assert_eq!(config.report_path(), Some("out/report.json"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TomlConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, CloneError::IoError(_)));
    }
}
