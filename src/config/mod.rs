pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use super::cli::{parse_bool_text, parse_quoted_dataset};
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_dataset_list, validate_required_field, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "catalog-clone")]
    #[command(about = "Clone dataset schemas, domains and relationship classes between catalogs")]
    pub struct CliConfig {
        /// Semicolon separated, quoted dataset paths: "'src.json/Parcels';'src.json/Owners'"
        #[arg(long, value_delimiter = ';', value_parser = parse_quoted_dataset)]
        pub datasets: Vec<String>,

        /// Target catalog path
        #[arg(long)]
        pub target: Option<String>,

        /// Replace datasets that already exist in the target ("true"/"false")
        #[arg(long, action = clap::ArgAction::Set, value_parser = parse_bool_text)]
        pub overwrite: Option<bool>,

        /// TOML job file used when no datasets are given
        #[arg(short, long, default_value = "clone-config.toml")]
        pub config: String,

        /// Create the target catalog if it does not exist
        #[arg(long)]
        pub create_target: bool,

        /// Write a JSON run report to this path
        #[arg(long)]
        pub report: Option<String>,

        /// Describe datasets and show the clone order without changing the target
        #[arg(long)]
        pub dry_run: bool,

        /// Emit logs as JSON lines
        #[arg(long)]
        pub json_logs: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        /// No datasets on the command line means the TOML job file drives the run.
        pub fn uses_job_file(&self) -> bool {
            self.datasets.is_empty()
        }
    }

    impl ConfigProvider for CliConfig {
        fn datasets(&self) -> &[String] {
            &self.datasets
        }

        fn target_catalog(&self) -> &str {
            self.target.as_deref().unwrap_or_default()
        }

        fn overwrite(&self) -> bool {
            self.overwrite.unwrap_or(false)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_dataset_list("--datasets", &self.datasets)?;
            validate_required_field("--target", &self.target)?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_quoted_dataset_list_and_text_flag() {
            let config = CliConfig::parse_from([
                "catalog-clone",
                "--datasets",
                "'src.json/gis.Parcels';'src.json/gis.Owners'",
                "--target",
                "tgt.json",
                "--overwrite",
                "True",
            ]);

            assert_eq!(config.datasets(), ["src.json/gis.Parcels", "src.json/gis.Owners"]);
            assert_eq!(config.target_catalog(), "tgt.json");
            assert!(config.overwrite());
            assert!(!config.uses_job_file());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_no_datasets_falls_back_to_job_file() {
            let config = CliConfig::parse_from(["catalog-clone", "-c", "job.toml"]);

            assert!(config.uses_job_file());
            assert_eq!(config.overwrite, None);
            assert!(!config.overwrite());
            assert_eq!(config.config, "job.toml");
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_explicit_false_overwrite_is_kept() {
            let config = CliConfig::parse_from(["catalog-clone", "--overwrite", "false"]);
            assert_eq!(config.overwrite, Some(false));
        }
    }
}
