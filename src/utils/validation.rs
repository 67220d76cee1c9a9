use crate::utils::error::{CloneError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(CloneError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CloneError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A run needs at least one dataset. Ids are otherwise checked one by one
/// when the engine describes them, so a bad id fails only its own dataset.
pub fn validate_dataset_list(field_name: &str, datasets: &[String]) -> Result<()> {
    if datasets.is_empty() {
        return Err(CloneError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    for dataset in datasets {
        validate_path(field_name, dataset)?;
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| CloneError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CloneError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(CloneError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("target", "out/target.json").is_ok());
        assert!(validate_path("target", "   ").is_err());
        assert!(validate_path("target", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_dataset_list() {
        let datasets = vec!["src.json/Parcels".to_string(), "src.json/Owners".to_string()];
        assert!(validate_dataset_list("datasets", &datasets).is_ok());
        assert!(validate_dataset_list("datasets", &[]).is_err());
        assert!(validate_dataset_list("datasets", &["  ".to_string()]).is_err());
    }

    #[test]
    fn test_dataset_list_leaves_per_dataset_checks_to_the_run() {
        let unprefixed = vec!["src.json/Roads".to_string(), "Owners".to_string()];
        assert!(validate_dataset_list("datasets", &unprefixed).is_ok());

        let duplicated = vec!["src.json/Roads".to_string(), "src.json/Roads".to_string()];
        assert!(validate_dataset_list("datasets", &duplicated).is_ok());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("logging.format", "json", &["compact", "json"]).is_ok());
        assert!(validate_one_of("logging.format", "xml", &["compact", "json"]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        assert_eq!(*validate_required_field("n", &present).unwrap(), 3);
        assert!(validate_required_field::<u32>("n", &None).is_err());
    }
}
