// Parameter text forms accepted on the command line: datasets arrive as a
// semicolon separated list of quoted paths, the overwrite flag as text.

use std::convert::Infallible;

/// Strips one pair of matching surrounding quotes: `'src/Parcels'` -> `src/Parcels`.
pub fn parse_quoted_dataset(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    let unquoted = ['\'', '"']
        .iter()
        .find_map(|quote| {
            trimmed
                .strip_prefix(*quote)
                .and_then(|rest| rest.strip_suffix(*quote))
        })
        .unwrap_or(trimmed);

    if unquoted.trim().is_empty() {
        return Err("dataset path cannot be empty".to_string());
    }
    Ok(unquoted.to_string())
}

/// Only the text `true` (any case) enables the flag.
pub fn parse_bool_text(value: &str) -> Result<bool, Infallible> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_dataset() {
        assert_eq!(parse_quoted_dataset("'src.json/Parcels'").unwrap(), "src.json/Parcels");
        assert_eq!(parse_quoted_dataset("\"src.json/Owners\"").unwrap(), "src.json/Owners");
        assert_eq!(parse_quoted_dataset(" src.json/Roads ").unwrap(), "src.json/Roads");
        assert!(parse_quoted_dataset("''").is_err());
    }

    #[test]
    fn test_parse_bool_text() {
        assert_eq!(parse_bool_text("TRUE"), Ok(true));
        assert_eq!(parse_bool_text("false"), Ok(false));
        assert_eq!(parse_bool_text("yes"), Ok(false));
    }
}
