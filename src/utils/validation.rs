use crate::utils::error::{CoverageError, Result};
use std::collections::HashSet;
use url::Url;

pub const OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                &format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            &format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

/// Locations starting with a URL scheme are checked as URLs, anything else as a path.
pub fn validate_source_location(field_name: &str, location: &str) -> Result<()> {
    if location.contains("://") {
        validate_url(field_name, location)
    } else {
        validate_path(field_name, location)
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            &value.to_string(),
            &format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Err(invalid(field_name, "", "At least one output format is required"));
    }

    let allowed: HashSet<&str> = OUTPUT_FORMATS.iter().copied().collect();
    for format in formats {
        if !allowed.contains(format.as_str()) {
            return Err(invalid(
                field_name,
                format,
                &format!(
                    "Unsupported format. Valid formats: {}",
                    OUTPUT_FORMATS.join(", ")
                ),
            ));
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

fn invalid(field: &str, value: &str, reason: &str) -> CoverageError {
    CoverageError::InvalidConfigValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source.location", "https://example.com/book.xlsx").is_ok());
        assert!(validate_url("source.location", "http://example.com").is_ok());
        assert!(validate_url("source.location", "").is_err());
        assert!(validate_url("source.location", "invalid-url").is_err());
        assert!(validate_url("source.location", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_source_location() {
        assert!(validate_source_location("source", "public/coverage.xlsx").is_ok());
        assert!(validate_source_location("source", "https://example.com/c.xlsx").is_ok());
        assert!(validate_source_location("source", "ftp://example.com/c.xlsx").is_err());
        assert!(validate_source_location("source", "").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_output_formats() {
        let formats = vec!["json".to_string(), "csv".to_string()];
        assert!(validate_output_formats("output_formats", &formats).is_ok());

        let invalid_formats = vec!["xml".to_string()];
        assert!(validate_output_formats("output_formats", &invalid_formats).is_err());
        assert!(validate_output_formats("output_formats", &[]).is_err());
    }
}
