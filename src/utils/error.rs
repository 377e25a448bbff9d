use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("HTTP error! status: {status}")]
    Transport { status: u16 },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Workbook could not be decoded: {0}")]
    Decode(#[from] calamine::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Decode,
    Configuration,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CoverageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CoverageError::Transport { .. } | CoverageError::Http(_) => ErrorCategory::Transport,
            CoverageError::Decode(_) | CoverageError::Csv(_) => ErrorCategory::Decode,
            CoverageError::Config { .. }
            | CoverageError::InvalidConfigValue { .. }
            | CoverageError::MissingConfig { .. } => ErrorCategory::Configuration,
            CoverageError::Serialization(_) => ErrorCategory::Processing,
            CoverageError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Decode | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Message shown to whoever is looking at the dashboard. Load failures
    /// surface the raw message text.
    pub fn user_friendly_message(&self) -> String {
        match self {
            CoverageError::Transport { .. }
            | CoverageError::Http(_)
            | CoverageError::Decode(_)
            | CoverageError::Csv(_) => format!("Error Loading Data: {}", self),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Transport => {
                "Check that the workbook is published at the configured location and reachable"
            }
            ErrorCategory::Decode => {
                "Make sure the file is a valid workbook and named correctly"
            }
            ErrorCategory::Configuration => "Review the command line flags or the TOML file",
            ErrorCategory::Processing => "Inspect the source sheet for unexpected content",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, CoverageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_message() {
        let err = CoverageError::Transport { status: 404 };
        assert_eq!(err.to_string(), "HTTP error! status: 404");
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("status: 404"));
    }

    #[test]
    fn test_config_error_severity() {
        let err = CoverageError::MissingConfig {
            field: "source.location".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
