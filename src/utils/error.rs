use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Unexpected API response for '{category}': {message}")]
    ApiResponseError { category: String, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Table format error at line {line}: {message}")]
    TableFormatError { line: u64, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TrackerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) => ErrorCategory::Network,
            Self::ApiResponseError { .. } | Self::SerializationError(_) => ErrorCategory::Data,
            Self::CsvError(_) | Self::TableFormatError { .. } | Self::IoError(_) => {
                ErrorCategory::Storage
            }
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    /// 網路錯誤通常可重跑解決；I/O 錯誤視為系統層級問題
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Process exit code derived from severity. Every failure is non-zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) => {
                "Check network connectivity and the API endpoint, then run again; the table file was not modified"
            }
            Self::ApiResponseError { .. } | Self::SerializationError(_) => {
                "Verify that the endpoint is a MediaWiki api.php URL returning JSON"
            }
            Self::CsvError(_) | Self::TableFormatError { .. } => {
                "Fix or remove the table file; it must have a 'Category,Status' header and 'Included' statuses"
            }
            Self::IoError(_) => "Check file permissions and free disk space for the table file",
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the category API: {}", self),
            ErrorCategory::Data => format!("The category API returned unexpected data: {}", self),
            ErrorCategory::Storage => format!("Could not read or write the table file: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
