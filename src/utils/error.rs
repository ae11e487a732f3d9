use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutomlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("{file} not found. Please run {producer} first.")]
    MissingPrerequisite { file: String, producer: String },

    #[error("No images found in {uri}")]
    NoImagesFound { uri: String },

    #[error("{operation} failed with HTTP {status}: {message}")]
    PlatformError {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("Operation '{operation}' did not succeed: {message}")]
    OperationFailed { operation: String, message: String },

    #[error("Authentication error: {message}")]
    AuthError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Platform,
    Prerequisite,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AutomlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AutomlError::ConfigError { .. }
            | AutomlError::InvalidConfigValueError { .. }
            | AutomlError::MissingConfigError { .. }
            | AutomlError::AuthError { .. } => ErrorCategory::Configuration,
            AutomlError::ApiError(_) => ErrorCategory::Network,
            AutomlError::PlatformError { .. } | AutomlError::OperationFailed { .. } => {
                ErrorCategory::Platform
            }
            AutomlError::MissingPrerequisite { .. } => ErrorCategory::Prerequisite,
            AutomlError::NoImagesFound { .. } | AutomlError::SerializationError(_) => {
                ErrorCategory::Data
            }
            AutomlError::IoError(_) => ErrorCategory::System,
        }
    }

    /// Low severity means the stage stopped early on purpose and the process
    /// should still exit successfully.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AutomlError::MissingPrerequisite { .. } | AutomlError::NoImagesFound { .. } => {
                ErrorSeverity::Low
            }
            AutomlError::ApiError(_) => ErrorSeverity::Medium,
            AutomlError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// The stage stopped early on purpose; the run still counts as a success.
    pub fn is_clean_abort(&self) -> bool {
        self.severity() == ErrorSeverity::Low
    }

    /// Process exit code for a stage that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,      // 提前結束，視為成功
            ErrorSeverity::Medium => 2,   // 可重試
            ErrorSeverity::High => 1,     // 處理錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AutomlError::MissingPrerequisite { .. } | AutomlError::NoImagesFound { .. } => {
                self.to_string()
            }
            AutomlError::ApiError(e) if e.is_timeout() => {
                "The request to the platform timed out".to_string()
            }
            AutomlError::ApiError(e) if e.is_connect() => {
                "Could not connect to the platform API".to_string()
            }
            AutomlError::PlatformError {
                operation, status, ..
            } => format!("The platform rejected '{}' (HTTP {})", operation, status),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags and the --config file".to_string()
            }
            ErrorCategory::Network => {
                "Check network connectivity and the API endpoint, then rerun the stage".to_string()
            }
            ErrorCategory::Platform => match self {
                AutomlError::PlatformError { status: 401, .. }
                | AutomlError::PlatformError { status: 403, .. } => {
                    "Refresh the access token (gcloud auth print-access-token) and check IAM permissions"
                        .to_string()
                }
                AutomlError::PlatformError { status: 429, .. } => {
                    "Quota exceeded; wait or request more quota".to_string()
                }
                _ => "Inspect the resource in the cloud console for details".to_string(),
            },
            ErrorCategory::Prerequisite => match self {
                AutomlError::MissingPrerequisite { producer, .. } => {
                    format!("Run {} first, or pass the identifier explicitly", producer)
                }
                _ => "Run the previous stage first".to_string(),
            },
            ErrorCategory::Data => "Verify the bucket, dataset path and image files".to_string(),
            ErrorCategory::System => "Check file permissions in the working directory".to_string(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        AutomlError::ConfigError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AutomlError>;
