use thiserror::Error;

/// 單一端點嘗試失敗的原因，只會被記錄，不會單獨拋出
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("transport failure contacting {url}: {message}")]
    Transport { url: String, message: String },

    #[error("{url} answered with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("{url} rejected the session (HTTP 401)")]
    Unauthorized { url: String },

    #[error("{url} returned an undecodable body: {message}")]
    Decode { url: String, message: String },
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{}", exhausted_message(.attempts, .last))]
    TransportExhausted {
        attempts: usize,
        #[source]
        last: Option<Box<EndpointError>>,
    },

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Session store error: {message}")]
    SessionStoreError { message: String },

    #[error("Schema violation: {message}")]
    SchemaViolation { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

fn exhausted_message(attempts: &usize, last: &Option<Box<EndpointError>>) -> String {
    match last.as_deref() {
        Some(cause) => format!(
            "All {} endpoint(s) failed, last error: {}",
            attempts, cause
        ),
        None => "all connection attempts failed".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Session,
    Data,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::TransportExhausted { .. } | ClientError::HttpClientError(_) => {
                ErrorCategory::Network
            }
            ClientError::ConfigError { .. }
            | ClientError::ConfigValidationError { .. }
            | ClientError::MissingConfigError { .. }
            | ClientError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ClientError::SessionStoreError { .. } | ClientError::IoError(_) => {
                ErrorCategory::Session
            }
            ClientError::SerializationError(_) | ClientError::SchemaViolation { .. } => {
                ErrorCategory::Data
            }
            ClientError::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路問題通常稍後重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Session => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ClientError::TransportExhausted { last, .. } => match last.as_deref() {
                Some(EndpointError::Unauthorized { .. }) => {
                    "The session expired. Sign in again and retry."
                }
                _ => "Check the network connection and that at least one endpoint is reachable.",
            },
            ClientError::HttpClientError(_) => "Check the [http] section of the configuration.",
            ClientError::IoError(_) | ClientError::SessionStoreError { .. } => {
                "Check that the session file path is writable."
            }
            ClientError::SerializationError(_) | ClientError::SchemaViolation { .. } => {
                "The server response does not match the expected shape. Report it to the backend team."
            }
            ClientError::ConfigError { .. }
            | ClientError::ConfigValidationError { .. }
            | ClientError::MissingConfigError { .. }
            | ClientError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or environment variables and try again."
            }
            ClientError::ValidationError { .. } => "Check the command arguments.",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::TransportExhausted { .. } => {
                "Failed to load: no server could be reached.".to_string()
            }
            ClientError::SchemaViolation { .. } | ClientError::SerializationError(_) => {
                "Failed to load: the server sent unexpected data.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
