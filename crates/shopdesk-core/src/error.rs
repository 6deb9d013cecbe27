//! Error types for shopdesk-core
//!
//! Every failure carries a stable code, a severity and a serializable
//! `ErrorDetails` with suggestions, which the API layer returns as JSON.

use serde::{Deserialize, Serialize};
use shopdesk_loader::LoadError;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Directory not loaded
    NotLoaded,
    /// Entity kind not recognised
    UnknownEntity,
    /// Record not found
    RecordNotFound,
    /// Bad list query
    InvalidQuery,
    /// Cart operation refused
    CartRejected,
    /// Data file could not be read
    LoadFailed,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::UnknownEntity => write!(f, "UNKNOWN_ENTITY"),
            ErrorCode::RecordNotFound => write!(f, "RECORD_NOT_FOUND"),
            ErrorCode::InvalidQuery => write!(f, "INVALID_QUERY"),
            ErrorCode::CartRejected => write!(f, "CART_REJECTED"),
            ErrorCode::LoadFailed => write!(f, "LOAD_FAILED"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    /// Operation may be affected
    Warning,
    /// Operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for shopdesk-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Records not loaded")]
    NotLoaded,

    #[error("Unknown entity: {name}")]
    UnknownEntity { name: String },

    #[error("Unknown report: {name}")]
    UnknownReport { name: String },

    #[error("{entity} record not found: {id}")]
    RecordNotFound { entity: String, id: String },

    #[error("Invalid query parameter '{field}': {message}")]
    InvalidQuery { field: String, message: String },

    #[error("Failed to load records: {0}")]
    Load(#[from] LoadError),
}

impl CoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::UnknownEntity { .. } | CoreError::UnknownReport { .. } => ErrorCode::UnknownEntity,
            CoreError::RecordNotFound { .. } => ErrorCode::RecordNotFound,
            CoreError::InvalidQuery { .. } => ErrorCode::InvalidQuery,
            CoreError::Load(_) => ErrorCode::LoadFailed,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotLoaded => ErrorSeverity::Warning,
            CoreError::UnknownEntity { .. } | CoreError::UnknownReport { .. } => ErrorSeverity::Info,
            CoreError::RecordNotFound { .. } => ErrorSeverity::Info,
            CoreError::InvalidQuery { .. } => ErrorSeverity::Warning,
            CoreError::Load(_) => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NotLoaded => {
                details = details.with_suggestion(
                    "Check that the data directory exists, then reload.".to_string(),
                );
            }
            CoreError::UnknownEntity { name } => {
                details = details.with_detail(serde_json::json!({ "entity": name }));
                details = details.with_suggestion(format!(
                    "Use one of: {}.",
                    crate::types::EntityKind::ALL
                        .iter()
                        .map(|k| k.plural())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
            CoreError::UnknownReport { name } => {
                details = details.with_detail(serde_json::json!({ "report": name }));
                details = details.with_suggestion(format!(
                    "Use one of: {}.",
                    crate::reports::ReportKind::ALL
                        .iter()
                        .map(|k| k.slug())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
            CoreError::RecordNotFound { entity, .. } => {
                details = details.with_suggestion("Check if the record ID is correct.".to_string());
                details = details.with_suggestion(format!(
                    "Use the /api/{} endpoint to list all records.",
                    entity
                ));
            }
            CoreError::InvalidQuery { field, message } => {
                details = details.with_detail(serde_json::json!({
                    "field": field,
                    "reason": message,
                }));
                if field.ends_with("date") {
                    details = details.with_suggestion("Dates use the YYYY-MM-DD format.".to_string());
                }
            }
            CoreError::Load(error) => {
                details = details.with_detail(serde_json::json!({ "load_message": error.to_string() }));
                details = details.with_suggestion(
                    "Each data file must hold a JSON array of objects.".to_string(),
                );
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: String) -> Self {
        Self {
            operation,
            data: serde_json::json!({}),
        }
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using the log crate
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let line = format!(
            "[{}] {} - Operation: {} - Data: {}",
            error.code(),
            error,
            context.operation,
            context.data
        );
        match error.severity() {
            ErrorSeverity::Info => log::info!(target: "shopdesk::error", "{}", line),
            ErrorSeverity::Warning => log::warn!(target: "shopdesk::error", "{}", line),
            ErrorSeverity::Error => log::error!(target: "shopdesk::error", "{}", line),
        }
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "shopdesk::error",
            "WARNING: {} - Operation: {} - Data: {}",
            message,
            context.operation,
            context.data
        );
    }
}

// ==================== Tests ====================
