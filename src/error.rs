//! Error types for the maturity assessment service.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by session transitions.
///
/// Every transition either succeeds completely or returns one of these and
/// leaves the session untouched.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(uuid::Uuid),

    #[error("Action '{action}' is not available on page {page}")]
    InvalidTransition { page: String, action: String },

    #[error("Unknown option '{option}' for question {index}")]
    UnknownOption { index: usize, option: String },

    #[error("Question {index} expects {expected}")]
    SelectionShape { index: usize, expected: String },

    #[error("Report for session {0} is not available")]
    ReportUnavailable(uuid::Uuid),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },
}

/// Warehouse (analytics sink) errors.
#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Insert into {table} failed: {reason}")]
    InsertFailed { table: String, reason: String },

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Document rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Font error: {0}")]
    Font(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),
}

