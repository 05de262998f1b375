//! Error metadata
//!
//! Storage failures are typed in `labfolio-storage`; this module defines how
//! an error describes itself to callers that surface it (HTTP handlers, the
//! CLI, workflow code deciding whether to retry).

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like a missing folder
    Debug,
    /// Warning level - for conflicts callers are expected to handle
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code a caller should map this error to
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same call may succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the caller
    fn suggested_action(&self) -> Option<&'static str>;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}
