//! Custom error types for the analysis pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Parsing never
//! fails (malformed input degrades to a partial table), and statistics and
//! scoring are total, so errors only arise from I/O, configuration, session
//! persistence and the external insight service.
//!
//! Errors are serializable so a presentation layer can display them.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// Failure of the external insight generator.
///
/// Always recoverable: callers show zero insights and the [`reason`](Self::reason).
#[derive(Error, Debug)]
pub enum InsightError {
    /// No API key was configured for the provider.
    #[error("Insight API key not set")]
    MissingApiKey,

    /// The service answered with a non-success status.
    #[error("Insight service returned {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The service answered but the body could not be understood.
    #[error("Malformed insight response: {0}")]
    MalformedResponse(String),

    /// No provider available, or the provider refused the request.
    #[error("Insight service unavailable: {0}")]
    Unavailable(String),

    /// HTTP transport error (only with "ai" feature).
    #[cfg(feature = "ai")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl InsightError {
    /// Human-readable reason, suitable for showing next to an empty insight list.
    pub fn reason(&self) -> String {
        match self {
            Self::Status { reason, .. } => reason.clone(),
            Self::Unavailable(reason) | Self::MalformedResponse(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}

/// The main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigValidationError),

    /// Session snapshot could not be stored or restored.
    #[error("Session store error: {0}")]
    Session(String),

    /// No stored analysis to restore.
    #[error("No analysis available")]
    NoAnalysis,

    /// Insight generation failed.
    #[error(transparent)]
    Insight(#[from] InsightError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "INVALID_CONFIG",
            Self::Session(_) => "SESSION_ERROR",
            Self::NoAnalysis => "NO_ANALYSIS",
            Self::Insight(_) => "INSIGHT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error leaves the rest of the pipeline usable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Insight(_) | Self::NoAnalysis => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Io(e).with_context(context))
    }
}
