//! Error types for `atelier-core`.
//!
//! Each error variant carries enough context to diagnose the problem without
//! a debugger. Security primitives (CSRF verification, nonce generation) do
//! not return errors at all: they fail closed or degrade with a warning.

/// Errors from loading or validating site content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The content file could not be read.
    #[error("failed to read content file '{path}': {reason}")]
    Io { path: String, reason: String },

    /// The content file is not valid JSON for the content model.
    #[error("failed to parse content file '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// The content parsed but violates a content invariant.
    #[error("invalid site content: {reason}")]
    Invalid { reason: String },
}

/// Errors from SEO artifact generation.
#[derive(Debug, thiserror::Error)]
pub enum SeoError {
    /// A structured-data object could not be serialized.
    #[error("structured data serialization failed for '{schema_type}': {reason}")]
    Serialization { schema_type: String, reason: String },
}

/// Errors from the analytics pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// A client-submitted event failed validation.
    #[error("invalid analytics event: {reason}")]
    InvalidEvent { reason: String },

    /// A batch was submitted with more events than allowed.
    #[error("batch too large: {count} events exceeds limit of {limit}")]
    BatchTooLarge { count: usize, limit: usize },

    /// The sink failed to deliver a batch. The events stay queued.
    #[error("analytics sink '{sink}' failed: {reason}")]
    SinkFailure { sink: String, reason: String },
}
