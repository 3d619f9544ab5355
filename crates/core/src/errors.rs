use thiserror::Error;

/// Unified error type for the portfolio-analytics-core library.
///
/// Only configuration and input validation can fail. The analytics
/// computations themselves always return a finite, well-typed result.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    // ── Input Validation ────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
