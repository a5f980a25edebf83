//! Unified error types for the radial toolchain.
//!
//! This module provides a common error type [`RadialError`] that represents
//! failures from any stage of the repair-and-propagation pipeline. The
//! taxonomy is deliberately small: only malformed raw input ([`RadialError::Build`])
//! aborts a computation; cleaning and topology problems are accumulated in
//! reports instead of raised, and per-node compute problems are surfaced in
//! the result rather than thrown.
//!
//! # Example
//!
//! ```ignore
//! use radial_core::{RadialError, RadialResult};
//!
//! fn analyze(input: &str) -> RadialResult<()> {
//!     let raw = parse_input(input)?;
//!     run_pipeline(&raw)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for radial operations.
#[derive(Error, Debug)]
pub enum RadialError {
    /// I/O errors (file access at the CLI boundary)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Structurally impossible raw input (empty identifiers and the like).
    /// The only fatal class: no best-effort graph can be produced.
    #[error("Build error: {0}")]
    Build(String),

    /// Configuration errors (invalid thresholds, bad backbone pattern)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal invariant violations during voltage propagation
    #[error("Compute error: {0}")]
    Compute(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using RadialError.
pub type RadialResult<T> = Result<T, RadialError>;

impl From<anyhow::Error> for RadialError {
    fn from(err: anyhow::Error) -> Self {
        RadialError::Other(err.to_string())
    }
}

impl From<String> for RadialError {
    fn from(s: String) -> Self {
        RadialError::Other(s)
    }
}

impl From<&str> for RadialError {
    fn from(s: &str) -> Self {
        RadialError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for RadialError {
    fn from(err: serde_json::Error) -> Self {
        RadialError::Parse(err.to_string())
    }
}

impl From<regex::Error> for RadialError {
    fn from(err: regex::Error) -> Self {
        RadialError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RadialError::Build("conductor with empty endpoint id".into());
        assert!(err.to_string().contains("Build error"));
        assert!(err.to_string().contains("empty endpoint"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RadialError = io_err.into();
        assert!(matches!(err, RadialError::Io(_)));
    }

    #[test]
    fn test_regex_error_is_config() {
        let bad = regex::Regex::new("[").unwrap_err();
        let err: RadialError = bad.into();
        assert!(matches!(err, RadialError::Config(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> RadialResult<()> {
            Err(RadialError::Compute("test".into()))
        }

        fn outer() -> RadialResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
