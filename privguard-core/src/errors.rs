//! errors.rs - Custom error types for the privguard-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

/// This enum represents all possible error types in the `privguard-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PrivguardError {
    #[error("Failed to compile detection pattern '{0}': {1}")]
    PatternCompilationError(String, regex::Error),

    #[error("Pattern '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    /// A detector adapter failed while producing spans. Fatal for the
    /// `anonymize` call that invoked it: no partial output is produced.
    #[error("Detector '{detector}' failed")]
    DetectorFailure {
        detector: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
