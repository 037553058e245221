// privguard-core/src/detector.rs
//! Defines the core Detector trait.
//!
//! The `Detector` trait provides a pluggable interface for different span
//! sources (regex patterns, lexicon scans, external NER backends). This
//! module defines the contract that all such detectors must adhere to,
//! ensuring a consistent and interchangeable adapter API for the engine.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;

use crate::span::Span;

/// A source of labeled spans over one input text.
///
/// This trait decouples the anonymization engine from the specific
/// detection method, allowing heterogeneous detectors to feed one
/// reconciliation pass.
///
/// # Contract
///
/// * `content` of every returned span is sliced from the true input text,
///   never from a detector-internal buffer, so normalization performed
///   inside a backend cannot drift from the source.
/// * Offsets are Unicode scalar (character) indices into the input text;
///   adapters convert backend-native byte offsets before returning.
/// * No ordering guarantee is required of the returned spans.
/// * A `language` selector the detector does not support is non-fatal:
///   the detector falls back to its default language and emits a
///   warning-level diagnostic.
/// * A failure of the underlying backend is returned as an error and is
///   fatal for the calling `anonymize` invocation.
pub trait Detector: Send + Sync {
    /// A short stable identifier used in span provenance and diagnostics.
    fn name(&self) -> &str;

    /// Produces all spans this detector finds in `text`.
    fn detect(&self, text: &str, language: &str) -> Result<Vec<Span>>;
}
