// privguard-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot, non-interactive use of the engine.
//! Provides helper functions for anonymizing and restoring single strings
//! without constructing an `Anonymizer` by hand.

use anyhow::Result;

use crate::config::DetectionConfig;
use crate::detectors::regex_detector::RegexDetector;
use crate::engine::Anonymizer;
use crate::restore::restore;
use crate::table::RestorationTable;

/// Fully anonymizes an input string with a regex detector built from
/// `config`. This function is the primary entry point for one-shot use.
///
/// Callers that also want lexicon-based entities should build an
/// [`Anonymizer`] and register a
/// [`LexiconDetector`](crate::detectors::lexicon_detector::LexiconDetector)
/// alongside the regex detector.
///
/// # Arguments
///
/// * `config` - The merged `DetectionConfig` (defaults + optional user overrides).
/// * `content` - The string to be anonymized.
/// * `language` - The language selector forwarded to detectors.
pub fn anonymize_string(
    config: DetectionConfig,
    content: &str,
    language: &str,
) -> Result<(String, RestorationTable)> {
    let engine = Anonymizer::new().add_detector(Box::new(RegexDetector::new(config)?));
    engine.anonymize(content, language)
}

/// Inverts a one-shot anonymization.
pub fn restore_string(sanitized: &str, table: &RestorationTable) -> String {
    restore(sanitized, table)
}
