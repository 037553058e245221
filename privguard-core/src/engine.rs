// privguard-core/src/engine.rs
//! The anonymization engine: detector fan-out, reconciliation, and the
//! single-pass reversible substitution.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use log::{debug, info};

use crate::config::DetectionConfig;
use crate::detector::Detector;
use crate::detectors::regex_detector::RegexDetector;
use crate::errors::PrivguardError;
use crate::placeholder::PlaceholderAllocator;
use crate::reconcile::reconcile;
use crate::span::{OffsetMap, Span};
use crate::table::RestorationTable;

/// The language assumed when callers have no better information.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A configured set of detectors applied to texts one at a time.
///
/// Detector registration order matters: when two detectors report spans
/// sharing a start position, the earlier-registered detector wins during
/// reconciliation. There is no other detector precedence.
///
/// The engine is pure computation over in-memory strings: independent
/// texts may be anonymized concurrently from separate threads (`&self`
/// methods, no shared mutable state), but one text's substitution pass is
/// inherently sequential.
#[derive(Default)]
pub struct Anonymizer {
    detectors: Vec<Box<dyn Detector>>,
}

impl Anonymizer {
    /// Creates an engine with no detectors. Useful as a builder seed;
    /// an empty engine accepts every text verbatim.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the embedded default regex patterns.
    pub fn with_default_patterns() -> Result<Self> {
        let config = DetectionConfig::load_default_patterns()?;
        Ok(Self::new().add_detector(Box::new(RegexDetector::new(config)?)))
    }

    /// Appends a detector. Registration order is the tie-break precedence.
    pub fn add_detector(mut self, detector: Box<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Runs every detector and concatenates their spans in registration
    /// order. A detector failure aborts the whole call; no partial or
    /// degraded output is produced silently.
    fn collect_spans(&self, text: &str, language: &str) -> Result<Vec<Span>> {
        let mut all_spans = Vec::new();
        for detector in &self.detectors {
            let spans = detector
                .detect(text, language)
                .map_err(|source| PrivguardError::DetectorFailure {
                    detector: detector.name().to_string(),
                    source,
                })?;
            debug!("Detector '{}' produced {} span(s).", detector.name(), spans.len());
            all_spans.extend(spans);
        }
        Ok(all_spans)
    }

    /// Returns the reconciled, non-overlapping accepted span set for
    /// `text`, for inspection or reporting, without substituting anything.
    pub fn find_spans(&self, text: &str, language: &str) -> Result<Vec<Span>> {
        let offsets = OffsetMap::new(text);
        let spans = self.collect_spans(text, language)?;
        Ok(reconcile(text, &offsets, spans))
    }

    /// Anonymizes `text`, returning the sanitized text and the
    /// restoration table that inverts it.
    ///
    /// One left-to-right pass over the accepted spans: the gap since the
    /// previous span is copied verbatim, the placeholder is emitted in
    /// the span's place, and the cursor advances to the span's end. The
    /// pass is O(n) in text length plus O(k) in accepted spans; the text
    /// is never re-scanned per span, which is what keeps repeated
    /// substrings safe.
    ///
    /// The returned table is owned by this call alone. Applying
    /// [`restore`](crate::restore::restore) to the returned pair
    /// reconstructs `text` exactly.
    pub fn anonymize(&self, text: &str, language: &str) -> Result<(String, RestorationTable)> {
        info!(
            "Anonymizing text (language: '{}', detectors: {})...",
            language,
            self.detectors.len()
        );

        let offsets = OffsetMap::new(text);
        let spans = self.collect_spans(text, language)?;
        let accepted = reconcile(text, &offsets, spans);
        debug!("Accepted {} span(s) after reconciliation.", accepted.len());

        let mut allocator = PlaceholderAllocator::new();
        let mut table = RestorationTable::new();
        let mut sanitized = String::with_capacity(text.len());
        let mut cursor = 0usize; // char index

        for span in &accepted {
            sanitized.push_str(offsets.slice(text, cursor, span.start));
            let placeholder = allocator.next(&span.label);
            table.insert(placeholder.clone(), span.content.clone());
            sanitized.push_str(&placeholder);
            cursor = span.end;
        }
        sanitized.push_str(offsets.slice(text, cursor, offsets.char_len()));

        info!("Anonymization complete ({} placeholder(s)).", table.len());
        Ok((sanitized, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restore::restore;
    use anyhow::anyhow;

    struct FixedDetector {
        name: &'static str,
        spans: Vec<Span>,
    }

    impl Detector for FixedDetector {
        fn name(&self) -> &str {
            self.name
        }
        fn detect(&self, _text: &str, _language: &str) -> Result<Vec<Span>> {
            Ok(self.spans.clone())
        }
    }

    struct FailingDetector;

    impl Detector for FailingDetector {
        fn name(&self) -> &str {
            "failing"
        }
        fn detect(&self, _text: &str, _language: &str) -> Result<Vec<Span>> {
            Err(anyhow!("backend unavailable"))
        }
    }

    fn span_over(text: &str, start: usize, end: usize, label: &str) -> Span {
        let content: String = text.chars().skip(start).take(end - start).collect();
        Span::new(start, end, label, content, "fixed")
    }

    #[test]
    fn test_with_default_patterns_registers_regex_detector() {
        let engine = Anonymizer::with_default_patterns().unwrap();
        assert_eq!(engine.detector_names(), vec!["regex"]);
    }

    #[test]
    fn test_empty_engine_passes_text_through() {
        let engine = Anonymizer::new();
        let (sanitized, table) = engine.anonymize("nothing to hide", DEFAULT_LANGUAGE).unwrap();
        assert_eq!(sanitized, "nothing to hide");
        assert!(table.is_empty());
    }

    #[test]
    fn test_substitution_and_table_population() {
        let text = "Ann met Bob";
        let engine = Anonymizer::new().add_detector(Box::new(FixedDetector {
            name: "fixed",
            spans: vec![span_over(text, 0, 3, "PER"), span_over(text, 8, 11, "PER")],
        }));
        let (sanitized, table) = engine.anonymize(text, DEFAULT_LANGUAGE).unwrap();
        assert_eq!(sanitized, "<PER_1> met <PER_2>");
        assert_eq!(table.get("<PER_1>"), Some("Ann"));
        assert_eq!(table.get("<PER_2>"), Some("Bob"));
        assert_eq!(restore(&sanitized, &table), text);
    }

    #[test]
    fn test_repeated_substrings_substitute_positionally() {
        // The same surface form twice: a naive find/replace would collapse
        // both occurrences into the first placeholder.
        let text = "Ann and Ann";
        let engine = Anonymizer::new().add_detector(Box::new(FixedDetector {
            name: "fixed",
            spans: vec![span_over(text, 0, 3, "PER"), span_over(text, 8, 11, "PER")],
        }));
        let (sanitized, table) = engine.anonymize(text, DEFAULT_LANGUAGE).unwrap();
        assert_eq!(sanitized, "<PER_1> and <PER_2>");
        assert_eq!(restore(&sanitized, &table), text);
    }

    #[test]
    fn test_detector_failure_is_fatal() {
        let engine = Anonymizer::new().add_detector(Box::new(FailingDetector));
        let err = engine.anonymize("text", DEFAULT_LANGUAGE).unwrap_err();
        assert!(err.to_string().contains("failing"));
    }

    #[test]
    fn test_registration_order_breaks_same_start_ties() {
        let text = "overlap here";
        let first = FixedDetector {
            name: "first",
            spans: vec![span_over(text, 0, 7, "A")],
        };
        let second = FixedDetector {
            name: "second",
            spans: vec![span_over(text, 0, 12, "B")],
        };
        let engine = Anonymizer::new()
            .add_detector(Box::new(first))
            .add_detector(Box::new(second));
        let accepted = engine.find_spans(text, DEFAULT_LANGUAGE).unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].label, "A");
    }

    #[test]
    fn test_multibyte_gaps_are_copied_verbatim() {
        let text = "héllo Ann 東京";
        let engine = Anonymizer::new().add_detector(Box::new(FixedDetector {
            name: "fixed",
            spans: vec![span_over(text, 6, 9, "PER")],
        }));
        let (sanitized, table) = engine.anonymize(text, DEFAULT_LANGUAGE).unwrap();
        assert_eq!(sanitized, "héllo <PER_1> 東京");
        assert_eq!(restore(&sanitized, &table), text);
    }
}
