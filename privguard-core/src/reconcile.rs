// privguard-core/src/reconcile.rs
//! Span reconciliation: merges span streams from heterogeneous detectors
//! into one ordered, non-overlapping accepted set.
//!
//! The policy is greedy earliest-start scheduling, not optimal-coverage
//! interval scheduling: when spans conflict, the leftmost-starting span
//! wins, and among spans sharing a start the one enumerated first (the
//! earlier-registered detector) wins via the stable sort. This tie-break
//! is a compatibility contract; do not replace it with longest-match-wins.
//!
//! License: MIT OR Apache-2.0

use log::{debug, warn};

use crate::span::{redact_sensitive, span_fingerprint, OffsetMap, Span};

/// Resolves `spans` into an ordered, non-overlapping accepted set.
///
/// Three stages:
/// 1. malformed spans (`start >= end` or `end` past the text) are dropped
///    with a warning before any slicing can go out of bounds, and span
///    content that disagrees with the true source slice is corrected;
/// 2. a stable sort by `start` preserves enumeration order among ties;
/// 3. a single left-to-right scan accepts a span iff it begins at or
///    after the end of the last accepted span. Overlap rejections are
///    deliberate and silent.
///
/// Every accepted span is drawn from the input; none is synthesized or
/// truncated. A fully nested span is always rejected: its start lies
/// before the enclosing span's end.
pub fn reconcile(text: &str, offsets: &OffsetMap, spans: Vec<Span>) -> Vec<Span> {
    let char_len = offsets.char_len();

    let mut valid: Vec<Span> = Vec::with_capacity(spans.len());
    for mut span in spans {
        if span.start >= span.end || span.end > char_len {
            warn!(
                "Dropping malformed span [{}, {}) from detector '{}' (label '{}', content {}): \
                 out of bounds for text of {} chars.",
                span.start,
                span.end,
                span.detector,
                span.label,
                redact_sensitive(&span.content),
                char_len
            );
            continue;
        }
        let true_content = offsets.slice(text, span.start, span.end);
        if span.content != true_content {
            debug!(
                "Span content from detector '{}' disagrees with source slice \
                 (label '{}', fingerprint {}); re-slicing from input.",
                span.detector,
                span.label,
                span_fingerprint(&span.label, &span.content)
            );
            span.content = true_content.to_string();
        }
        valid.push(span);
    }

    valid.sort_by_key(|s| s.start);

    let mut accepted: Vec<Span> = Vec::with_capacity(valid.len());
    let mut last_end = 0usize;
    for span in valid {
        if span.start >= last_end {
            last_end = span.end;
            accepted.push(span);
        } else {
            debug!(
                "Rejecting overlapping span [{}, {}) from detector '{}' (label '{}'): \
                 previous accepted span ends at {}.",
                span.start, span.end, span.detector, span.label, last_end
            );
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, label: &str, text: &str) -> Span {
        let content: String = text.chars().skip(start).take(end.saturating_sub(start)).collect();
        Span::new(start, end, label, content, "test")
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        let text = "no detections here";
        let offsets = OffsetMap::new(text);
        assert!(reconcile(text, &offsets, Vec::new()).is_empty());
    }

    #[test]
    fn test_accepted_set_is_non_overlapping_and_ordered() {
        let text = "abcdefghijklmnop";
        let offsets = OffsetMap::new(text);
        let spans = vec![
            span(8, 12, "B", text),
            span(0, 4, "A", text),
            span(3, 6, "C", text),
            span(12, 16, "D", text),
        ];
        let accepted = reconcile(text, &offsets, spans);
        let starts: Vec<usize> = accepted.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 8, 12]);
        for pair in accepted.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_greedy_tie_break_leftmost_first_detected_wins() {
        // Overlapping ("A", [0, 5)) and ("B", [3, 8)) in that enumeration
        // order: only A survives, B starts before A's end.
        let text = "abcdefgh";
        let offsets = OffsetMap::new(text);
        let spans = vec![span(0, 5, "A", text), span(3, 8, "B", text)];
        let accepted = reconcile(text, &offsets, spans);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].label, "A");
    }

    #[test]
    fn test_same_start_keeps_first_enumerated() {
        let text = "abcdefgh";
        let offsets = OffsetMap::new(text);
        // Same start, second is longer; the stable sort must keep the
        // first-enumerated span in front, so it wins regardless.
        let spans = vec![span(2, 4, "FIRST", text), span(2, 7, "SECOND", text)];
        let accepted = reconcile(text, &offsets, spans);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].label, "FIRST");
    }

    #[test]
    fn test_nested_span_is_rejected() {
        let text = "abcdefghij";
        let offsets = OffsetMap::new(text);
        let spans = vec![span(1, 9, "OUTER", text), span(3, 5, "INNER", text)];
        let accepted = reconcile(text, &offsets, spans);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].label, "OUTER");
    }

    #[test]
    fn test_malformed_spans_are_dropped() {
        let text = "abcdef";
        let offsets = OffsetMap::new(text);
        let spans = vec![
            Span::new(4, 2, "INVERTED", "xx", "test"),
            Span::new(3, 3, "EMPTY", "", "test"),
            Span::new(2, 99, "OOB", "xx", "test"),
            span(0, 3, "OK", text),
        ];
        let accepted = reconcile(text, &offsets, spans);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].label, "OK");
    }

    #[test]
    fn test_detector_content_drift_is_corrected() {
        let text = "  John Doe  ";
        let offsets = OffsetMap::new(text);
        // A detector that trimmed whitespace in its own buffer.
        let drifted = Span::new(1, 11, "PER", "John Doe", "test");
        let accepted = reconcile(text, &offsets, vec![drifted]);
        assert_eq!(accepted[0].content, " John Doe ");
    }

    #[test]
    fn test_adjacent_spans_both_accepted() {
        let text = "abcdef";
        let offsets = OffsetMap::new(text);
        let spans = vec![span(0, 3, "L", text), span(3, 6, "R", text)];
        let accepted = reconcile(text, &offsets, spans);
        assert_eq!(accepted.len(), 2);
    }
}
