// privguard-core/src/placeholder.rs
//! Placeholder allocation for accepted spans.
//!
//! Placeholders have the form `<LABEL_N>` where `N` is a 1-based
//! per-label counter assigned in the order spans appear in the text.
//! The allocator is a local accumulator owned by a single `anonymize`
//! call, never process-wide state, so concurrent calls on independent
//! texts cannot interfere.

use std::collections::HashMap;

/// Formats the placeholder for the `ordinal`-th occurrence of `label`.
pub fn format_placeholder(label: &str, ordinal: usize) -> String {
    format!("<{}_{}>", label, ordinal)
}

/// Per-call allocator of collision-free, order-stable placeholders.
///
/// Labels are passed through verbatim (detectors use uppercase by
/// convention, but casing is not enforced here).
#[derive(Debug, Default)]
pub struct PlaceholderAllocator {
    counts: HashMap<String, usize>,
}

impl PlaceholderAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next placeholder for `label`.
    pub fn next(&mut self, label: &str) -> String {
        let count = self.counts.entry(label.to_string()).or_insert(0);
        *count += 1;
        format_placeholder(label, *count)
    }
}
