// privguard-core/src/span.rs
//! Provides the core `Span` data type, offset-unit mapping between byte and
//! character positions, and utility functions for PII-safe logging of
//! detected spans within the `privguard-core` library.

use serde::{Deserialize, Serialize};
use log::debug;

use lazy_static::lazy_static;
use sha2::{Digest, Sha256};
use hex;

lazy_static! {
    /// A static boolean that is initialized once to determine if PII is allowed in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("PRIVGUARD_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// A labeled region of interest detected in a text.
///
/// Offsets are half-open `[start, end)` Unicode scalar (character) indices
/// into the original text. `content` is the exact slice
/// `text[start..end]`, re-sliced from the true input rather than taken
/// from detector-internal buffers, so detector-side normalization cannot
/// drift from the source. `detector` records which adapter produced the
/// span and is used for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub content: String,
    #[serde(default)]
    pub detector: String,
}

impl Span {
    pub fn new(
        start: usize,
        end: usize,
        label: impl Into<String>,
        content: impl Into<String>,
        detector: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            content: content.into(),
            detector: detector.into(),
        }
    }

    /// Length of the span in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A bidirectional map between character indices and byte offsets of one text.
///
/// Detector backends (the `regex` crate, the scan automaton) report byte
/// offsets; the engine's canonical offset unit is the character index.
/// Building the map once per text keeps every subsequent conversion and
/// slice O(1), so the substitution pass stays linear in the text length.
#[derive(Debug)]
pub struct OffsetMap {
    /// `char_to_byte[i]` is the byte offset of character `i`; the final
    /// entry is the byte length of the text.
    char_to_byte: Vec<usize>,
}

impl OffsetMap {
    pub fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = Vec::with_capacity(text.len() + 1);
        for (byte_idx, _) in text.char_indices() {
            char_to_byte.push(byte_idx);
        }
        char_to_byte.push(text.len());
        Self { char_to_byte }
    }

    /// Number of characters in the mapped text.
    pub fn char_len(&self) -> usize {
        self.char_to_byte.len() - 1
    }

    /// Byte offset of character index `char_idx` (clamped to the text end).
    pub fn byte_of(&self, char_idx: usize) -> usize {
        let idx = char_idx.min(self.char_to_byte.len() - 1);
        self.char_to_byte[idx]
    }

    /// Character index of `byte_off`. The offset must lie on a character
    /// boundary, which holds for offsets produced by the regex and
    /// automaton backends on valid UTF-8 input.
    pub fn char_of(&self, byte_off: usize) -> usize {
        match self.char_to_byte.binary_search(&byte_off) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Slices `text` by character indices.
    pub fn slice<'a>(&self, text: &'a str, start_char: usize, end_char: usize) -> &'a str {
        &text[self.byte_of(start_char)..self.byte_of(end_char)]
    }
}

/// Replaces sensitive content with a length-only marker for log output.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    let char_count = s.chars().count();
    if char_count <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", char_count)
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_span_detected_debug(
    module_path: &str,
    detector: &str,
    label: &str,
    sensitive_content: &str,
) {
    debug!(
        "{} Detector '{}' produced span: Label='{}', Content='{}'",
        module_path,
        detector,
        label,
        get_loggable_content(sensitive_content)
    );
}

/// A stable, log-safe fingerprint of a span's content.
///
/// Whitespace runs and casing are normalized before hashing so the same
/// logical content always fingerprints identically.
pub fn span_fingerprint(label: &str, content: &str) -> String {
    let normalized = content
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(label.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}
