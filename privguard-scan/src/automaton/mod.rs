// privguard-scan/src/automaton/mod.rs
//! Multi-pattern scanning over a fixed pattern list.
//!
//! Builds a Double-Array Aho-Corasick automaton with leftmost-longest
//! match semantics, so that when one pattern is a prefix of another the
//! longer pattern always wins at a given position. Exposes a raw match
//! iterator and a word-boundary-filtered variant for scanning natural
//! language.

use daachorse::{DoubleArrayAhoCorasick, DoubleArrayAhoCorasickBuilder, MatchKind};
extern crate alloc;
use alloc::format;
use alloc::string::String;
use core::fmt;

/// A single match produced by a [`PatternSet`] scan.
///
/// Offsets are byte positions into the haystack. Because every pattern is
/// valid UTF-8, matches in valid UTF-8 haystacks always fall on character
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch {
    pub start: usize,
    pub end: usize,
    /// Index of the matched pattern in the list the set was built from.
    pub value: usize,
}

/// Errors raised while building a [`PatternSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSetError {
    /// The pattern list was empty.
    Empty,
    /// The underlying automaton rejected the pattern list
    /// (e.g. a duplicate or empty pattern).
    Build(String),
}

impl fmt::Display for PatternSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSetError::Empty => write!(f, "pattern list is empty"),
            PatternSetError::Build(msg) => write!(f, "failed to build automaton: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PatternSetError {}

/// A compiled set of literal patterns scanned simultaneously.
pub struct PatternSet {
    automaton: DoubleArrayAhoCorasick<usize>,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet")
            .field("automaton", &"<DoubleArrayAhoCorasick>")
            .finish()
    }
}

impl PatternSet {
    /// Builds a leftmost-longest automaton over `patterns`.
    ///
    /// Pattern indices are preserved: the `value` of each match is the
    /// position of the matched pattern in the input iterator. Patterns
    /// must be unique and non-empty.
    pub fn new<I, P>(patterns: I) -> Result<Self, PatternSetError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let patterns: alloc::vec::Vec<P> = patterns.into_iter().collect();
        if patterns.is_empty() {
            return Err(PatternSetError::Empty);
        }

        let automaton = DoubleArrayAhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .build(patterns)
            .map_err(|e| PatternSetError::Build(format!("{}", e)))?;

        Ok(Self { automaton })
    }

    /// Iterates non-overlapping leftmost-longest matches in `haystack`.
    pub fn find_leftmost_iter<'a>(
        &'a self,
        haystack: &'a str,
    ) -> impl Iterator<Item = PatternMatch> + 'a {
        self.automaton.leftmost_find_iter(haystack).map(|m| PatternMatch {
            start: m.start(),
            end: m.end(),
            value: m.value(),
        })
    }

    /// Like [`find_leftmost_iter`](Self::find_leftmost_iter), but keeps only
    /// matches flanked by non-alphanumeric characters, so "Ann" does not
    /// match inside "Annex".
    pub fn find_words<'a>(&'a self, haystack: &'a str) -> impl Iterator<Item = PatternMatch> + 'a {
        self.find_leftmost_iter(haystack).filter(move |m| {
            let prefix_ok = haystack[..m.start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
            let suffix_ok = haystack[m.end..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
            prefix_ok && suffix_ok
        })
    }
}
