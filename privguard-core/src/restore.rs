// privguard-core/src/restore.rs
//! Restoration: inverts a substitution given the sanitized text and its
//! restoration table.
//!
//! The restorer builds a leftmost-longest automaton over the table's
//! placeholder keys and scans the sanitized text exactly once, emitting
//! mapped original content for matches and literal characters elsewhere.
//! Two correctness hazards of iterative whole-text find/replace are
//! structurally absent here:
//!
//! * a placeholder that is a string prefix of another (`<PER_1>` vs
//!   `<PER_10>`) cannot be replaced inside the longer token, because the
//!   longest pattern wins at every position;
//! * emitted content is never rescanned, so original content that itself
//!   looks like a placeholder token cannot be substituted a second time.
//!
//! License: MIT OR Apache-2.0

use log::{debug, warn};

use privguard_scan::PatternSet;

use crate::table::RestorationTable;

/// Replaces every placeholder occurrence in `sanitized` with its mapped
/// original content.
///
/// Key mismatches are not errors: a placeholder present in the text but
/// absent from the table is left literally in place, and a table key that
/// never occurs in the text is ignored.
///
/// Remaining documented limitation: if the original text itself contained
/// a string equal to an allocated placeholder, a flat table cannot tell
/// the two apart; both occurrences restore to the mapped content.
pub fn restore(sanitized: &str, table: &RestorationTable) -> String {
    if table.is_empty() {
        return sanitized.to_string();
    }

    let keys: Vec<&str> = table.keys().filter(|k| !k.is_empty()).collect();
    if keys.is_empty() {
        debug!("Restoration table holds only empty keys; returning input unchanged.");
        return sanitized.to_string();
    }

    match PatternSet::new(keys.iter().copied()) {
        Ok(set) => {
            let mut restored = String::with_capacity(sanitized.len());
            let mut cursor = 0usize; // byte offset
            for m in set.find_leftmost_iter(sanitized) {
                restored.push_str(&sanitized[cursor..m.start]);
                let key = keys[m.value];
                restored.push_str(table.get(key).unwrap_or(key));
                cursor = m.end;
            }
            restored.push_str(&sanitized[cursor..]);
            restored
        }
        Err(e) => {
            // Unreachable for engine-produced tables (keys are unique and
            // non-empty), but a hand-built table must not lose data.
            warn!(
                "Failed to build placeholder automaton ({}); falling back to \
                 length-ordered replacement.",
                e
            );
            restore_by_length(sanitized, table)
        }
    }
}

/// Legacy restoration: iterative whole-text replacement, processing keys
/// by descending length so a short placeholder cannot corrupt a longer
/// one it prefixes.
///
/// Kept as the fallback contract only; unlike [`restore`] it rescans the
/// text per key, so content already restored by one key is visible to the
/// next. Ties in length break lexicographically for determinism.
pub fn restore_by_length(sanitized: &str, table: &RestorationTable) -> String {
    let mut keys: Vec<&str> = table.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut restored = sanitized.to_string();
    for key in keys {
        if let Some(content) = table.get(key) {
            restored = restored.replace(key, content);
        }
    }
    restored
}
