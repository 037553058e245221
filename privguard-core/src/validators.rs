// File: privguard-core/src/validators.rs
//! Programmatic validation functions for specific structured data types.
//!
//! This module provides additional validation logic beyond regular
//! expression matching. Regexes describe the shape of an identifier; the
//! checks here verify its substance (checksums, known country lengths),
//! which cuts false positives before a span ever reaches reconciliation.
//!
//! License: MIT OR Apache-2.0

use std::collections::HashMap;
use once_cell::sync::Lazy;

// Official IBAN lengths for commonly seen registry entries. Countries not
// listed are still accepted if the checksum holds.
static IBAN_COUNTRY_LENGTHS: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.extend([
        ("AT", 20), ("BE", 16), ("BG", 22), ("CH", 21), ("CY", 28),
        ("CZ", 24), ("DE", 22), ("DK", 18), ("EE", 20), ("ES", 24),
        ("FI", 18), ("FR", 27), ("GB", 22), ("GR", 27), ("HR", 21),
        ("HU", 28), ("IE", 22), ("IT", 27), ("LT", 20), ("LU", 20),
        ("LV", 21), ("MC", 27), ("NL", 18), ("NO", 15), ("PL", 28),
        ("PT", 25), ("RO", 24), ("SE", 24), ("SI", 19), ("SK", 24),
    ]);
    map
});

/// Helper function to validate an IBAN candidate using the ISO 13616 rules.
///
/// This implementation aims for a robust programmatic check without
/// external data: structural checks, per-country length where the country
/// is known, and the mod-97 checksum over the rearranged string.
///
/// # Arguments
///
/// * `iban` - The IBAN string slice to validate. Expected format
///   "CCkkBBAN..." (uppercase letters and digits, no separators).
///
/// # Returns
///
/// `true` if the candidate passes structural and checksum validation,
/// `false` otherwise.
pub fn is_valid_iban_programmatically(iban: &str) -> bool {
    let len = iban.len();
    if !(15..=34).contains(&len) {
        return false;
    }
    if !iban.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return false;
    }

    let country = &iban[..2];
    if !country.chars().all(|c| c.is_ascii_uppercase()) {
        return false;
    }
    if !iban[2..4].chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if let Some(&expected_len) = IBAN_COUNTRY_LENGTHS.get(country) {
        if len != expected_len {
            return false;
        }
    }

    // Mod-97: move the first four characters to the end, substitute
    // letters with 10..35, and reduce digit-by-digit to avoid big-number
    // arithmetic. A valid IBAN leaves a remainder of 1.
    let rearranged = iban[4..].chars().chain(iban[..4].chars());
    let mut remainder: u32 = 0;
    for c in rearranged {
        let value = match c.to_digit(36) {
            Some(v) => v,
            None => return false,
        };
        remainder = if value < 10 {
            (remainder * 10 + value) % 97
        } else {
            (remainder * 100 + value) % 97
        };
    }
    remainder == 1
}
