//! compiler.rs - Manages the compilation and caching of detection patterns.
//!
//! This module provides a thread-safe, cached mechanism to convert a
//! `DetectionConfig` into `CompiledPatterns`, which are optimized for
//! efficient detection. It uses a global, shared cache to avoid
//! redundant compilation.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use lazy_static::lazy_static;
use std::sync::{Arc, RwLock};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;

use crate::config::{DetectionConfig, PatternRule, MAX_PATTERN_LENGTH};
use crate::errors::PrivguardError;

/// A single compiled detection pattern.
///
/// Holds a compiled regular expression along with the label emitted for
/// its matches, ready for efficient application to content.
#[derive(Debug)]
pub struct CompiledPattern {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// The placeholder label emitted for matches of this pattern.
    pub label: String,
    /// The unique name of the detection pattern.
    pub name: String,
    /// A flag indicating if matches require additional programmatic validation.
    pub programmatic_validation: bool,
}

/// A collection of all compiled patterns for one detection configuration.
#[derive(Debug)]
pub struct CompiledPatterns {
    /// A vector of `CompiledPattern` instances ready for application.
    pub patterns: Vec<CompiledPattern>,
}

lazy_static! {
    /// A thread-safe, global cache for compiled patterns.
    /// The key is a hash of the serialized `DetectionConfig`.
    static ref COMPILED_PATTERNS_CACHE: RwLock<HashMap<u64, Arc<CompiledPatterns>>> = RwLock::new(HashMap::new());
}

/// Hashes the `DetectionConfig` to create a stable, unique key for the cache.
///
/// To ensure determinism, the patterns are sorted by name before hashing.
fn hash_config(config: &DetectionConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    let mut patterns_to_hash = config.patterns.clone();

    // Sort patterns to ensure a deterministic hash key.
    patterns_to_hash.sort_by(|a, b| a.name.cmp(&b.name));

    patterns_to_hash.hash(&mut hasher);
    hasher.finish()
}

/// Compiles a list of `PatternRule`s into `CompiledPatterns` for efficient matching.
/// This is the low-level function that performs the actual regex compilation.
pub fn compile_patterns(rules_to_compile: Vec<PatternRule>) -> Result<CompiledPatterns, PrivguardError> {
    debug!("Starting compilation of {} patterns.", rules_to_compile.len());

    let mut compiled_patterns = Vec::new();
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        match rule.pattern.as_ref() {
            Some(pattern) => {
                debug!(
                    "Attempting to compile pattern: '{}' with regex '{:?}'",
                    &rule.name, pattern
                );

                if pattern.len() > MAX_PATTERN_LENGTH {
                    compilation_errors.push(PrivguardError::PatternLengthExceeded(
                        rule.name,
                        pattern.len(),
                        MAX_PATTERN_LENGTH,
                    ));
                    continue;
                }

                let regex_result = RegexBuilder::new(pattern)
                    .multi_line(rule.multiline)
                    .dot_matches_new_line(rule.dot_matches_new_line)
                    .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
                    .build();

                match regex_result {
                    Ok(regex) => {
                        debug!("Pattern '{}' compiled successfully.", &rule.name);
                        compiled_patterns.push(CompiledPattern {
                            regex,
                            label: rule.label,
                            name: rule.name,
                            programmatic_validation: rule.programmatic_validation,
                        });
                    }
                    Err(e) => {
                        compilation_errors.push(PrivguardError::PatternCompilationError(rule.name, e));
                    }
                }
            }
            None => {
                warn!("Skipping pattern '{}' because its regex is missing.", &rule.name);
                continue;
            }
        }
    }

    if !compilation_errors.is_empty() {
        // Collect errors into a single string for a concise error report
        let error_message = compilation_errors.iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        Err(PrivguardError::Fatal(format!(
            "Failed to compile {} pattern(s):\n{}",
            compilation_errors.len(),
            error_message
        )))
    } else {
        debug!("Finished compiling patterns. Total compiled: {}.", compiled_patterns.len());
        Ok(CompiledPatterns { patterns: compiled_patterns })
    }
}

/// Gets a `CompiledPatterns` instance from the cache or compiles them if not found.
///
/// This is the public entry point for retrieving compiled patterns. It returns an `Arc`
/// to a `CompiledPatterns` instance, allowing for cheap sharing.
pub fn get_or_compile_patterns(config: &DetectionConfig) -> Result<Arc<CompiledPatterns>> {
    let cache_key = hash_config(config);

    // Attempt to acquire a read lock first.
    {
        let cache = COMPILED_PATTERNS_CACHE.read().unwrap();
        if let Some(patterns) = cache.get(&cache_key) {
            debug!("Serving compiled patterns from cache for key: {}", &cache_key);
            return Ok(Arc::clone(patterns));
        }
    } // Read lock is released here.

    // Not in cache, so we compile.
    debug!("Compiled patterns not found in cache. Compiling now.");
    let compiled = compile_patterns(config.patterns.clone())?;
    let compiled_arc = Arc::new(compiled);

    // Acquire a write lock to insert the new patterns.
    COMPILED_PATTERNS_CACHE.write().unwrap().insert(cache_key, Arc::clone(&compiled_arc));

    debug!("Successfully compiled and cached patterns for key: {}", &cache_key);
    Ok(compiled_arc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_skips_rules_without_pattern() {
        let rules = vec![PatternRule {
            name: "no_pattern".to_string(),
            label: "X".to_string(),
            ..Default::default()
        }];
        let compiled = compile_patterns(rules).unwrap();
        assert!(compiled.patterns.is_empty());
    }

    #[test]
    fn test_compile_reports_length_violation() {
        let rules = vec![PatternRule {
            name: "too_long".to_string(),
            label: "X".to_string(),
            pattern: Some("a".repeat(MAX_PATTERN_LENGTH + 1)),
            ..Default::default()
        }];
        let err = compile_patterns(rules).unwrap_err();
        assert!(err.to_string().contains("too_long"));
    }

    #[test]
    fn test_cache_returns_same_instance() {
        let config = DetectionConfig {
            patterns: vec![PatternRule {
                name: "cached".to_string(),
                label: "C".to_string(),
                pattern: Some("cache-me".to_string()),
                ..Default::default()
            }],
        };
        let first = get_or_compile_patterns(&config).unwrap();
        let second = get_or_compile_patterns(&config).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
