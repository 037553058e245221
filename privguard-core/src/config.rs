//! Configuration management for `privguard-core`.
//!
//! This module defines the core data structures for regex detection
//! patterns. It handles serialization/deserialization of YAML
//! configurations and provides utilities for loading, merging, and
//! validating these configs.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use log::{debug, info, warn};
use regex::Regex;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// A single regex-based detection pattern used by the regex detector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternRule {
    /// Unique identifier for the rule (e.g., "email").
    pub name: String,
    /// Placeholder label emitted for matches of this rule (e.g., "EMAIL").
    pub label: String,
    /// Human-readable description of what the rule targets.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: Option<String>,
    /// If true, enables multiline mode for the regex engine.
    pub multiline: bool,
    /// If true, the dot character `.` in regex will match newlines.
    pub dot_matches_new_line: bool,
    /// If true, matches additionally pass through programmatic validation
    /// (e.g., the IBAN mod-97 checksum).
    pub programmatic_validation: bool,
    /// If true, the rule is disabled unless explicitly enabled.
    pub opt_in: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
}

impl Default for PatternRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            label: String::new(),
            description: None,
            pattern: None,
            multiline: false,
            dot_matches_new_line: false,
            programmatic_validation: false,
            opt_in: false,
            enabled: None,
        }
    }
}

/// The top-level configuration structure for the regex detector.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct DetectionConfig {
    /// A list of regex-based detection patterns.
    pub patterns: Vec<PatternRule>,
}

impl DetectionConfig {
    /// Loads detection patterns from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom patterns from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: DetectionConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_patterns(&config.patterns)?;
        info!("Loaded {} patterns from file {}.", config.patterns.len(), path.display());

        Ok(config)
    }

    /// Loads the default detection patterns from the embedded configuration.
    pub fn load_default_patterns() -> Result<Self> {
        debug!("Loading default patterns from embedded string...");
        let default_yaml = include_str!("../config/default_patterns.yaml");
        let config: DetectionConfig = serde_yml::from_str(default_yaml)
            .context("Failed to parse default patterns")?;

        debug!("Loaded {} default patterns.", config.patterns.len());
        Ok(config)
    }

    /// Filters active patterns based on enable/disable lists.
    pub fn set_active_patterns(&mut self, enable: &[String], disable: &[String]) {
        let enable_set: HashSet<&str> = enable.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable.iter().map(String::as_str).collect();

        debug!("Initial pattern count before filtering: {}", self.patterns.len());

        let all_names: HashSet<&str> = self.patterns.iter().map(|r| r.name.as_str()).collect();

        for name in enable_set.difference(&all_names) {
            warn!("Pattern '{}' in `enable` list does not exist.", name);
        }

        for name in disable_set.difference(&all_names) {
            warn!("Pattern '{}' in `disable` list does not exist.", name);
        }

        self.patterns.retain(|rule| {
            let name = rule.name.as_str();
            !disable_set.contains(name) && (!rule.opt_in || enable_set.contains(name))
        });

        debug!("Final active pattern count after filtering: {}", self.patterns.len());
    }
}

/// Merges user-defined patterns with defaults. User patterns win by name.
pub fn merge_patterns(
    default_config: DetectionConfig,
    user_config: Option<DetectionConfig>,
) -> DetectionConfig {
    debug!("merge_patterns called. Initial default pattern count: {}", default_config.patterns.len());

    let mut final_map: HashMap<String, PatternRule> = default_config.patterns.into_iter()
        .map(|rule| (rule.name.clone(), rule))
        .collect();

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user patterns.", user_cfg.patterns.len());
        for user_rule in user_cfg.patterns {
            final_map.insert(user_rule.name.clone(), user_rule);
        }
    }

    let final_patterns: Vec<PatternRule> = final_map.into_values().collect();
    debug!("Final total patterns after merge: {}", final_patterns.len());

    DetectionConfig { patterns: final_patterns }
}

/// Validates pattern integrity (names, labels, regex compilation).
pub fn validate_patterns(patterns: &[PatternRule]) -> Result<()> {
    let mut names = HashSet::new();
    let mut errors = Vec::new();

    for rule in patterns {
        if rule.name.is_empty() {
            errors.push("A pattern has an empty `name` field.".to_string());
        } else if !names.insert(rule.name.clone()) {
            errors.push(format!("Duplicate pattern name found: '{}'.", rule.name));
        }

        if rule.label.is_empty() {
            errors.push(format!("Pattern '{}' has an empty `label` field.", rule.name));
        }

        let pattern = match &rule.pattern {
            Some(p) => p,
            None => {
                errors.push(format!("Pattern '{}' is missing the `pattern` field.", rule.name));
                continue;
            }
        };

        if pattern.is_empty() {
            errors.push(format!("Pattern '{}' has an empty `pattern` field.", rule.name));
            continue;
        }

        if let Err(e) = Regex::new(pattern) {
            errors.push(format!("Pattern '{}' has an invalid regex: {}", rule.name, e));
        }
    }

    if !errors.is_empty() {
        let full_error_message = format!("Pattern validation failed:\n{}", errors.join("\n"));
        Err(anyhow!(full_error_message))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, label: &str, pattern: &str) -> PatternRule {
        PatternRule {
            name: name.to_string(),
            label: label.to_string(),
            pattern: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let patterns = vec![rule("a", "A", "x"), rule("a", "A", "y")];
        assert!(validate_patterns(&patterns).is_err());
    }

    #[test]
    fn test_validate_rejects_invalid_regex() {
        let patterns = vec![rule("broken", "B", "([unclosed")];
        assert!(validate_patterns(&patterns).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_label() {
        let patterns = vec![rule("nameless", "", "x")];
        assert!(validate_patterns(&patterns).is_err());
    }

    #[test]
    fn test_set_active_patterns_opt_in() {
        let mut config = DetectionConfig {
            patterns: vec![
                rule("always", "A", "x"),
                PatternRule { opt_in: true, ..rule("optional", "B", "y") },
            ],
        };
        config.set_active_patterns(&[], &[]);
        assert_eq!(config.patterns.len(), 1);
        assert_eq!(config.patterns[0].name, "always");

        let mut config2 = DetectionConfig {
            patterns: vec![
                rule("always", "A", "x"),
                PatternRule { opt_in: true, ..rule("optional", "B", "y") },
            ],
        };
        config2.set_active_patterns(&["optional".to_string()], &[]);
        assert_eq!(config2.patterns.len(), 2);
    }
}
