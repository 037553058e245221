// privguard-core/src/detectors/regex_detector.rs
//! A `Detector` implementation that uses regular expressions to identify
//! structured sensitive data (emails, phone numbers, IBANs, ...).
//! License: MIT OR Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;
use anyhow::{Context, Result};

use crate::config::{DetectionConfig, PatternRule};
use crate::detector::Detector;
use crate::patterns::compiler::{get_or_compile_patterns, CompiledPattern, CompiledPatterns};
use crate::span::{log_span_detected_debug, OffsetMap, Span};
use crate::validators;

/// A detector that applies a compiled set of regex patterns to the input.
///
/// Patterns describe structured identifiers whose shape does not depend
/// on the text's language, so the `language` selector is accepted and
/// ignored.
#[derive(Debug)]
pub struct RegexDetector {
    compiled_patterns: Arc<CompiledPatterns>,
    config: DetectionConfig,
}

impl RegexDetector {
    pub fn new(config: DetectionConfig) -> Result<Self> {
        let compiled_patterns = get_or_compile_patterns(&config)
            .context("Failed to compile detection patterns for RegexDetector")?;

        Ok(Self {
            compiled_patterns,
            config,
        })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    fn run_programmatic_validator(&self, compiled: &CompiledPattern, original_str: &str) -> bool {
        if !compiled.programmatic_validation {
            return true;
        }
        match compiled.name.as_str() {
            "iban" => validators::is_valid_iban_programmatically(original_str),
            _ => true,
        }
    }
}

impl Detector for RegexDetector {
    fn name(&self) -> &str {
        "regex"
    }

    fn detect(&self, text: &str, _language: &str) -> Result<Vec<Span>> {
        let offsets = OffsetMap::new(text);
        let rules_map: HashMap<&str, &PatternRule> = self.config.patterns.iter()
            .map(|rule| (rule.name.as_str(), rule)).collect();
        let mut spans = Vec::new();

        for compiled in &self.compiled_patterns.patterns {
            if let Some(rule) = rules_map.get(compiled.name.as_str()) {
                if let Some(false) = rule.enabled {
                    continue;
                }
                for m in compiled.regex.find_iter(text) {
                    // Content is re-sliced from the true input text.
                    let content = &text[m.start()..m.end()];
                    if !self.run_programmatic_validator(compiled, content) {
                        continue;
                    }
                    log_span_detected_debug(module_path!(), self.name(), &compiled.label, content);
                    spans.push(Span::new(
                        offsets.char_of(m.start()),
                        offsets.char_of(m.end()),
                        compiled.label.clone(),
                        content,
                        self.name(),
                    ));
                }
            }
        }
        Ok(spans)
    }
}
