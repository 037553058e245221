// privguard-core/src/detectors/lexicon_detector.rs
//! A `Detector` implementation that scans per-language entity lexicons
//! (gazetteers) to identify unstructured entities such as persons,
//! locations, and organizations.
//!
//! This detector fills the model-based slot of the detector taxonomy: it
//! consumes curated surface-form lists instead of running model
//! inference, and exposes the same language-fallback behavior an NER
//! backend adapter must implement.
//! License: MIT OR Apache-2.0

use std::collections::{HashMap, HashSet};
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use privguard_scan::PatternSet;

use crate::detector::Detector;
use crate::span::{log_span_detected_debug, OffsetMap, Span};

/// Entity surface forms grouped by label, for one language.
///
/// Serialized shape is a plain mapping, e.g.
/// `{ "PER": ["John Doe"], "LOC": ["New York"] }`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityLexicon {
    pub entries: HashMap<String, Vec<String>>,
}

impl EntityLexicon {
    /// Builds a lexicon from `(label, surface forms)` pairs.
    pub fn from_entries<L, E, S>(entries: impl IntoIterator<Item = (L, E)>) -> Self
    where
        L: Into<String>,
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(label, forms)| (label.into(), forms.into_iter().map(Into::into).collect()))
            .collect();
        Self { entries }
    }

    /// Loads a lexicon from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading entity lexicon from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
        let lexicon: EntityLexicon = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse lexicon file {}", path.display()))?;
        Ok(lexicon)
    }
}

/// One language's lexicon compiled into a scan automaton.
///
/// `labels` is parallel to the automaton's pattern indices.
#[derive(Debug)]
struct CompiledLexicon {
    set: PatternSet,
    labels: Vec<String>,
}

impl CompiledLexicon {
    fn compile(lexicon: &EntityLexicon) -> Result<Self> {
        let mut surfaces: Vec<&str> = Vec::new();
        let mut labels: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        // Deterministic label order; keep the first label for a surface form
        // listed under several labels, the automaton requires unique patterns.
        let mut by_label: Vec<(&String, &Vec<String>)> = lexicon.entries.iter().collect();
        by_label.sort_by(|a, b| a.0.cmp(b.0));
        for (label, forms) in by_label {
            for form in forms {
                if form.is_empty() {
                    warn!("Skipping empty lexicon entry under label '{}'.", label);
                    continue;
                }
                if seen.insert(form.as_str()) {
                    surfaces.push(form.as_str());
                    labels.push(label.clone());
                }
            }
        }

        let set = PatternSet::new(surfaces)
            .map_err(|e| anyhow!("Failed to compile lexicon automaton: {}", e))?;
        Ok(Self { set, labels })
    }
}

/// A detector that matches known entity surface forms at word boundaries.
///
/// Lexicons are registered per language selector. An unsupported selector
/// falls back to the configured default language with a warning-level
/// diagnostic; this is non-fatal by contract.
#[derive(Debug)]
pub struct LexiconDetector {
    languages: HashMap<String, CompiledLexicon>,
    default_language: String,
}

impl LexiconDetector {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            languages: HashMap::new(),
            default_language: default_language.into(),
        }
    }

    /// Registers `lexicon` for `language`, replacing any previous one.
    pub fn with_lexicon(mut self, language: impl Into<String>, lexicon: &EntityLexicon) -> Result<Self> {
        let language = language.into();
        let compiled = CompiledLexicon::compile(lexicon)
            .with_context(|| format!("Failed to compile lexicon for language '{}'", language))?;
        self.languages.insert(language, compiled);
        Ok(self)
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn supported_languages(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }
}

impl Detector for LexiconDetector {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn detect(&self, text: &str, language: &str) -> Result<Vec<Span>> {
        let selected = if self.languages.contains_key(language) {
            language
        } else {
            warn!(
                "Language '{}' not supported by lexicon detector. Defaulting to '{}'.",
                language, self.default_language
            );
            self.default_language.as_str()
        };

        let Some(compiled) = self.languages.get(selected) else {
            debug!("No lexicon registered for language '{}'; nothing to detect.", selected);
            return Ok(Vec::new());
        };

        let offsets = OffsetMap::new(text);
        let mut spans = Vec::new();
        for m in compiled.set.find_words(text) {
            // Content is re-sliced from the true input text.
            let content = &text[m.start..m.end];
            let label = &compiled.labels[m.value];
            log_span_detected_debug(module_path!(), self.name(), label, content);
            spans.push(Span::new(
                offsets.char_of(m.start),
                offsets.char_of(m.end),
                label.clone(),
                content,
                self.name(),
            ));
        }
        Ok(spans)
    }
}
