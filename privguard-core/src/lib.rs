// privguard-core/src/lib.rs
//! # PrivGuard Core Library
//!
//! `privguard-core` provides the fundamental, platform-independent logic for
//! reversible text anonymization. Heterogeneous detectors (regex patterns,
//! lexicon scans, external NER adapters) produce labeled spans; the engine
//! reconciles them into a non-overlapping cover of the text, substitutes
//! each accepted span with a stable `<LABEL_N>` placeholder, and emits the
//! restoration table that inverts the substitution byte-for-byte.
//!
//! The library is designed to be pure and stateless, focusing solely on the
//! transformation of input text based on detected spans, without concerns
//! for I/O or application-specific state management.
//!
//! ## Modules
//!
//! * `span`: Defines the `Span` data type, offset-unit mapping, and PII-safe logging helpers.
//! * `config`: Defines `PatternRule`s and `DetectionConfig` for specifying regex patterns.
//! * `patterns`: Contains the pattern compiler and its thread-safe cache.
//! * `validators`: Provides programmatic validation for specific data types.
//! * `detector`: Defines the `Detector` trait, enabling a modular design.
//! * `detectors`: Contains concrete implementations of the `Detector` trait.
//! * `reconcile`: Merges span streams into one ordered, non-overlapping accepted set.
//! * `placeholder`: Assigns order-stable, collision-free placeholder tokens.
//! * `engine`: Defines the `Anonymizer`, which runs detection and substitution.
//! * `restore`: Inverts a substitution from the sanitized text and its table.
//! * `table`: Defines the `RestorationTable`, the only externally persistable artifact.
//! * `headless`: Convenience wrappers for one-shot, non-interactive use.
//!
//! ## Public API
//!
//! The public API provides a cohesive set of types and functions for
//! configuring and running an anonymization engine. Key components are
//! organized by functionality:
//!
//! **Configuration & Patterns**
//!
//! * [`DetectionConfig`]: Manages collections of `PatternRule`s, including loading, merging, and filtering.
//! * [`PatternRule`]: Defines a single regex pattern for identifying sensitive content.
//! * [`merge_patterns`]: Merges default and user-defined configurations.
//! * [`DetectionConfig::load_from_file`]: Loads patterns from a YAML file.
//! * [`DetectionConfig::load_default_patterns`]: Loads the built-in pattern set.
//!
//! **Detection & Anonymization**
//!
//! * [`Detector`]: A trait for pluggable span sources.
//! * [`RegexDetector`]: The regex-based `Detector` implementation.
//! * [`LexiconDetector`]: The lexicon (gazetteer) `Detector` implementation.
//! * [`Anonymizer`]: Applies registered detectors and performs the reversible substitution.
//! * [`reconcile`]: The span-reconciliation pass, usable standalone.
//!
//! **Restoration**
//!
//! * [`RestorationTable`]: The placeholder-to-original mapping, serializable as a flat JSON object.
//! * [`restore`]: Replaces every placeholder occurrence with its original content.
//!
//! **Headless Mode**
//!
//! * [`anonymize_string`] / [`restore_string`]: One-shot convenience functions.
//!
//! ## Usage Example
//!
//! ```rust
//! use privguard_core::{Anonymizer, DetectionConfig, RegexDetector, restore};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     // 1. Load the default detection patterns.
//!     let config = DetectionConfig::load_default_patterns()?;
//!
//!     // 2. Build an engine with a regex detector.
//!     let engine = Anonymizer::new().add_detector(Box::new(RegexDetector::new(config)?));
//!
//!     // 3. Anonymize some content.
//!     let input = "Contact John Doe at john.doe@example.com.";
//!     let (sanitized, table) = engine.anonymize(input, "en")?;
//!     assert_eq!(sanitized, "Contact John Doe at <EMAIL_1>.");
//!
//!     // 4. The table inverts the substitution exactly.
//!     assert_eq!(restore(&sanitized, &table), input);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! The library uses `anyhow::Error` for fallible operations and defines
//! specific error types like `PrivguardError::DetectorFailure` for clearer
//! error reporting. A failing detector is fatal for the call that invoked
//! it; malformed spans and restoration key mismatches are handled locally
//! and never abort a call.
//!
//! ## Design Principles
//!
//! * **Pluggable Architecture:** The `Detector` trait allows different
//!   span sources (regex, lexicon, external models) to feed one engine.
//! * **Stateless:** Placeholder counters and restoration tables are scoped
//!   to a single `anonymize` call; nothing is process-wide but the
//!   compiled-pattern cache.
//! * **Reversible:** Substitution and restoration are exact inverses for
//!   every table the engine produces.
//! * **Testable:** Logic is easily unit-testable in isolation.
//!
//! ---
//! License: MIT OR Apache-2.0

// All modules must be declared before they can be used.
pub mod config;
pub mod detector;
pub mod detectors;
pub mod engine;
pub mod errors;
pub mod headless;
pub mod patterns;
pub mod placeholder;
pub mod reconcile;
pub mod restore;
pub mod span;
pub mod table;
pub mod validators;

/// Re-exports the public configuration types and functions for managing detection patterns.
pub use config::{
    merge_patterns,
    validate_patterns,
    DetectionConfig,
    PatternRule,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::PrivguardError;

/// Re-exports the core detector trait.
pub use detector::Detector;

/// Re-exports the concrete `RegexDetector` and `LexiconDetector` implementations.
pub use detectors::regex_detector::RegexDetector;
pub use detectors::lexicon_detector::{EntityLexicon, LexiconDetector};

/// Re-exports the span data type and offset mapping.
pub use span::{redact_sensitive, span_fingerprint, OffsetMap, Span};

/// Re-exports the reconciliation pass.
pub use reconcile::reconcile;

/// Re-exports placeholder allocation.
pub use placeholder::{format_placeholder, PlaceholderAllocator};

/// Re-exports the engine and restoration entry points.
pub use engine::{Anonymizer, DEFAULT_LANGUAGE};
pub use restore::{restore, restore_by_length};
pub use table::RestorationTable;

/// Re-exports functions for one-shot, non-interactive use.
pub use headless::{anonymize_string, restore_string};

// Re-export key types from the patterns::compiler module for advanced usage.
pub use patterns::compiler::{compile_patterns, CompiledPattern, CompiledPatterns};
