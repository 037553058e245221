// privguard-core/src/detectors/mod.rs
//! This module contains the built-in `Detector` implementations.
//!
//! Each detector is a separate file within this directory and implements
//! the `Detector` trait. This modular design allows for easy addition of
//! new detector types, such as adapters for external NER backends.
//!
//! To add a new detector, create a new file (e.g., `lexicon_detector.rs`),
//! define its logic, and declare it here using `pub mod <detector_name>;`.

pub mod regex_detector;
pub mod lexicon_detector;
