//! Regex pattern compilation for PrivGuard.
//!
//! This module is responsible for compiling detection patterns into
//! efficient regular expressions ready to be applied by the regex
//! detector. It works closely with `config` (for pattern definitions),
//! `validators` (for programmatic match validation), and `span` (for
//! logging and result types).

pub mod compiler;
