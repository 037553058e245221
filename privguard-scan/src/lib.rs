// privguard-scan/src/lib.rs
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod automaton;

pub use automaton::{PatternMatch, PatternSet, PatternSetError};
