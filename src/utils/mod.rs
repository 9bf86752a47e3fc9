//! Utility functions shared across glyphsheet
//!
//! Common helpers that don't fit in specialized modules.

pub mod fs;

pub use fs::write_atomic;
