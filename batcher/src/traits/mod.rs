//!
//! Traits Module
//!
//! Core seams of the batcher.
//!
//! - [`comparator`]: decides whether two decoded responses are equivalent.
//! - [`transform`]: the grader-supplied preprocessing step applied before comparison.

pub mod comparator;
pub mod transform;
