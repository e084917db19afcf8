//! A comparator that groups responses only when they are identical.
//!
//! Used for text and symbolic answers: comparison is character-for-character, so case, whitespace
//! and line endings all matter.

use crate::traits::comparator::EquivalenceComparator;
use crate::types::ResponseValue;

/// Equal iff both values are the same kind and hold exactly the same data.
///
/// Text is compared byte for byte. If a preprocessing transform turned the data into numbers, the
/// numbers are compared with exact floating-point equality.
pub struct ExactComparator;

impl EquivalenceComparator for ExactComparator {
    fn equivalent(&self, representative: &ResponseValue, candidate: &ResponseValue) -> bool {
        representative == candidate
    }
}
