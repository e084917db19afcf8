use crate::types::ResponseValue;

/// EquivalenceComparator is a strategy trait for deciding whether a candidate response belongs
/// with a batch's representative.
///
/// Implementations must be pure: the same pair of values always yields the same answer.
pub trait EquivalenceComparator: Send + Sync {
    /// Compare the (possibly preprocessed) representative and candidate values.
    fn equivalent(&self, representative: &ResponseValue, candidate: &ResponseValue) -> bool;
}
