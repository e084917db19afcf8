//! A comparator for numeric answers that tolerates small floating-point differences.
//!
//! Two values match when their shapes are identical and every pair of elements differs by at most
//! the tolerance (`|a - b| <= tolerance`). Only absolute differences are considered.

use crate::traits::comparator::EquivalenceComparator;
use crate::types::ResponseValue;

/// Default per-element tolerance of a question.
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Element-wise numeric comparison with an absolute tolerance.
///
/// **Note:** shapes must match exactly. A scalar never matches a matrix, even a 1x1 one, and a
/// 1x3 row never matches a 3x1 column.
pub struct ToleranceComparator {
    tolerance: f64,
}

impl ToleranceComparator {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    fn close(&self, a: f64, b: f64) -> bool {
        // Equal infinities are close; NaN is never close to anything.
        a == b || (a - b).abs() <= self.tolerance
    }
}

impl Default for ToleranceComparator {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl EquivalenceComparator for ToleranceComparator {
    fn equivalent(&self, representative: &ResponseValue, candidate: &ResponseValue) -> bool {
        match (representative, candidate) {
            (ResponseValue::Scalar(a), ResponseValue::Scalar(b)) => self.close(*a, *b),
            (ResponseValue::Matrix(a), ResponseValue::Matrix(b)) => {
                a.shape() == b.shape()
                    && a
                        .values()
                        .iter()
                        .zip(b.values())
                        .all(|(x, y)| self.close(*x, *y))
            }
            _ => false,
        }
    }
}
