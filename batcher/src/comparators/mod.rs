//! # Comparators
//!
//! This module provides the equivalence rules used to group student responses. Each comparator
//! implements [`EquivalenceComparator`], and [`comparator_for`] picks the right one for a datatype.
//!
//! The available comparators are:
//! - [`exact_comparator`]: text and symbolic answers, equal only when identical.
//! - [`tolerance_comparator`]: numeric answers, equal when shapes match and every element is within
//!   the question's tolerance.
//! - [`UnsupportedComparator`]: any other datatype, never equal.

pub mod exact_comparator;
pub mod tolerance_comparator;

use crate::datatypes::{Datatype, DatatypeKind};
use crate::traits::comparator::EquivalenceComparator;
use crate::types::ResponseValue;
use exact_comparator::ExactComparator;
use tolerance_comparator::ToleranceComparator;

/// Comparator for datatypes the batcher has no rule for.
pub struct UnsupportedComparator;

impl EquivalenceComparator for UnsupportedComparator {
    fn equivalent(&self, _representative: &ResponseValue, _candidate: &ResponseValue) -> bool {
        false
    }
}

/// Select the comparator for `datatype`, using `tolerance` for numeric data.
pub fn comparator_for(datatype: &Datatype, tolerance: f64) -> Box<dyn EquivalenceComparator> {
    match datatype.kind() {
        Some(DatatypeKind::Numeric) => Box::new(ToleranceComparator::new(tolerance)),
        Some(DatatypeKind::Text) | Some(DatatypeKind::Symbolic) => Box::new(ExactComparator),
        None => {
            tracing::warn!(
                datatype = %datatype.name,
                "No comparison rule for datatype; responses will never batch together"
            );
            Box::new(UnsupportedComparator)
        }
    }
}
