//! # Preprocessing
//!
//! Applies an optional [`Transform`] to decoded responses before they are compared.
//!
//! The failure policy is fail-open: if the transform fails for either side of a comparison, both
//! sides are compared using their original, untransformed data. The failure is logged and counted,
//! and batching carries on.
//!
//! - [`script_transform`]: transforms written as Rhai scripts, compiled once per batching run.

pub mod script_transform;

use crate::traits::transform::Transform;
use crate::types::ResponseValue;
use std::borrow::Cow;
use tracing::warn;

/// The two sides of a comparison after preprocessing.
#[derive(Debug)]
pub struct PreparedPair<'v> {
    pub representative: Cow<'v, ResponseValue>,
    pub candidate: Cow<'v, ResponseValue>,
    /// `true` when the transform failed and the raw data is being used instead.
    pub fell_back: bool,
}

/// Apply `transform` to both sides of a comparison, each with its own student id.
pub fn prepare_pair<'v>(
    transform: Option<&dyn Transform>,
    representative: (i64, &'v ResponseValue),
    candidate: (i64, &'v ResponseValue),
) -> PreparedPair<'v> {
    let raw = |fell_back| PreparedPair {
        representative: Cow::Borrowed(representative.1),
        candidate: Cow::Borrowed(candidate.1),
        fell_back,
    };

    let Some(transform) = transform else {
        return raw(false);
    };

    let transformed = transform
        .apply(candidate.0, candidate.1)
        .and_then(|c| transform.apply(representative.0, representative.1).map(|r| (r, c)));

    match transformed {
        Ok((r, c)) => PreparedPair {
            representative: Cow::Owned(r),
            candidate: Cow::Owned(c),
            fell_back: false,
        },
        Err(e) => {
            warn!(
                transform = transform.name(),
                version = transform.version(),
                "Preprocessing failed, comparing raw data: {}",
                e
            );
            raw(true)
        }
    }
}

/// Apply `transform` to a single value, falling back to the raw value on failure.
pub fn apply_or_raw<'v>(
    transform: Option<&dyn Transform>,
    student_id: i64,
    value: &'v ResponseValue,
) -> Cow<'v, ResponseValue> {
    match transform.map(|t| (t, t.apply(student_id, value))) {
        None => Cow::Borrowed(value),
        Some((_, Ok(v))) => Cow::Owned(v),
        Some((t, Err(e))) => {
            warn!(
                transform = t.name(),
                version = t.version(),
                "Preprocessing failed, using raw data: {}",
                e
            );
            Cow::Borrowed(value)
        }
    }
}
