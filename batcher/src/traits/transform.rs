//! Transform Trait
//!
//! This module defines the [`Transform`] trait: a narrow `(student_id, data) -> data` capability
//! that normalises a decoded response before it is compared.
//!
//! A transform is resolved once per batching run and handed to the engine. Every call is isolated:
//! a failing call returns an error for that call only, and the engine falls back to the raw data.
//!
//! # Example
//!
//! ```rust
//! use batcher::error::BatcherError;
//! use batcher::traits::transform::Transform;
//! use batcher::types::ResponseValue;
//!
//! struct Lowercase;
//!
//! impl Transform for Lowercase {
//!     fn name(&self) -> &str { "lowercase" }
//!     fn version(&self) -> &str { "1" }
//!     fn apply(&self, _student_id: i64, value: &ResponseValue) -> Result<ResponseValue, BatcherError> {
//!         match value {
//!             ResponseValue::Text(s) => Ok(ResponseValue::Text(s.to_lowercase())),
//!             other => Ok(other.clone()),
//!         }
//!     }
//! }
//! ```

use crate::error::BatcherError;
use crate::types::ResponseValue;

/// A grader-supplied preprocessing function.
pub trait Transform: Send + Sync {
    /// The function name the transform was resolved from.
    fn name(&self) -> &str;

    /// A stable identifier of the transform's code, reported with every batching run.
    fn version(&self) -> &str;

    /// Transform the data of one response.
    ///
    /// # Errors
    ///
    /// Returns [`BatcherError::TransformFailed`] when the user code raises or returns a value that
    /// cannot be represented as a [`ResponseValue`].
    fn apply(&self, student_id: i64, value: &ResponseValue) -> Result<ResponseValue, BatcherError>;
}
