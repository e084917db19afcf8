//! Rhai-backed preprocessing transforms.
//!
//! A question's preprocessing source is a Rhai script defining an entry function that takes the
//! student id and the decoded data:
//!
//! ```rhai
//! fn fun(student_id, data) {
//!     data.to_lower()
//! }
//! ```
//!
//! Data crosses into the script as a float (scalar), an array of arrays of floats (matrix) or a
//! string (text). The script may return any of those; integers are accepted as scalars and a flat
//! array of numbers becomes a single-row matrix.
//!
//! The script is compiled once into an in-memory AST when the transform is built. Each call runs
//! under an operation limit, so a runaway script fails that call instead of stalling the run.

use crate::error::BatcherError;
use crate::traits::transform::Transform;
use crate::types::{Matrix, ResponseValue};
use rhai::{Array, Dynamic, Engine, Scope, AST};
use sha2::{Digest, Sha256};

/// Entry function looked up when a question does not name one.
pub const DEFAULT_ENTRY_POINT: &str = "fun";

/// Default bound on the number of operations a single transform call may perform.
pub const DEFAULT_MAX_OPERATIONS: u64 = 1_000_000;

/// A compiled preprocessing script.
pub struct ScriptTransform {
    engine: Engine,
    ast: AST,
    entry: String,
    version: String,
}

impl std::fmt::Debug for ScriptTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptTransform")
            .field("entry", &self.entry)
            .field("version", &self.version)
            .finish()
    }
}

impl ScriptTransform {
    /// Compile `source`, using [`DEFAULT_ENTRY_POINT`] and [`DEFAULT_MAX_OPERATIONS`].
    pub fn compile(source: &str) -> Result<Self, BatcherError> {
        Self::compile_with(source, DEFAULT_ENTRY_POINT, DEFAULT_MAX_OPERATIONS)
    }

    /// Compile `source` and resolve `entry` as a two-argument function.
    ///
    /// # Errors
    ///
    /// Returns [`BatcherError::TransformCompile`] if the script does not parse or does not define
    /// `entry(student_id, data)`.
    pub fn compile_with(
        source: &str,
        entry: &str,
        max_operations: u64,
    ) -> Result<Self, BatcherError> {
        let compile_error = |reason: String| BatcherError::TransformCompile {
            name: entry.to_string(),
            reason,
        };

        let mut engine = Engine::new();
        engine.set_max_operations(max_operations);

        let ast = engine
            .compile(source)
            .map_err(|e| compile_error(e.to_string()))?;

        let has_entry = ast
            .iter_functions()
            .any(|f| f.name == entry && f.params.len() == 2);
        if !has_entry {
            return Err(compile_error(format!(
                "script does not define `{entry}(student_id, data)`"
            )));
        }

        let digest = Sha256::digest(source.as_bytes());
        let version = hex::encode(&digest[..6]);

        tracing::debug!(entry = %entry, version = %version, "Compiled preprocessing script");

        Ok(Self {
            engine,
            ast,
            entry: entry.to_string(),
            version,
        })
    }

    fn failed(&self, student_id: i64, reason: impl Into<String>) -> BatcherError {
        BatcherError::TransformFailed {
            name: self.entry.clone(),
            student_id,
            reason: reason.into(),
        }
    }
}

impl Transform for ScriptTransform {
    fn name(&self) -> &str {
        &self.entry
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn apply(&self, student_id: i64, value: &ResponseValue) -> Result<ResponseValue, BatcherError> {
        let mut scope = Scope::new();
        let result = self
            .engine
            .call_fn::<Dynamic>(
                &mut scope,
                &self.ast,
                &self.entry,
                (student_id, to_dynamic(value)),
            )
            .map_err(|e| self.failed(student_id, e.to_string()))?;

        from_dynamic(result).map_err(|reason| self.failed(student_id, reason))
    }
}

/// Convert a decoded response into a script value.
fn to_dynamic(value: &ResponseValue) -> Dynamic {
    match value {
        ResponseValue::Scalar(v) => Dynamic::from_float(*v),
        ResponseValue::Text(s) => Dynamic::from(s.clone()),
        ResponseValue::Matrix(m) => {
            let rows: Array = m
                .rows()
                .map(|row| Dynamic::from_array(row.iter().map(|v| Dynamic::from_float(*v)).collect()))
                .collect();
            Dynamic::from_array(rows)
        }
    }
}

fn number(value: &Dynamic) -> Option<f64> {
    if let Ok(f) = value.as_float() {
        return Some(f);
    }
    value.as_int().ok().map(|i| i as f64)
}

/// Convert a script's return value back into a response value.
fn from_dynamic(value: Dynamic) -> Result<ResponseValue, String> {
    if let Some(n) = number(&value) {
        return Ok(ResponseValue::Scalar(n));
    }

    if value.is_string() {
        return value
            .into_string()
            .map(ResponseValue::Text)
            .map_err(|t| format!("cannot read string result: {t}"));
    }

    if value.is_array() {
        let type_name = value.type_name();
        let items = value
            .into_array()
            .map_err(|t| format!("cannot read array result ({type_name}): {t}"))?;

        let rows = if items.iter().all(Dynamic::is_array) {
            items
                .into_iter()
                .map(|row| {
                    row.into_array()
                        .map_err(|t| format!("cannot read row: {t}"))?
                        .iter()
                        .map(|v| number(v).ok_or_else(|| format!("non-numeric element of type {}", v.type_name())))
                        .collect::<Result<Vec<f64>, String>>()
                })
                .collect::<Result<Vec<Vec<f64>>, String>>()?
        } else {
            let row = items
                .iter()
                .map(|v| number(v).ok_or_else(|| format!("non-numeric element of type {}", v.type_name())))
                .collect::<Result<Vec<f64>, String>>()?;
            vec![row]
        };

        return Matrix::from_rows(rows)
            .map(ResponseValue::Matrix)
            .map_err(|e| e.to_string());
    }

    Err(format!("unsupported return type `{}`", value.type_name()))
}
