//!
//! Response Loader
//!
//! Decodes one submitted response file into a [`ResponseValue`] according to its datatype.
//!
//! # Functionality
//!
//! - Numeric files are comma-delimited tables of floating-point values. Surrounding whitespace is
//!   ignored, as are blank lines and lines starting with `#`. A table holding exactly one value is
//!   unwrapped to [`ResponseValue::Scalar`].
//! - Text and symbolic files are returned verbatim (no trimming, no normalisation).
//!
//! # Error Handling
//!
//! Missing or unreadable files yield [`BatcherError::Io`]; anything that is not a rectangular table
//! of numbers yields [`BatcherError::MalformedNumeric`]. Nothing is ever coerced to zero or empty.

use crate::datatypes::DatatypeKind;
use crate::error::BatcherError;
use crate::types::{Matrix, ResponseValue};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;

/// Location of one response file:
/// `<root>/<assignment_name>/<student_id>/<var_name>.<extension>`.
pub fn submission_path(
    root: &Path,
    assignment_name: &str,
    student_id: i64,
    var_name: &str,
    extension: &str,
) -> PathBuf {
    root.join(assignment_name)
        .join(student_id.to_string())
        .join(format!("{var_name}.{extension}"))
}

/// Read and decode the response stored at `path`.
///
/// # Errors
///
/// Returns [`BatcherError::Io`] if the file cannot be read and [`BatcherError::MalformedNumeric`]
/// if a numeric file does not parse.
pub fn load_value(path: &Path, kind: DatatypeKind) -> Result<ResponseValue, BatcherError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        error!("Failed to read response file {}: {}", path.display(), e);
        BatcherError::io(path, e)
    })?;

    match kind {
        DatatypeKind::Numeric => parse_numeric(path, &contents),
        DatatypeKind::Text | DatatypeKind::Symbolic => Ok(ResponseValue::Text(contents)),
    }
}

/// Parse the contents of a numeric response file.
///
/// `path` is only used for error messages.
pub fn parse_numeric(path: &Path, contents: &str) -> Result<ResponseValue, BatcherError> {
    let malformed = |reason: String| BatcherError::MalformedNumeric {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(contents.as_bytes());

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| malformed(e.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let row_number = rows.len() + 1;
        let row = record
            .iter()
            .map(|field| {
                field.parse::<f64>().map_err(|_| {
                    malformed(format!("row {row_number}: `{field}` is not a number"))
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(malformed("file contains no numeric rows".to_string()));
    }

    let matrix = Matrix::from_rows(rows).map_err(|e| malformed(e.to_string()))?;
    if matrix.len() == 1 {
        return Ok(ResponseValue::Scalar(matrix.values()[0]));
    }
    Ok(ResponseValue::Matrix(matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(contents: &str) -> Result<ResponseValue, BatcherError> {
        parse_numeric(Path::new("x.csv"), contents)
    }

    #[test]
    fn test_row_vector() {
        match parse("1.0,2.0\n").unwrap() {
            ResponseValue::Matrix(m) => {
                assert_eq!(m.shape(), (1, 2));
                assert_eq!(m.values(), &[1.0, 2.0]);
            }
            other => panic!("Expected matrix, got {:?}", other),
        }
    }

    #[test]
    fn test_single_value_unwraps_to_scalar() {
        assert_eq!(parse("5.0\n").unwrap(), ResponseValue::Scalar(5.0));
        assert_eq!(parse("  42  ").unwrap(), ResponseValue::Scalar(42.0));
    }

    #[test]
    fn test_column_vector_and_whitespace() {
        match parse("# header comment\n 1 \n\n2\n3e-1\n").unwrap() {
            ResponseValue::Matrix(m) => {
                assert_eq!(m.shape(), (3, 1));
                assert_eq!(m.values(), &[1.0, 2.0, 0.3]);
            }
            other => panic!("Expected matrix, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_field_is_malformed() {
        match parse("1.0,abc\n") {
            Err(BatcherError::MalformedNumeric { reason, .. }) => {
                assert!(reason.contains("`abc` is not a number"), "got: {reason}")
            }
            other => panic!("Expected MalformedNumeric, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        assert!(matches!(
            parse("1,2\n3\n"),
            Err(BatcherError::MalformedNumeric { .. })
        ));
    }

    #[test]
    fn test_empty_file_is_malformed() {
        assert!(matches!(
            parse(""),
            Err(BatcherError::MalformedNumeric { .. })
        ));
        assert!(matches!(
            parse("\n# nothing here\n"),
            Err(BatcherError::MalformedNumeric { .. })
        ));
    }

    #[test]
    fn test_empty_field_is_malformed() {
        assert!(matches!(
            parse("1,,2\n"),
            Err(BatcherError::MalformedNumeric { .. })
        ));
    }

    #[test]
    fn test_text_is_returned_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("answer.txt");
        fs::write(&path, "  Foo\r\nbar \n").unwrap();

        let value = load_value(&path, DatatypeKind::Text).unwrap();
        assert_eq!(value, ResponseValue::Text("  Foo\r\nbar \n".to_string()));

        let value = load_value(&path, DatatypeKind::Symbolic).unwrap();
        assert_eq!(value, ResponseValue::Text("  Foo\r\nbar \n".to_string()));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        assert!(matches!(
            load_value(&path, DatatypeKind::Numeric),
            Err(BatcherError::Io { .. })
        ));
    }

    #[test]
    fn test_submission_path_convention() {
        let path = submission_path(Path::new("submissions"), "hw1", 1234, "x", "csv");
        assert_eq!(path, PathBuf::from("submissions/hw1/1234/x.csv"));
    }
}
