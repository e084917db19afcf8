//! Submission discovery.
//!
//! Walks `<root>/<assignment>/<student_id>/<var_name>.<extension>` and reports what each student
//! submitted. Results are ordered by student id and then by file name, so loading the same tree
//! twice creates responses in the same order.

use crate::datatypes::DatatypeRegistry;
use crate::error::BatcherError;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One response file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredResponse {
    pub var_name: String,
    pub extension: String,
    pub datatype_id: i64,
}

/// Everything one student submitted for an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSubmission {
    pub student_id: i64,
    pub responses: Vec<DiscoveredResponse>,
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Discover the submissions of `assignment_name` under `root`.
///
/// Hidden entries are skipped. A missing assignment directory yields no submissions.
///
/// # Errors
///
/// - [`BatcherError::InvalidLayout`] if a student directory name is not an integer or a file has
///   no extension.
/// - [`BatcherError::UnknownExtension`] if a file's extension has no registered datatype.
/// - [`BatcherError::Io`] if a directory cannot be read.
pub fn discover_submissions(
    root: &Path,
    assignment_name: &str,
    registry: &DatatypeRegistry,
) -> Result<Vec<DiscoveredSubmission>, BatcherError> {
    let assignment_dir = root.join(assignment_name);
    if !assignment_dir.is_dir() {
        warn!(
            "No submissions directory for assignment '{}' at {}",
            assignment_name,
            assignment_dir.display()
        );
        return Ok(Vec::new());
    }

    let mut submissions = Vec::new();
    for entry in fs::read_dir(&assignment_dir).map_err(|e| BatcherError::io(&assignment_dir, e))? {
        let entry = entry.map_err(|e| BatcherError::io(&assignment_dir, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) || !path.is_dir() {
            continue;
        }

        let student_id = name.parse::<i64>().map_err(|_| {
            BatcherError::InvalidLayout(format!(
                "student directory `{name}` in assignment '{assignment_name}' is not a student id"
            ))
        })?;

        let mut files = Vec::new();
        for file in fs::read_dir(&path).map_err(|e| BatcherError::io(&path, e))? {
            let file = file.map_err(|e| BatcherError::io(&path, e))?;
            let file_name = file.file_name().to_string_lossy().into_owned();
            if is_hidden(&file_name) || !file.path().is_file() {
                continue;
            }
            files.push(file_name);
        }
        files.sort();

        let responses = files
            .into_iter()
            .map(|file_name| {
                let (var_name, extension) = file_name.rsplit_once('.').ok_or_else(|| {
                    BatcherError::InvalidLayout(format!(
                        "file `{file_name}` of student {student_id} has no extension"
                    ))
                })?;
                let datatype = registry.by_extension(extension)?;
                Ok(DiscoveredResponse {
                    var_name: var_name.to_string(),
                    extension: extension.to_string(),
                    datatype_id: datatype.id,
                })
            })
            .collect::<Result<Vec<_>, BatcherError>>()?;

        debug!(student_id, files = responses.len(), "Discovered submission");
        submissions.push(DiscoveredSubmission {
            student_id,
            responses,
        });
    }

    submissions.sort_by_key(|s| s.student_id);
    Ok(submissions)
}
