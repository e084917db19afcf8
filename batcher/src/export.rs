//! # Grade Export
//!
//! Turns batch grades into per-student results.
//!
//! Every member of a batch inherits the batch's grade and comments. [`pivot`] arranges those
//! entries into a [`GradeSheet`] (one row per student, one column per question), filling gaps with
//! a grade of 0 and [`MISSING_RESPONSE_COMMENT`]. [`export`] then writes the sheet through an
//! [`ExportSink`]:
//!
//! - a grades table `<assignment>.csv` with a `Student ID` column, one column per question and a
//!   `Total` column;
//! - one feedback document per student, listing each question's grade and comments.
//!
//! Exporting is idempotent: the assignment's previous feedback documents are cleared first.

use crate::error::BatcherError;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Comment given to a student with no graded response for a question.
pub const MISSING_RESPONSE_COMMENT: &str = "Did not find a response for this question.";

/// A grade inherited by one student from the batch their response is in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeEntry {
    pub student_id: i64,
    pub question_id: i64,
    pub grade: i64,
    pub comments: String,
}

/// A question as it appears in the grades table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionColumn {
    pub question_id: i64,
    pub name: String,
    pub max_grade: i64,
}

/// One student's grade and comments for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub grade: i64,
    pub comments: String,
}

impl Cell {
    fn missing() -> Self {
        Self {
            grade: 0,
            comments: MISSING_RESPONSE_COMMENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRow {
    pub student_id: i64,
    /// One cell per column of the owning [`GradeSheet`], in column order.
    pub cells: Vec<Cell>,
}

impl StudentRow {
    pub fn total(&self) -> i64 {
        self.cells.iter().map(|c| c.grade).sum()
    }
}

/// Pivoted grades for one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeSheet {
    pub columns: Vec<QuestionColumn>,
    pub rows: Vec<StudentRow>,
}

/// Pivot grade entries into a sheet.
///
/// Columns are `questions` ordered by name (ties by id). Rows are every student in `roster` or in
/// `entries`, in ascending id order. Entries for questions not in `questions` are ignored.
///
/// # Errors
///
/// Returns [`BatcherError::DuplicateEntry`] if a student has two entries for the same question.
pub fn pivot(
    questions: &[QuestionColumn],
    entries: &[GradeEntry],
    roster: &[i64],
) -> Result<GradeSheet, BatcherError> {
    let mut columns = questions.to_vec();
    columns.sort_by(|a, b| a.name.cmp(&b.name).then(a.question_id.cmp(&b.question_id)));

    let column_of: HashMap<i64, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.question_id, i))
        .collect();

    let mut students: BTreeSet<i64> = roster.iter().copied().collect();
    let mut found: BTreeMap<(i64, usize), &GradeEntry> = BTreeMap::new();

    for entry in entries {
        let Some(&column) = column_of.get(&entry.question_id) else {
            warn!(
                student_id = entry.student_id,
                question_id = entry.question_id,
                "Ignoring grade for a question outside the assignment"
            );
            continue;
        };
        students.insert(entry.student_id);
        if found.insert((entry.student_id, column), entry).is_some() {
            return Err(BatcherError::DuplicateEntry {
                student_id: entry.student_id,
                question: columns[column].name.clone(),
            });
        }
    }

    let rows = students
        .into_iter()
        .map(|student_id| StudentRow {
            student_id,
            cells: (0..columns.len())
                .map(|column| match found.get(&(student_id, column)) {
                    Some(entry) => Cell {
                        grade: entry.grade,
                        comments: entry.comments.clone(),
                    },
                    None => Cell::missing(),
                })
                .collect(),
        })
        .collect();

    Ok(GradeSheet { columns, rows })
}

/// Feedback document for one row of `sheet`.
pub fn feedback_for(sheet: &GradeSheet, row: &StudentRow) -> String {
    sheet
        .columns
        .iter()
        .zip(&row.cells)
        .map(|(column, cell)| {
            format!(
                "{}\nGrade: {}/{}\nComments: {}\n",
                column.name, cell.grade, column.max_grade, cell.comments
            )
        })
        .collect()
}

/// Write the grades table as CSV.
pub fn write_grades_csv<W: Write>(sheet: &GradeSheet, writer: W) -> Result<(), BatcherError> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["Student ID".to_string()];
    header.extend(sheet.columns.iter().map(|c| c.name.clone()));
    header.push("Total".to_string());
    csv.write_record(&header)?;

    for row in &sheet.rows {
        let mut record = vec![row.student_id.to_string()];
        record.extend(row.cells.iter().map(|c| c.grade.to_string()));
        record.push(row.total().to_string());
        csv.write_record(&record)?;
    }

    csv.flush()
        .map_err(|e| BatcherError::Export(format!("failed to flush grades table: {e}")))
}

/// Destination for exported grades and feedback.
pub trait ExportSink {
    /// Remove every feedback document previously written for `assignment`.
    fn clear_feedback(&self, assignment: &str) -> Result<(), BatcherError>;

    fn write_grades(&self, assignment: &str, sheet: &GradeSheet) -> Result<(), BatcherError>;

    fn write_feedback(
        &self,
        assignment: &str,
        student_id: i64,
        document: &str,
    ) -> Result<(), BatcherError>;
}

/// Writes grades to `<grades_root>/<assignment>/<assignment>.csv` and feedback to
/// `<feedback_root>/<assignment>/<student_id>.txt`.
#[derive(Debug, Clone)]
pub struct FsExportSink {
    pub grades_root: PathBuf,
    pub feedback_root: PathBuf,
}

impl FsExportSink {
    pub fn new(grades_root: impl Into<PathBuf>, feedback_root: impl Into<PathBuf>) -> Self {
        Self {
            grades_root: grades_root.into(),
            feedback_root: feedback_root.into(),
        }
    }

    pub fn grades_path(&self, assignment: &str) -> PathBuf {
        self.grades_root
            .join(assignment)
            .join(format!("{assignment}.csv"))
    }

    pub fn feedback_path(&self, assignment: &str, student_id: i64) -> PathBuf {
        self.feedback_root
            .join(assignment)
            .join(format!("{student_id}.txt"))
    }
}

fn ensure_parent(path: &Path) -> Result<(), BatcherError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BatcherError::io(parent, e))?;
    }
    Ok(())
}

impl ExportSink for FsExportSink {
    fn clear_feedback(&self, assignment: &str) -> Result<(), BatcherError> {
        let dir = self.feedback_root.join(assignment);
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(&dir).map_err(|e| BatcherError::io(&dir, e))? {
            let path = entry.map_err(|e| BatcherError::io(&dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
                fs::remove_file(&path).map_err(|e| BatcherError::io(&path, e))?;
            }
        }
        Ok(())
    }

    fn write_grades(&self, assignment: &str, sheet: &GradeSheet) -> Result<(), BatcherError> {
        let path = self.grades_path(assignment);
        ensure_parent(&path)?;
        let file = fs::File::create(&path).map_err(|e| BatcherError::io(&path, e))?;
        write_grades_csv(sheet, file)
    }

    fn write_feedback(
        &self,
        assignment: &str,
        student_id: i64,
        document: &str,
    ) -> Result<(), BatcherError> {
        let path = self.feedback_path(assignment, student_id);
        ensure_parent(&path)?;
        fs::write(&path, document).map_err(|e| BatcherError::io(&path, e))
    }
}

/// Write `sheet` for `assignment` through `sink`. Returns the number of feedback documents written.
pub fn export(
    sink: &dyn ExportSink,
    assignment: &str,
    sheet: &GradeSheet,
) -> Result<usize, BatcherError> {
    sink.clear_feedback(assignment)?;
    sink.write_grades(assignment, sheet)?;

    for row in &sheet.rows {
        sink.write_feedback(assignment, row.student_id, &feedback_for(sheet, row))?;
    }

    info!(
        assignment = assignment,
        students = sheet.rows.len(),
        questions = sheet.columns.len(),
        "Exported grades"
    );
    Ok(sheet.rows.len())
}
