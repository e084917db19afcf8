use crate::config;
use std::path::PathBuf;

/// Global storage root (absolute), from `config::storage_root()`.
/// If relative in env, resolve against current_dir().
pub fn storage_root() -> PathBuf {
    let root = config::storage_root();
    let p = PathBuf::from(root);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

// ─── Input: {STORAGE_ROOT}/submissions/{assignment}/{student_id}/{var}.{ext} ───

pub fn submissions_root() -> PathBuf {
    storage_root().join("submissions")
}

// ─── Output ─────────────────────────────────────────────────────────

/// {STORAGE_ROOT}/grades
pub fn grades_root() -> PathBuf {
    storage_root().join("grades")
}

/// {STORAGE_ROOT}/feedback
pub fn feedback_root() -> PathBuf {
    storage_root().join("feedback")
}

/// {STORAGE_ROOT}/grades/{assignment}/{assignment}.csv
pub fn grades_path(assignment_name: &str) -> PathBuf {
    grades_root()
        .join(assignment_name)
        .join(format!("{assignment_name}.csv"))
}

/// {STORAGE_ROOT}/feedback/{assignment}
pub fn feedback_dir(assignment_name: &str) -> PathBuf {
    feedback_root().join(assignment_name)
}
