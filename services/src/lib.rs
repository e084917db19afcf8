pub mod assignment_service;
pub mod batching_service;
pub mod error;
pub mod grade_service;
pub mod question_service;
pub mod submission_service;

#[cfg(test)]
pub(crate) mod test_support;
