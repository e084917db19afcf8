pub mod assignments_test;
pub mod batches_test;
pub mod grades_test;
pub mod health_test;
pub mod questions_test;
