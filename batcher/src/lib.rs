//! # Batcher Library
//!
//! Core logic for batch grading: student responses to a question are grouped into batches of
//! equivalent answers so a grader assigns one grade and comment per batch instead of per student.
//!
//! ## Key Concepts
//! - **Datatypes**: numeric (`.csv`), text (`.txt`) and symbolic (`.sym`) responses, each with its
//!   own comparison rule ([`datatypes`]).
//! - **Loader**: decodes a response file into a [`types::ResponseValue`] ([`loader`]).
//! - **Preprocessing**: an optional grader-supplied Rhai transform applied to both sides of every
//!   comparison, falling back to raw data when it fails ([`preprocessing`]).
//! - **Comparators**: exact match for text, element-wise tolerance for numbers ([`comparators`]).
//! - **BatchingJob**: greedy first-match partitioning of an ordered list of responses ([`engine`]).
//! - **Export**: pivots batch grades into a grades table and per-student feedback ([`export`]).
//! - **Discovery**: finds the response files students submitted ([`discovery`]).
//!
//! The crate is synchronous and holds no state between calls; persistence lives in the `db` crate
//! and orchestration in `services`.

pub mod comparators;
pub mod datatypes;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod export;
pub mod loader;
pub mod preprocessing;
pub mod traits;
pub mod types;

pub use engine::{BatchingJob, Candidate, Partition, PlannedBatch};
pub use error::BatcherError;
