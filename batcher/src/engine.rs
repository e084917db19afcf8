//! # Batching Engine
//!
//! Partitions the responses to one question into batches of equivalent answers.
//!
//! ## Algorithm
//!
//! Candidates are processed in the order they are given. Each one is compared against the
//! representative (first member) of every batch created so far, in creation order, and joins the
//! **first** batch that matches. If none matches, it opens a new batch and becomes its
//! representative. Later members are never compared with each other.
//!
//! The result depends only on the candidate order, so callers must pass a reproducible order
//! (the service layer uses ascending response id, which follows submission discovery order).
//!
//! ## Failures
//!
//! - A candidate whose file cannot be decoded is placed in a batch of its own and reported in
//!   [`Partition::decode_failures`]. Such a batch never matches anything else.
//! - A transform failure falls back to raw data for that comparison (see [`crate::preprocessing`])
//!   and is counted in [`Partition::transform_fallbacks`].

use crate::comparators::comparator_for;
use crate::datatypes::{DatatypeKind, DatatypeRegistry};
use crate::error::BatcherError;
use crate::loader::load_value;
use crate::preprocessing::prepare_pair;
use crate::traits::comparator::EquivalenceComparator;
use crate::traits::transform::Transform;
use crate::types::ResponseValue;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// One response queued for batching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub response_id: i64,
    pub student_id: i64,
    pub datatype_id: i64,
    /// Where the response's data is read from.
    pub path: PathBuf,
}

/// A batch produced by a run. `members[0]` is the representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedBatch {
    pub datatype_id: i64,
    pub members: Vec<i64>,
}

impl PlannedBatch {
    pub fn representative(&self) -> i64 {
        self.members[0]
    }
}

/// A response that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub response_id: i64,
    pub student_id: i64,
    pub reason: String,
}

/// Outcome of a batching run.
#[derive(Debug, Default)]
pub struct Partition {
    /// Batches in creation order.
    pub batches: Vec<PlannedBatch>,
    pub decode_failures: Vec<DecodeFailure>,
    /// Number of comparisons that fell back to raw data because the transform failed.
    pub transform_fallbacks: usize,
}

impl Partition {
    pub fn response_count(&self) -> usize {
        self.batches.iter().map(|b| b.members.len()).sum()
    }
}

/// Batch under construction: its plan plus the index of its representative candidate.
struct OpenBatch {
    plan: PlannedBatch,
    representative: usize,
}

/// A batching run over the responses to one question.
///
/// # Fields
/// - `registry`: datatypes the candidates reference.
/// - `tolerance`: per-element tolerance for numeric answers.
/// - `transform`: optional preprocessing applied to both sides of every comparison.
pub struct BatchingJob<'a> {
    registry: &'a DatatypeRegistry,
    tolerance: f64,
    transform: Option<&'a dyn Transform>,
}

impl<'a> BatchingJob<'a> {
    pub fn new(registry: &'a DatatypeRegistry, tolerance: f64) -> Self {
        Self {
            registry,
            tolerance,
            transform: None,
        }
    }

    /// Set the preprocessing transform for this run.
    pub fn with_transform(mut self, transform: &'a dyn Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Partition `candidates`, processed in slice order.
    pub fn run(&self, candidates: &[Candidate]) -> Partition {
        let mut partition = Partition::default();
        let mut open: Vec<OpenBatch> = Vec::new();
        let mut comparators: HashMap<i64, Box<dyn EquivalenceComparator>> = HashMap::new();

        let values: Vec<Option<ResponseValue>> = candidates
            .iter()
            .map(|c| match self.decode(c) {
                Ok(v) => Some(v),
                Err(e) => {
                    let reason = e.to_string();
                    warn!(
                        response_id = c.response_id,
                        student_id = c.student_id,
                        "Response could not be decoded and will be batched alone: {}",
                        reason
                    );
                    partition.decode_failures.push(DecodeFailure {
                        response_id: c.response_id,
                        student_id: c.student_id,
                        reason,
                    });
                    None
                }
            })
            .collect();

        for (index, candidate) in candidates.iter().enumerate() {
            let found = match &values[index] {
                Some(value) => open.iter_mut().find(|batch| {
                    self.matches(
                        &candidates[batch.representative],
                        values[batch.representative].as_ref(),
                        candidate,
                        value,
                        &mut comparators,
                        &mut partition.transform_fallbacks,
                    )
                }),
                None => None,
            };

            match found {
                Some(batch) => batch.plan.members.push(candidate.response_id),
                None => {
                    debug!(
                        response_id = candidate.response_id,
                        batch_index = open.len(),
                        "Opening new batch"
                    );
                    open.push(OpenBatch {
                        plan: PlannedBatch {
                            datatype_id: candidate.datatype_id,
                            members: vec![candidate.response_id],
                        },
                        representative: index,
                    });
                }
            }
        }

        partition.batches = open.into_iter().map(|b| b.plan).collect();

        info!(
            responses = candidates.len(),
            batches = partition.batches.len(),
            decode_failures = partition.decode_failures.len(),
            transform_fallbacks = partition.transform_fallbacks,
            "Batching run complete"
        );

        partition
    }

    fn decode(&self, candidate: &Candidate) -> Result<ResponseValue, BatcherError> {
        let datatype = self
            .registry
            .by_id(candidate.datatype_id)
            .ok_or(BatcherError::UnknownDatatype(candidate.datatype_id))?;
        // Unknown kinds are read as raw text; their comparator never matches.
        let kind = datatype.kind().unwrap_or(DatatypeKind::Text);
        load_value(&candidate.path, kind)
    }

    fn matches(
        &self,
        representative: &Candidate,
        representative_value: Option<&ResponseValue>,
        candidate: &Candidate,
        candidate_value: &ResponseValue,
        comparators: &mut HashMap<i64, Box<dyn EquivalenceComparator>>,
        fallbacks: &mut usize,
    ) -> bool {
        if representative.datatype_id != candidate.datatype_id {
            return false;
        }
        let Some(representative_value) = representative_value else {
            return false;
        };
        let Some(datatype) = self.registry.by_id(candidate.datatype_id) else {
            return false;
        };

        let comparator = comparators
            .entry(datatype.id)
            .or_insert_with(|| comparator_for(datatype, self.tolerance));

        let pair = prepare_pair(
            self.transform,
            (representative.student_id, representative_value),
            (candidate.student_id, candidate_value),
        );
        if pair.fell_back {
            *fallbacks += 1;
        }

        comparator.equivalent(&pair.representative, &pair.candidate)
    }
}
