//! Candidate classification
//!
//! Collects the audited request types and fans their classification out over
//! worker threads. Each candidate is classified independently; the shared
//! result and failure vectors are append-only and their lock is taken per
//! push, never across reference resolution.

use crate::model::{AnalysisOutcome, Candidate, CandidateFailure, Verdict};
use crate::workspace::Workspace;
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

pub mod candidates;
pub mod handler;
pub mod project;
pub mod refs;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub threads: usize,
}

/// Runs the full analysis: candidate collection, concurrent classification,
/// and the merge into the flagged set. Only Isolated candidates are kept; a
/// candidate whose reference resolution fails is reported in the outcome and
/// never aborts the run.
pub fn run(
    workspace: &Workspace,
    resolver: &dyn refs::ReferenceResolver,
    options: RunOptions,
) -> AnalysisOutcome {
    let started = Instant::now();
    let (candidate_map, coverage) = candidates::collect(workspace);
    let list: Vec<&Candidate> = candidate_map.values().collect();

    let results = Mutex::new(Vec::new());
    let failures = Mutex::new(Vec::new());

    let workers = options.threads.max(1).min(list.len().max(1));
    let chunk_size = list.len().div_ceil(workers).max(1);

    thread::scope(|scope| {
        for chunk in list.chunks(chunk_size) {
            let results = &results;
            let failures = &failures;
            scope.spawn(move || {
                for &candidate in chunk {
                    match refs::classify_candidate(workspace, candidate, resolver) {
                        Ok(result) => {
                            for warning in &result.warnings {
                                eprintln!("Warning: {warning}");
                            }
                            if result.verdict == Verdict::Isolated {
                                results.lock().unwrap().push(result);
                            }
                        }
                        Err(err) => {
                            eprintln!(
                                "Warning: reference resolution failed for {}: {err}",
                                candidate.id.qualname
                            );
                            failures.lock().unwrap().push(CandidateFailure {
                                qualname: candidate.id.qualname.clone(),
                                project: candidate.id.project.clone(),
                                error: err.to_string(),
                            });
                        }
                    }
                }
            });
        }
    });

    AnalysisOutcome {
        isolated: results.into_inner().unwrap(),
        failures: failures.into_inner().unwrap(),
        coverage,
        projects: workspace.projects.len(),
        candidates: list.len(),
        duration_ms: started.elapsed().as_millis() as u64,
    }
}
