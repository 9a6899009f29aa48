//! Catalog loader.
//!
//! # Responsibility
//! - Write every catalog entry into the problems collection under its id.
//! - Log one outcome per entry and a final count.
//!
//! # Invariants
//! - Entries are written one at a time, in catalog order.
//! - A failed write never stops the batch; there is no retry or rollback.
//! - `SeedReport::attempted` counts entries attempted, not entries written.

use crate::catalog::Catalog;
use crate::logging::sanitize_message;
use crate::model::problem::{Problem, ProblemId};
use crate::store::{DocumentStore, StoreResult, PROBLEMS_COLLECTION};
use log::{error, info};
use std::time::Instant;
use uuid::Uuid;

const MAX_LOGGED_ERROR_CHARS: usize = 300;

/// One entry whose write failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFailure {
    pub id: ProblemId,
    pub title: String,
    pub error: String,
}

/// Outcome of one loader run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Correlates every log line of the run.
    pub run_id: Uuid,
    pub attempted: usize,
    pub written: Vec<ProblemId>,
    pub failures: Vec<SeedFailure>,
}

impl SeedReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loader over any document store backend.
pub struct SeedService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> SeedService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes every catalog entry, isolating per-entry failures.
    ///
    /// # Side effects
    /// - Mutates persisted state in the backing store.
    /// - Emits `seed_start`, one `seed_entry` per entry and `seed_done`.
    pub fn seed(&self, catalog: &Catalog) -> SeedReport {
        let run_id = Uuid::new_v4();
        let started_at = Instant::now();
        let backend = self.store.backend_name();
        info!(
            "event=seed_start module=seed status=start run_id={run_id} backend={backend} collection={PROBLEMS_COLLECTION} entries={}",
            catalog.len()
        );

        let mut report = SeedReport {
            run_id,
            attempted: 0,
            written: Vec::with_capacity(catalog.len()),
            failures: Vec::new(),
        };

        for problem in catalog {
            report.attempted += 1;
            match self.write_problem(problem) {
                Ok(()) => {
                    info!(
                        "event=seed_entry module=seed status=ok run_id={run_id} id={} title={:?}",
                        problem.id, problem.title
                    );
                    report.written.push(problem.id.clone());
                }
                Err(err) => {
                    let message = sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS);
                    error!(
                        "event=seed_entry module=seed status=error run_id={run_id} error_code=write_failed id={} title={:?} error={}",
                        problem.id, problem.title, message
                    );
                    report.failures.push(SeedFailure {
                        id: problem.id.clone(),
                        title: problem.title.clone(),
                        error: message,
                    });
                }
            }
        }

        info!(
            "event=seed_done module=seed status=ok run_id={run_id} attempted={} written={} failed={} duration_ms={}",
            report.attempted,
            report.written.len(),
            report.failures.len(),
            started_at.elapsed().as_millis()
        );
        report
    }

    fn write_problem(&self, problem: &Problem) -> StoreResult<()> {
        let document = serde_json::to_value(problem)?;
        self.store
            .set_document(PROBLEMS_COLLECTION, &problem.id, &document)
    }
}

#[cfg(test)]
mod tests {
    use super::SeedService;
    use crate::catalog::Catalog;
    use crate::store::{MemoryDocumentStore, PROBLEMS_COLLECTION};

    #[test]
    fn seeds_every_entry_in_order() {
        let catalog = Catalog::from_json(
            r#"[
                {"id": "b", "title": "B", "description": "", "categories": ["X"]},
                {"id": "a", "title": "A", "description": "", "categories": ["X"]}
            ]"#,
        )
        .unwrap();
        let service = SeedService::new(MemoryDocumentStore::new());

        let report = service.seed(&catalog);

        assert_eq!(report.attempted, 2);
        assert_eq!(report.written, vec!["b".to_string(), "a".to_string()]);
        assert!(report.is_complete());
        assert_eq!(service.store().keys(PROBLEMS_COLLECTION), vec!["a", "b"]);
    }

    #[test]
    fn each_run_gets_a_fresh_run_id() {
        let catalog = Catalog::from_entries(Vec::new()).unwrap();
        let service = SeedService::new(MemoryDocumentStore::new());

        let first = service.seed(&catalog);
        let second = service.seed(&catalog);

        assert_eq!(first.attempted, 0);
        assert_ne!(first.run_id, second.run_id);
    }
}
