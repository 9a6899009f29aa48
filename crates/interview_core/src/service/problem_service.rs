//! Read path for client applications.
//!
//! # Invariants
//! - Reads address the fixed problems collection by id only; there is no
//!   query or filtering surface.
//! - Stored documents that do not decode as `Problem` are errors, not `None`.

use crate::model::problem::Problem;
use crate::store::{DocumentStore, StoreError, StoreResult, PROBLEMS_COLLECTION};

/// Keyed problem reader over a document store.
pub struct ProblemService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> ProblemService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetches one problem by id.
    pub fn get_problem(&self, id: &str) -> StoreResult<Option<Problem>> {
        let Some(document) = self.store.get_document(PROBLEMS_COLLECTION, id)? else {
            return Ok(None);
        };

        let problem: Problem = serde_json::from_value(document).map_err(|err| {
            StoreError::InvalidDocument(format!(
                "`{PROBLEMS_COLLECTION}/{id}` is not a problem: {err}"
            ))
        })?;
        Ok(Some(problem))
    }
}

#[cfg(test)]
mod tests {
    use super::ProblemService;
    use crate::store::{DocumentStore, MemoryDocumentStore, StoreError, PROBLEMS_COLLECTION};
    use serde_json::json;

    #[test]
    fn missing_problem_is_none() {
        let service = ProblemService::new(MemoryDocumentStore::new());
        assert!(service.get_problem("nope").unwrap().is_none());
    }

    #[test]
    fn undecodable_document_is_an_error() {
        let store = MemoryDocumentStore::new();
        store
            .set_document(PROBLEMS_COLLECTION, "broken", &json!({"title": 7}))
            .unwrap();

        let err = ProblemService::new(&store).get_problem("broken").unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }
}
