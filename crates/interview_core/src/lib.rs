//! Core of the interview problem catalog.
//! Owns the problem schema, the authored catalog, the document store
//! backends and the loader that seeds them.

pub mod auth;
pub mod catalog;
pub mod client;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use auth::{AuthHandle, GoogleAuthProvider};
pub use catalog::{Catalog, CatalogError, CatalogResult};
pub use client::{AppClient, ClientError};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::problem::{Implementation, Problem, ProblemId, ProblemValidationError};
pub use service::problem_service::ProblemService;
pub use service::seed_service::{SeedFailure, SeedReport, SeedService};
pub use store::{
    DocumentStore, FirestoreDocumentStore, MemoryDocumentStore, SqliteDocumentStore, StoreError,
    StoreResult, PROBLEMS_COLLECTION,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
