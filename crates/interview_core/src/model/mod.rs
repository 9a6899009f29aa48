//! Catalog domain model.
//!
//! # Responsibility
//! - Define the problem record shared by the loader and the read path.
//!
//! # Invariants
//! - Every record is identified by a stable slug `ProblemId`.
//! - Records are pure data; there is no deletion path.

pub mod problem;
