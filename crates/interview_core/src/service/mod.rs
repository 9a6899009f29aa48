//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate document store calls into loader and read-path APIs.
//! - Keep the CLI decoupled from storage details.

pub mod problem_service;
pub mod seed_service;
