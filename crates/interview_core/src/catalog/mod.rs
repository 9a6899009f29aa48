//! Catalog Definition: the authored, ordered set of problems.
//!
//! # Responsibility
//! - Parse the embedded problem data (or an alternate JSON file).
//! - Reject invalid records and duplicate ids before any write happens.
//!
//! # Invariants
//! - A constructed `Catalog` has unique, validated ids.
//! - Entry order is the authored order.

use crate::model::problem::{Problem, ProblemValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const BUILTIN_CATALOG_JSON: &str = include_str!("problems.json");

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug)]
pub enum CatalogError {
    Parse(serde_json::Error),
    InvalidEntry {
        index: usize,
        id: String,
        source: ProblemValidationError,
    },
    DuplicateId(String),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "catalog is not valid problem JSON: {err}"),
            Self::InvalidEntry { index, id, source } => {
                write!(f, "catalog entry #{index} (`{id}`) is invalid: {source}")
            }
            Self::DuplicateId(id) => write!(f, "catalog id `{id}` is defined more than once"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidEntry { source, .. } => Some(source),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Validated, ordered problem catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<Problem>,
}

impl Catalog {
    /// Loads the catalog compiled into this crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_json(BUILTIN_CATALOG_JSON)
    }

    /// Parses a JSON array of problems and validates it.
    pub fn from_json(text: &str) -> CatalogResult<Self> {
        let entries: Vec<Problem> = serde_json::from_str(text)?;
        Self::from_entries(entries)
    }

    /// Validates already-built entries.
    ///
    /// # Errors
    /// - `InvalidEntry` for the first record failing `Problem::validate`.
    /// - `DuplicateId` for the first id seen twice.
    pub fn from_entries(entries: Vec<Problem>) -> CatalogResult<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            entry
                .validate()
                .map_err(|source| CatalogError::InvalidEntry {
                    index,
                    id: entry.id.clone(),
                    source,
                })?;
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Problem> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.id.as_str()).collect()
    }

    /// Distinct category tags in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .flat_map(|entry| entry.categories.iter())
            .map(String::as_str)
            .filter(|category| seen.insert(*category))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
