//! Problem domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record stored as one document per problem.
//! - Validate authoring-time invariants before a record reaches storage.
//!
//! # Invariants
//! - `id` is a stable slug and doubles as the document key.
//! - Absent optional fields are omitted from serialized documents.
//! - Code samples are opaque text and never interpreted.

use crate::store::is_valid_document_key;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static PROBLEM_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid problem id regex"));

/// Stable slug identifier; also the document key in the store.
pub type ProblemId = String;

/// Catalog entry describing one interview problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: ProblemId,
    pub title: String,
    pub description: String,
    /// Ordered category tags. Tags repeat across problems.
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// `None` for pure-description entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<Implementation>,
}

/// Reference solution attached to a problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Implementation {
    /// Free-text time/space summary, e.g. `Time: O(n) | Space: O(1)`.
    pub complexity: String,
    pub notes: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pythonic_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pythonic_notes: Option<String>,
}

/// Validation failures for problem records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemValidationError {
    EmptyId,
    InvalidId(String),
    EmptyTitle,
    NoCategories,
    BlankCategory { index: usize },
    EmptyCode,
}

impl Display for ProblemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "problem id cannot be empty"),
            Self::InvalidId(id) => write!(
                f,
                "problem id `{id}` must be a lowercase slug usable as a document key"
            ),
            Self::EmptyTitle => write!(f, "problem title cannot be empty"),
            Self::NoCategories => write!(f, "problem must have at least one category"),
            Self::BlankCategory { index } => write!(f, "category at index {index} is blank"),
            Self::EmptyCode => write!(f, "implementation code cannot be empty"),
        }
    }
}

impl Error for ProblemValidationError {}

impl Problem {
    /// Creates a pure-description problem with no implementation.
    pub fn new(
        id: impl Into<ProblemId>,
        title: impl Into<String>,
        description: impl Into<String>,
        categories: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            categories,
            subcategory: None,
            implementation: None,
        }
    }

    /// Validates authoring invariants.
    ///
    /// # Errors
    /// - `EmptyId` / `InvalidId` when `id` is not a slug or not a legal key.
    /// - `EmptyTitle` when `title` is blank.
    /// - `NoCategories` / `BlankCategory` for missing or blank tags.
    /// - `EmptyCode` when an implementation carries no code.
    pub fn validate(&self) -> Result<(), ProblemValidationError> {
        if self.id.is_empty() {
            return Err(ProblemValidationError::EmptyId);
        }
        if !PROBLEM_ID_RE.is_match(&self.id) || !is_valid_document_key(&self.id) {
            return Err(ProblemValidationError::InvalidId(self.id.clone()));
        }
        if self.title.trim().is_empty() {
            return Err(ProblemValidationError::EmptyTitle);
        }
        if self.categories.is_empty() {
            return Err(ProblemValidationError::NoCategories);
        }
        if let Some(index) = self
            .categories
            .iter()
            .position(|category| category.trim().is_empty())
        {
            return Err(ProblemValidationError::BlankCategory { index });
        }
        if let Some(implementation) = &self.implementation {
            if implementation.code.trim().is_empty() {
                return Err(ProblemValidationError::EmptyCode);
            }
        }

        Ok(())
    }

    /// Returns whether this entry carries a reference solution.
    pub fn has_implementation(&self) -> bool {
        self.implementation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Implementation, Problem, ProblemValidationError};
    use serde_json::json;

    fn sample() -> Problem {
        let mut problem = Problem::new(
            "running-sum",
            "Running Sum",
            "Return the running sum of the array.",
            vec!["Array/String Manipulation".to_string()],
        );
        problem.subcategory = Some("Prefix Sum".to_string());
        problem.implementation = Some(Implementation {
            complexity: "Time: O(n) | Space: O(n)".to_string(),
            notes: String::new(),
            code: "return list(accumulate(nums))".to_string(),
            pythonic_code: Some(String::new()),
            pythonic_notes: None,
        });
        problem
    }

    #[test]
    fn serializes_with_camel_case_and_omits_absent_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        let implementation = &value["implementation"];

        assert_eq!(implementation["pythonicCode"], json!(""));
        assert!(implementation.get("pythonicNotes").is_none());
        assert!(implementation.get("pythonic_code").is_none());
    }

    #[test]
    fn description_only_entry_has_no_implementation_key() {
        let problem = Problem::new(
            "two-sum",
            "Two Sum",
            "Find a pair.",
            vec!["Hash Tables/Sets".into()],
        );
        let value = serde_json::to_value(&problem).unwrap();

        assert!(value.get("implementation").is_none());
        assert!(value.get("subcategory").is_none());
        assert!(!problem.has_implementation());
    }

    #[test]
    fn null_subcategory_deserializes_as_absent() {
        let problem: Problem = serde_json::from_value(json!({
            "id": "group-anagrams",
            "title": "Group Anagrams",
            "description": "Group words.",
            "categories": ["Hash Tables/Sets"],
            "subcategory": null
        }))
        .unwrap();

        assert_eq!(problem.subcategory, None);
    }

    #[test]
    fn validate_accepts_sample() {
        sample().validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_ids() {
        let mut problem = sample();
        problem.id = String::new();
        assert_eq!(problem.validate(), Err(ProblemValidationError::EmptyId));

        for bad in ["Running-Sum", "running/sum", "__meta__", "-lead", "a--b"] {
            problem.id = bad.to_string();
            assert_eq!(
                problem.validate(),
                Err(ProblemValidationError::InvalidId(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_blank_category_and_code() {
        let mut problem = sample();
        problem.categories.push("  ".to_string());
        assert_eq!(
            problem.validate(),
            Err(ProblemValidationError::BlankCategory { index: 1 })
        );

        let mut problem = sample();
        problem.categories.clear();
        assert_eq!(problem.validate(), Err(ProblemValidationError::NoCategories));

        let mut problem = sample();
        if let Some(implementation) = problem.implementation.as_mut() {
            implementation.code = "\n".to_string();
        }
        assert_eq!(problem.validate(), Err(ProblemValidationError::EmptyCode));
    }
}
