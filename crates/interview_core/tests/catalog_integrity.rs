use interview_core::store::is_valid_document_key;
use interview_core::Catalog;
use std::collections::HashSet;

const EXPECTED_CATEGORIES: [&str; 9] = [
    "Array/String Manipulation",
    "Sorting & Searching",
    "Hash Tables/Sets",
    "Trees & Graphs",
    "Recursion & Backtracking",
    "Dynamic Programming",
    "Linked Lists",
    "Stack & Queue",
    "Design Problems",
];

#[test]
fn builtin_catalog_loads() {
    let catalog = Catalog::builtin().unwrap();
    assert_eq!(catalog.len(), 24);
}

#[test]
fn builtin_ids_are_unique_non_empty_document_keys() {
    let catalog = Catalog::builtin().unwrap();
    let mut seen = HashSet::new();

    for problem in &catalog {
        assert!(!problem.id.is_empty());
        assert!(is_valid_document_key(&problem.id), "bad key {}", problem.id);
        assert!(seen.insert(problem.id.as_str()), "duplicate id {}", problem.id);
    }
}

#[test]
fn builtin_categories_cover_expected_tags() {
    let catalog = Catalog::builtin().unwrap();
    assert_eq!(catalog.categories(), EXPECTED_CATEGORIES);
}

#[test]
fn builtin_order_is_authored_order() {
    let catalog = Catalog::builtin().unwrap();
    let ids = catalog.ids();

    assert_eq!(ids.first(), Some(&"find-max-average"));
    assert_eq!(ids.last(), Some(&"random-data-structure"));
}

#[test]
fn running_sum_entry_matches_authored_content() {
    let catalog = Catalog::builtin().unwrap();
    let problem = catalog.get("running-sum").unwrap();

    assert_eq!(problem.title, "Running Sum");
    assert_eq!(problem.categories, vec!["Array/String Manipulation"]);
    assert_eq!(problem.subcategory.as_deref(), Some("Prefix Sum"));

    let implementation = problem.implementation.as_ref().unwrap();
    assert_eq!(implementation.complexity, "Time: O(n) | Space: O(n)");
    assert!(implementation.code.contains("def runningSum"));
    assert!(implementation
        .pythonic_code
        .as_deref()
        .unwrap()
        .contains("accumulate"));
}

#[test]
fn group_anagrams_has_no_subcategory() {
    let catalog = Catalog::builtin().unwrap();
    let problem = catalog.get("group-anagrams").unwrap();

    assert_eq!(problem.subcategory, None);
    assert_eq!(problem.categories, vec!["Hash Tables/Sets"]);
}
