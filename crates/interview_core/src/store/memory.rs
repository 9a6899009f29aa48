//! In-process document store used for dry runs.

use super::{ensure_valid_key, DocumentStore, StoreResult};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Map-backed store keyed by `(collection, key)`.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RefCell<BTreeMap<(String, String), Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }

    /// Returns stored keys of `collection` in sorted order.
    pub fn keys(&self, collection: &str) -> Vec<String> {
        self.documents
            .borrow()
            .keys()
            .filter(|(stored_collection, _)| stored_collection == collection)
            .map(|(_, key)| key.clone())
            .collect()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn set_document(&self, collection: &str, key: &str, document: &Value) -> StoreResult<()> {
        ensure_valid_key(collection, key)?;
        self.documents
            .borrow_mut()
            .insert((collection.to_string(), key.to_string()), document.clone());
        Ok(())
    }

    fn get_document(&self, collection: &str, key: &str) -> StoreResult<Option<Value>> {
        ensure_valid_key(collection, key)?;
        Ok(self
            .documents
            .borrow()
            .get(&(collection.to_string(), key.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryDocumentStore;
    use crate::store::DocumentStore;
    use serde_json::json;

    #[test]
    fn keys_are_scoped_to_collection() {
        let store = MemoryDocumentStore::new();
        store.set_document("a", "2", &json!({})).unwrap();
        store.set_document("a", "1", &json!({})).unwrap();
        store.set_document("b", "3", &json!({})).unwrap();

        assert_eq!(store.keys("a"), vec!["1".to_string(), "2".to_string()]);
        assert_eq!(store.len(), 3);
    }
}
