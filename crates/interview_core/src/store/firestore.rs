//! Firestore REST v1 document store.
//!
//! # Responsibility
//! - Issue create-or-replace writes and keyed reads against a hosted project.
//!
//! # Invariants
//! - Writes are `PATCH` without an update mask, so the stored document is
//!   replaced wholesale and created when missing.
//! - Requests are sequential and carry no client-side timeout.
//!
//! # See also
//! - https://firebase.google.com/docs/firestore/reference/rest

use super::firestore_value::{decode_document, encode_document};
use super::{ensure_valid_key, DocumentStore, StoreError, StoreResult};
use crate::config::AppConfig;
use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::time::{Duration, Instant};

pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com";
const DEFAULT_DATABASE: &str = "(default)";
const APP_ID_HEADER: &str = "X-Firebase-GMPID";

/// Blocking Firestore client scoped to one project database.
pub struct FirestoreDocumentStore {
    client: Client,
    endpoint: Url,
    project_id: String,
    api_key: String,
    app_id: String,
}

impl FirestoreDocumentStore {
    /// Builds a client for the configured project.
    ///
    /// # Errors
    /// - `InvalidEndpoint` when the endpoint override is not a base URL.
    /// - `Http` when the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> StoreResult<Self> {
        let endpoint_text = config
            .firestore_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_FIRESTORE_ENDPOINT);
        let endpoint = Url::parse(endpoint_text)
            .map_err(|err| StoreError::InvalidEndpoint(format!("`{endpoint_text}`: {err}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(StoreError::InvalidEndpoint(format!(
                "`{endpoint_text}` cannot be a base URL"
            )));
        }

        let client = Client::builder().timeout(None::<Duration>).build()?;

        Ok(Self {
            client,
            endpoint,
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            app_id: config.app_id.clone(),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Returns the REST URL addressing one document.
    pub fn document_url(&self, collection: &str, key: &str) -> StoreResult<Url> {
        ensure_valid_key(collection, key)?;

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                DEFAULT_DATABASE,
                "documents",
                collection,
                key,
            ]);
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

impl DocumentStore for FirestoreDocumentStore {
    fn backend_name(&self) -> &'static str {
        "firestore"
    }

    fn set_document(&self, collection: &str, key: &str, document: &Value) -> StoreResult<()> {
        let url = self.document_url(collection, key)?;
        let body = encode_document(document)?;
        let started_at = Instant::now();

        let response = self
            .client
            .patch(url)
            .header(APP_ID_HEADER, &self.app_id)
            .json(&body)
            .send()?;

        let status = response.status();
        debug!(
            "event=store_write module=store backend=firestore key={key} http_status={} duration_ms={}",
            status.as_u16(),
            started_at.elapsed().as_millis()
        );
        if !status.is_success() {
            return Err(status_error(status, read_body(response)));
        }

        Ok(())
    }

    fn get_document(&self, collection: &str, key: &str) -> StoreResult<Option<Value>> {
        let url = self.document_url(collection, key)?;

        let response = self
            .client
            .get(url)
            .header(APP_ID_HEADER, &self.app_id)
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(status, read_body(response)));
        }

        let body: Value = response.json()?;
        decode_document(&body).map(Some)
    }
}

/// Reads an error response body, keeping the read failure in its place.
fn read_body(response: Response) -> String {
    response
        .text()
        .unwrap_or_else(|err| format!("<failed to read response body: {err}>"))
}

fn status_error(status: StatusCode, body: String) -> StoreError {
    StoreError::Status {
        status: status.as_u16(),
        body: body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::FirestoreDocumentStore;
    use crate::config::AppConfig;
    use crate::store::StoreError;

    fn config(endpoint: Option<&str>) -> AppConfig {
        AppConfig {
            api_key: "test-key".to_string(),
            project_id: "interview-demo".to_string(),
            app_id: "1:2:web:3".to_string(),
            firestore_endpoint: endpoint.map(str::to_string),
            ..AppConfig::default()
        }
    }

    #[test]
    fn document_url_targets_default_database() {
        let store = FirestoreDocumentStore::new(&config(None)).unwrap();
        let url = store
            .document_url("codinginterview-problems", "running-sum")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/interview-demo/databases/(default)/documents/codinginterview-problems/running-sum?key=test-key"
        );
    }

    #[test]
    fn endpoint_override_is_honored() {
        let store = FirestoreDocumentStore::new(&config(Some("http://127.0.0.1:8080/"))).unwrap();
        let url = store.document_url("problems", "a").unwrap();

        assert!(url
            .as_str()
            .starts_with("http://127.0.0.1:8080/v1/projects/interview-demo/"));
    }

    #[test]
    fn rejects_bad_endpoint_and_keys() {
        let err = FirestoreDocumentStore::new(&config(Some("not a url"))).err();
        assert!(matches!(err, Some(StoreError::InvalidEndpoint(_))));

        let store = FirestoreDocumentStore::new(&config(None)).unwrap();
        let err = store.document_url("problems", "a/b").unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }
}
