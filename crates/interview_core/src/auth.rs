//! Authentication handle for client applications.
//!
//! Exposes the configured identity endpoint and a single federated sign-in
//! provider. No sign-in flow runs here; consumers drive it themselves.

use crate::config::AppConfig;
use once_cell::sync::Lazy;
use reqwest::Url;

pub const GOOGLE_PROVIDER_ID: &str = "google.com";
const DEFAULT_GOOGLE_SCOPES: &[&str] = &["openid", "email", "profile"];

static SIGN_IN_WITH_IDP_URL: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://identitytoolkit.googleapis.com/v1/accounts:signInWithIdp")
        .expect("valid identity toolkit url")
});

/// Google federated sign-in provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleAuthProvider {
    scopes: Vec<String>,
}

impl Default for GoogleAuthProvider {
    fn default() -> Self {
        Self {
            scopes: DEFAULT_GOOGLE_SCOPES
                .iter()
                .map(|scope| scope.to_string())
                .collect(),
        }
    }
}

impl GoogleAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider_id(&self) -> &'static str {
        GOOGLE_PROVIDER_ID
    }

    /// Requests an extra OAuth scope; duplicates are ignored.
    pub fn add_scope(&mut self, scope: impl Into<String>) -> &mut Self {
        let scope = scope.into();
        if !scope.trim().is_empty() && !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

/// Authentication handle bound to one app configuration.
#[derive(Debug, Clone)]
pub struct AuthHandle {
    api_key: String,
    auth_domain: String,
    provider: GoogleAuthProvider,
}

impl AuthHandle {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            auth_domain: config.effective_auth_domain(),
            provider: GoogleAuthProvider::new(),
        }
    }

    pub fn auth_domain(&self) -> &str {
        &self.auth_domain
    }

    pub fn provider(&self) -> &GoogleAuthProvider {
        &self.provider
    }

    /// Identity-toolkit endpoint that exchanges a provider credential for a
    /// session, keyed with the configured API key.
    pub fn sign_in_with_idp_url(&self) -> Url {
        let mut url = SIGN_IN_WITH_IDP_URL.clone();
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }
}
