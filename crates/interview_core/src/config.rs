//! Externally supplied client configuration.
//!
//! # Responsibility
//! - Load the web-app settings (`apiKey`, `projectId`, `appId`, ...) from the
//!   environment or a JSON file at process start.
//! - Keep credentials out of source and out of logs.
//!
//! # Invariants
//! - A validated config has non-blank `api_key`, `project_id` and `app_id`.
//! - `Debug` output never contains the API key.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_API_KEY: &str = "FIREBASE_API_KEY";
pub const ENV_API_KEY_FILE: &str = "FIREBASE_API_KEY_FILE";
pub const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
pub const ENV_APP_ID: &str = "FIREBASE_APP_ID";
pub const ENV_AUTH_DOMAIN: &str = "FIREBASE_AUTH_DOMAIN";
pub const ENV_STORAGE_BUCKET: &str = "FIREBASE_STORAGE_BUCKET";
pub const ENV_MESSAGING_SENDER_ID: &str = "FIREBASE_MESSAGING_SENDER_ID";
pub const ENV_MEASUREMENT_ID: &str = "FIREBASE_MEASUREMENT_ID";
/// Overrides the Firestore endpoint, e.g. `http://127.0.0.1:8080` for the emulator.
pub const ENV_FIRESTORE_ENDPOINT: &str = "FIRESTORE_ENDPOINT";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "missing required config value `{field}`"),
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Missing(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Web-app configuration for the hosted document store and auth service.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub api_key: String,
    pub project_id: String,
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_id: Option<String>,
    /// Not part of the web config; only settable from the environment.
    #[serde(skip)]
    pub firestore_endpoint: Option<String>,
}

impl Debug for AppConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("app_id", &self.app_id)
            .field("auth_domain", &self.auth_domain)
            .field("storage_bucket", &self.storage_bucket)
            .field("messaging_sender_id", &self.messaging_sender_id)
            .field("measurement_id", &self.measurement_id)
            .field("firestore_endpoint", &self.firestore_endpoint)
            .finish()
    }
}

impl AppConfig {
    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    /// - `Missing` when a required value is unset or blank.
    /// - `Io` when `FIREBASE_API_KEY_FILE` points to an unreadable file.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = match var(ENV_API_KEY) {
            Some(key) => key,
            None => match var(ENV_API_KEY_FILE) {
                Some(path) => read_secret(Path::new(&path))?,
                None => {
                    warn!("event=config_load module=config status=error missing={ENV_API_KEY}");
                    return Err(ConfigError::Missing("apiKey"));
                }
            },
        };

        let config = Self {
            api_key,
            project_id: var(ENV_PROJECT_ID).unwrap_or_default(),
            app_id: var(ENV_APP_ID).unwrap_or_default(),
            auth_domain: var(ENV_AUTH_DOMAIN),
            storage_bucket: var(ENV_STORAGE_BUCKET),
            messaging_sender_id: var(ENV_MESSAGING_SENDER_ID),
            measurement_id: var(ENV_MEASUREMENT_ID),
            firestore_endpoint: var(ENV_FIRESTORE_ENDPOINT),
        };
        config.validate()?;

        info!(
            "event=config_load module=config status=ok source=env project_id={}",
            config.project_id
        );
        Ok(config)
    }

    /// Loads configuration from a JSON web-config file.
    ///
    /// The endpoint override is still taken from the environment.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.firestore_endpoint = std::env::var(ENV_FIRESTORE_ENDPOINT)
            .ok()
            .filter(|value| !value.trim().is_empty());
        config.validate()?;

        info!(
            "event=config_load module=config status=ok source=file project_id={}",
            config.project_id
        );
        Ok(config)
    }

    /// Checks that required values are present.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("apiKey"));
        }
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::Missing("projectId"));
        }
        if self.app_id.trim().is_empty() {
            return Err(ConfigError::Missing("appId"));
        }
        Ok(())
    }

    /// Auth domain, defaulting to `<projectId>.firebaseapp.com`.
    pub fn effective_auth_domain(&self) -> String {
        self.auth_domain
            .clone()
            .unwrap_or_else(|| format!("{}.firebaseapp.com", self.project_id))
    }
}

fn read_secret(path: &Path) -> ConfigResult<String> {
    let secret = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let secret = secret.trim().to_string();
    if secret.is_empty() {
        return Err(ConfigError::Missing("apiKey"));
    }
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_API_KEY, ENV_API_KEY_FILE, ENV_APP_ID, ENV_PROJECT_ID};
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_required_and_optional_values() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_API_KEY, " key-123 "),
            (ENV_PROJECT_ID, "interview-demo"),
            (ENV_APP_ID, "1:2:web:3"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "key-123");
        assert_eq!(config.project_id, "interview-demo");
        assert_eq!(config.auth_domain, None);
        assert_eq!(config.effective_auth_domain(), "interview-demo.firebaseapp.com");
    }

    #[test]
    fn blank_required_value_is_missing() {
        let err = AppConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "key"),
            (ENV_PROJECT_ID, "   "),
            (ENV_APP_ID, "app"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("projectId")));

        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("apiKey")));
    }

    #[test]
    fn api_key_can_come_from_secret_file() {
        let mut secret = tempfile::NamedTempFile::new().unwrap();
        writeln!(secret, "file-key").unwrap();
        let path = secret.path().to_str().unwrap().to_string();

        let config = AppConfig::from_lookup(lookup(&[
            (ENV_API_KEY_FILE, path.as_str()),
            (ENV_PROJECT_ID, "p"),
            (ENV_APP_ID, "a"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "file-key");
    }

    #[test]
    fn json_file_uses_web_config_names() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"apiKey":"k","projectId":"p","appId":"a","authDomain":"p.example.com","measurementId":"G-1"}}"#
        )
        .unwrap();

        let config = AppConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.effective_auth_domain(), "p.example.com");
        assert_eq!(config.measurement_id.as_deref(), Some("G-1"));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = AppConfig {
            api_key: "super-secret".to_string(),
            project_id: "p".to_string(),
            app_id: "a".to_string(),
            ..AppConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
