//! Client wiring: one database handle and one authentication handle built
//! from a single `AppConfig`.

use crate::auth::AuthHandle;
use crate::config::{AppConfig, ConfigError};
use crate::service::problem_service::ProblemService;
use crate::store::{FirestoreDocumentStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ClientError {
    Config(ConfigError),
    Store(StoreError),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ClientError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<StoreError> for ClientError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Handles a client application uses to read the catalog.
pub struct AppClient {
    db: FirestoreDocumentStore,
    auth: AuthHandle,
}

impl AppClient {
    /// Validates `config` and builds both handles.
    ///
    /// No network traffic happens until a handle is used.
    pub fn initialize(config: &AppConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let db = FirestoreDocumentStore::new(config)?;
        let auth = AuthHandle::new(config);
        info!(
            "event=client_init module=client status=ok project_id={} auth_domain={}",
            db.project_id(),
            auth.auth_domain()
        );
        Ok(Self { db, auth })
    }

    pub fn db(&self) -> &FirestoreDocumentStore {
        &self.db
    }

    pub fn auth(&self) -> &AuthHandle {
        &self.auth
    }

    /// Read-path service borrowing the database handle.
    pub fn problems(&self) -> ProblemService<&FirestoreDocumentStore> {
        ProblemService::new(&self.db)
    }
}
