//! API key storage and the session that owns the active key.
//!
//! The key lives in a sled database under a single fixed name. A [`Session`]
//! is the only place an active key is held; summarisation asks it for a
//! [`Client`] and fails with [`Error::Uninitialized`] when there is none.

use crate::error::{Error, Result};
use crate::provider::{Provider, ProviderError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Name the key is stored under.
pub const CREDENTIAL_KEY: &str = "openai_api_key";

/// Prefix every provider API key starts with.
pub const CREDENTIAL_PREFIX: &str = "sk-";

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    DbError(#[from] sled::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// A provider API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for building request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// The key with everything but its prefix and last four characters hidden.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= CREDENTIAL_PREFIX.len() + 4 {
            return "*".repeat(chars.len());
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", CREDENTIAL_PREFIX, tail)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

/// The persisted record for a validated key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub key: Credential,
    /// When the key last passed validation
    pub validated_at: DateTime<Utc>,
}

/// Sled-backed storage for the provider API key.
pub struct CredentialStore {
    db: sled::Db,
}

impl CredentialStore {
    /// Open or create the store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// The stored record, or `None` when no key has been saved.
    pub fn get(&self) -> Result<Option<StoredCredential>, StorageError> {
        match self.db.get(CREDENTIAL_KEY)? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// The stored key, or `None` when no key has been saved.
    pub fn load(&self) -> Result<Option<Credential>, StorageError> {
        Ok(self.get()?.map(|stored| stored.key))
    }

    /// Store a key, replacing any previous one.
    pub fn store(&self, credential: &Credential) -> Result<(), StorageError> {
        let stored = StoredCredential {
            key: credential.clone(),
            validated_at: Utc::now(),
        };
        let value = serde_json::to_vec(&stored)?;
        self.db.insert(CREDENTIAL_KEY, value)?;
        self.db.flush()?;
        Ok(())
    }

    /// Remove the stored key. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, StorageError> {
        let existed = self.db.remove(CREDENTIAL_KEY)?.is_some();
        self.db.flush()?;
        Ok(existed)
    }
}

/// Check a candidate key locally, before any network call.
pub fn check_format(candidate: &str) -> Result<()> {
    if candidate.trim().is_empty() {
        return Err(Error::CredentialRequired);
    }
    if !candidate.starts_with(CREDENTIAL_PREFIX) {
        return Err(Error::MalformedCredential {
            prefix: CREDENTIAL_PREFIX,
        });
    }
    Ok(())
}

/// A request handle bound to the session's active key.
#[derive(Clone)]
pub struct Client {
    pub(crate) provider: Arc<dyn Provider>,
    pub(crate) credential: Credential,
    pub(crate) model: String,
}

impl Client {
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Holds at most one active key and the provider it is used with.
///
/// A key becomes active when it passes validation in [`Session::save`] or is
/// restored from the store by [`Session::resume`], and stops being active on
/// [`Session::reset`] or when the session is dropped.
pub struct Session {
    provider: Arc<dyn Provider>,
    store: CredentialStore,
    model: String,
    active: Option<Credential>,
}

impl Session {
    pub fn new(
        provider: Arc<dyn Provider>,
        store: CredentialStore,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            store,
            model: model.into(),
            active: None,
        }
    }

    /// Validate a candidate key with the provider, then persist and activate it.
    ///
    /// Local format checks run first and never touch the network. On any
    /// failure nothing is stored and the previously active key is kept.
    pub async fn save(&mut self, candidate: &str) -> Result<()> {
        check_format(candidate)?;

        let credential = Credential::new(candidate);
        self.provider
            .list_models(&credential)
            .await
            .map_err(map_validation_error)?;

        self.store.store(&credential)?;
        info!(key = %credential.masked(), "API key validated and saved");
        self.active = Some(credential);
        Ok(())
    }

    /// The persisted key, if any.
    pub fn load(&self) -> Result<Option<Credential>> {
        Ok(self.store.load()?)
    }

    /// Activate the persisted key without revalidating it.
    ///
    /// Returns whether a key was found.
    pub fn resume(&mut self) -> Result<bool> {
        self.active = self.store.load()?;
        Ok(self.active.is_some())
    }

    /// A client bound to the active key.
    pub fn client(&self) -> Result<Client> {
        let credential = self.active.clone().ok_or(Error::Uninitialized)?;
        Ok(Client {
            provider: Arc::clone(&self.provider),
            credential,
            model: self.model.clone(),
        })
    }

    /// The active key, if any.
    pub fn active(&self) -> Option<&Credential> {
        self.active.as_ref()
    }

    /// The persisted record, including when it was validated.
    pub fn stored(&self) -> Result<Option<StoredCredential>> {
        Ok(self.store.get()?)
    }

    /// Drop the active key when `error` says the provider rejected it.
    ///
    /// A resumed key that fails with [`Error::InvalidCredential`] is removed
    /// from the store too, so the next run does not resume it again. Returns
    /// whether a key was discarded.
    pub fn discard_rejected(&mut self, error: &Error) -> Result<bool> {
        if !matches!(error, Error::InvalidCredential) {
            return Ok(false);
        }
        warn!("discarding API key rejected by the provider");
        self.reset()
    }

    /// Forget the active key and remove it from the store.
    pub fn reset(&mut self) -> Result<bool> {
        self.active = None;
        Ok(self.store.clear()?)
    }
}

fn map_validation_error(error: ProviderError) -> Error {
    warn!(error = %error, "API key validation failed");
    match error.status() {
        Some(401) => Error::InvalidCredential,
        Some(429) => Error::RateLimited,
        _ => Error::ValidationFailed,
    }
}
