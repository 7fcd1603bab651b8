use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};

/// Keychain service name
const SERVICE_NAME: &str = "wanderstay";

/// Well-known key the credential record is stored under
const STORAGE_KEY: &str = "authData";

/// File name used by the file-backed store
const RECORD_FILE: &str = "auth_data.json";

/// Durable form of a session, written on every login and removed on logout.
///
/// The JSON layout (`userId` / `token` / `tokenExpirationDate` / `email`,
/// with an ISO-8601 expiry) is shared with the other marketplace clients,
/// so the field names are part of the storage contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub user_id: String,
    pub token: String,
    pub token_expiration_date: DateTime<Utc>,
    pub email: String,
}

/// Durable key-value storage for the single credential record.
///
/// Deliberately dumb: expiry checks and lifecycle decisions belong to the
/// session manager. The record is only ever read during silent restore.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<CredentialRecord>>;
    fn save(&self, record: &CredentialRecord) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

/// Credential store backed by the OS keychain.
pub struct KeyringCredentialStore;

impl KeyringCredentialStore {
    fn entry() -> Result<Entry> {
        Entry::new(SERVICE_NAME, STORAGE_KEY).context("Failed to create keyring entry")
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn load(&self) -> Result<Option<CredentialRecord>> {
        match Self::entry()?.get_password() {
            Ok(json) => {
                let record = serde_json::from_str(&json)
                    .context("Failed to parse stored credential record")?;
                Ok(Some(record))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read credential record from keychain"),
        }
    }

    fn save(&self, record: &CredentialRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        Self::entry()?
            .set_password(&json)
            .context("Failed to store credential record in keychain")
    }

    fn remove(&self) -> Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential record from keychain"),
        }
    }
}

/// Credential store backed by a JSON file in the cache directory, for
/// platforms without a usable keychain.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            path: cache_dir.join(RECORD_FILE),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<CredentialRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read credential record file")?;
        let record =
            serde_json::from_str(&contents).context("Failed to parse credential record file")?;
        Ok(Some(record))
    }

    fn save(&self, record: &CredentialRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
