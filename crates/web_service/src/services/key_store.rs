//! API key storage.
//!
//! Secret values live in the OS credential store (keyring); only metadata
//! (id, display name, service, creation time) is kept in a JSON index file so
//! the dashboard can list keys without touching the secrets themselves.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

pub const KEYCHAIN_SERVICE: &str = "mission-control-api-keys";
const INDEX_FILE: &str = "keys.json";
const APP_DIR: &str = ".mission-control";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredKeyMeta {
    pub id: String,
    pub name: String,
    pub service: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedKey {
    pub id: String,
    pub name: String,
    pub service: String,
    pub masked_value: String,
    pub location: &'static str,
    pub created_at: DateTime<Utc>,
}

/// Where secret values actually live. The production backend is the OS
/// credential store; an in-memory one exists for tests and headless CI.
pub trait SecretBackend: Send + Sync {
    fn set(&self, id: &str, value: &str) -> anyhow::Result<()>;
    fn get(&self, id: &str) -> anyhow::Result<Option<String>>;
    fn delete(&self, id: &str) -> anyhow::Result<()>;
}

pub struct KeyringBackend {
    service: String,
}

impl KeyringBackend {
    pub fn new() -> Self {
        Self {
            service: KEYCHAIN_SERVICE.to_string(),
        }
    }

    fn entry(&self, id: &str) -> anyhow::Result<keyring::Entry> {
        keyring::Entry::new(&self.service, id).context("opening credential store entry")
    }
}

impl Default for KeyringBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretBackend for KeyringBackend {
    fn set(&self, id: &str, value: &str) -> anyhow::Result<()> {
        self.entry(id)?
            .set_password(value)
            .context("storing secret in credential store")
    }

    fn get(&self, id: &str) -> anyhow::Result<Option<String>> {
        match self.entry(id)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(anyhow!("reading secret from credential store: {err}")),
        }
    }

    fn delete(&self, id: &str) -> anyhow::Result<()> {
        match self.entry(id)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(anyhow!("removing secret from credential store: {err}")),
        }
    }
}

/// In-memory backend; secrets vanish with the process.
#[derive(Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl SecretBackend for MemoryBackend {
    fn set(&self, id: &str, value: &str) -> anyhow::Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(id.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, id: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(id).cloned())
    }

    fn delete(&self, id: &str) -> anyhow::Result<()> {
        self.values.lock().unwrap().remove(id);
        Ok(())
    }
}

pub struct KeyStore {
    backend: Box<dyn SecretBackend>,
    index_path: PathBuf,
}

impl KeyStore {
    pub fn new(index_path: PathBuf, backend: Box<dyn SecretBackend>) -> Self {
        Self {
            backend,
            index_path,
        }
    }

    /// Credential-store-backed store with the index under `~/.mission-control`.
    pub fn open_default() -> Self {
        let index_path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(INDEX_FILE);
        Self::new(index_path, Box::new(KeyringBackend::new()))
    }

    fn load_index(&self) -> Vec<StoredKeyMeta> {
        let content = match std::fs::read_to_string(&self.index_path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&content) {
            Ok(keys) => keys,
            Err(err) => {
                warn!("key index at {:?} is unreadable: {err}", self.index_path);
                Vec::new()
            }
        }
    }

    fn save_index(&self, keys: &[StoredKeyMeta]) -> anyhow::Result<()> {
        if let Some(parent) = self.index_path.parent() {
            std::fs::create_dir_all(parent).context("creating key index directory")?;
        }
        let json = serde_json::to_string_pretty(keys)?;
        std::fs::write(&self.index_path, json).context("writing key index")
    }

    /// All stored keys with masked values; never returns the secrets.
    pub fn list(&self) -> Vec<MaskedKey> {
        self.load_index()
            .into_iter()
            .map(|meta| {
                let masked_value = match self.backend.get(&meta.id) {
                    Ok(Some(value)) => mask_key(&value),
                    Ok(None) => "(not found)".to_string(),
                    Err(err) => {
                        warn!("failed to read secret for {}: {err}", meta.id);
                        "(not found)".to_string()
                    }
                };
                MaskedKey {
                    id: meta.id,
                    name: meta.name,
                    service: meta.service,
                    masked_value,
                    location: "keychain",
                    created_at: meta.created_at,
                }
            })
            .collect()
    }

    /// Store a new secret; returns the generated id.
    pub fn add(&self, name: &str, service: &str, value: &str) -> anyhow::Result<String> {
        let id = format!("{}-{}", service, Utc::now().timestamp_millis());
        self.backend.set(&id, value)?;

        let mut keys = self.load_index();
        keys.push(StoredKeyMeta {
            id: id.clone(),
            name: name.to_string(),
            service: service.to_string(),
            created_at: Utc::now(),
        });
        self.save_index(&keys)?;
        Ok(id)
    }

    pub fn remove(&self, id: &str) -> anyhow::Result<()> {
        self.backend.delete(id)?;
        let keys: Vec<StoredKeyMeta> = self
            .load_index()
            .into_iter()
            .filter(|k| k.id != id)
            .collect();
        self.save_index(&keys)
    }

    /// Full secret value, for the operator's copy-to-clipboard path.
    pub fn reveal(&self, id: &str) -> anyhow::Result<Option<String>> {
        self.backend.get(id)
    }
}

/// Mask an API key for display: first and last four characters visible, or
/// fully masked for short values.
pub fn mask_key(value: &str) -> String {
    if value.chars().count() <= 8 {
        return "••••••••".to_string();
    }
    let chars: Vec<char> = value.chars().collect();
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}••••••••{tail}")
}
