//! Persistence backends for token state
//!
//! The [`TokenManager`](super::TokenManager) reads its state once at
//! construction and writes the full state after every mutation. Backends
//! only move [`TokenState`] snapshots around; the bijection logic lives in
//! the manager.

use crate::domain::{Result, ShroudError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persisted token state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    /// Session scope the mappings belong to (typically the rulesheet path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// literal -> token
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,

    /// counter key -> last issued index
    #[serde(default)]
    pub counters: BTreeMap<String, u64>,
}

/// Key-value persistence collaborator for token state
pub trait MappingStore: Send + Sync {
    /// Load the last saved state, `None` if nothing was saved yet
    ///
    /// # Errors
    ///
    /// Returns an error if saved state exists but cannot be read.
    fn load(&self) -> Result<Option<TokenState>>;

    /// Replace the saved state
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    fn save(&self, state: &TokenState) -> Result<()>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// In-process store; state lives as long as the store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<TokenState>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with state
    pub fn with_state(state: TokenState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }

    /// Last saved state
    pub fn snapshot(&self) -> Option<TokenState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl MappingStore for MemoryStore {
    fn load(&self) -> Result<Option<TokenState>> {
        Ok(self.snapshot())
    }

    fn save(&self, state: &TokenState) -> Result<()> {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(state.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// JSON file store
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash never leaves a half-written state file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MappingStore for JsonFileStore {
    fn load(&self) -> Result<Option<TokenState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            ShroudError::Persistence(format!(
                "Failed to read token state {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let state = serde_json::from_str(&contents).map_err(|e| {
            ShroudError::Persistence(format!(
                "Token state {} is corrupt: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Some(state))
    }

    fn save(&self, state: &TokenState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ShroudError::Persistence(format!(
                        "Failed to create state directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, json).map_err(|e| {
            ShroudError::Persistence(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            ShroudError::Persistence(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_state() -> TokenState {
        let mut state = TokenState::default();
        state
            .mappings
            .insert("10.0.0.5".to_string(), "IP_1".to_string());
        state.counters.insert("ip".to_string(), 1);
        state.scope = Some("rules.json".to_string());
        state
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&sample_state()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample_state()));
    }

    #[test]
    fn test_json_file_store_missing_file() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_json_file_store_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let store = JsonFileStore::new(&path);

        store.save(&sample_state()).unwrap();
        assert!(path.exists());
        assert!(!store.temp_path().exists());

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(sample_state()));
    }

    #[test]
    fn test_json_file_store_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, ShroudError::Persistence(_)));
    }
}
