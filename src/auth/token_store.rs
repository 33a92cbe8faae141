use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::models::User;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StoredAuth {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

/// Bearer token and cached user, mirrored to a JSON file when a path is set.
pub struct TokenStore {
    path: Option<PathBuf>,
    data: RwLock<StoredAuth>,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read auth state from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable auth state {}: {err}", path.display());
                StoredAuth::default()
            })
        } else {
            StoredAuth::default()
        };

        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(StoredAuth::default()),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.read()
            .token
            .clone()
            .filter(|token| !token.is_empty())
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn set_token(&self, token: String) -> Result<()> {
        self.update(|data| data.token = Some(token))
    }

    pub fn set_user(&self, user: User) -> Result<()> {
        self.update(|data| data.user = Some(user))
    }

    pub fn set_credentials(&self, token: String, user: User) -> Result<()> {
        self.update(|data| {
            data.token = Some(token);
            data.user = Some(user);
        })
    }

    /// Apply `change` to a copy, write it out, and only then publish it.
    /// A failed write leaves memory as it was.
    fn update(&self, change: impl FnOnce(&mut StoredAuth)) -> Result<()> {
        let mut guard = self.write();
        let mut next = guard.clone();
        change(&mut next);
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    /// Forget token and user, removing the backing file.
    pub fn clear(&self) -> Result<()> {
        let mut guard = self.write();
        *guard = StoredAuth::default();
        match &self.path {
            Some(path) if path.exists() => fs::remove_file(path)
                .with_context(|| format!("Failed to remove auth state {}", path.display())),
            _ => Ok(()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoredAuth> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoredAuth> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, data: &StoredAuth) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write auth state to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");

        let store = TokenStore::new(path.clone()).unwrap();
        store
            .set_credentials(
                "abc.def.ghi".into(),
                User {
                    email: "zen@cesizen.fr".into(),
                    ..User::default()
                },
            )
            .unwrap();

        let reloaded = TokenStore::new(path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("abc.def.ghi"));
        assert_eq!(reloaded.user().unwrap().email, "zen@cesizen.fr");
    }

    #[test]
    fn clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("auth.json");

        let store = TokenStore::new(path.clone()).unwrap();
        store.set_token("t".into()).unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
        assert!(store.token().is_none());
        assert!(store.user().is_none());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        fs::write(&path, "{not json").unwrap();

        let store = TokenStore::new(path).unwrap();
        assert!(store.token().is_none());
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        // The parent of the auth file is a regular file, so every write fails.
        let store = TokenStore::new(blocker.join("auth.json")).unwrap();
        assert!(store.set_token("fresh".into()).is_err());
        assert!(store.token().is_none());

        assert!(store
            .set_credentials(
                "t".into(),
                User {
                    email: "zen@cesizen.fr".into(),
                    ..User::default()
                }
            )
            .is_err());
        assert!(store.token().is_none());
        assert!(store.user().is_none());
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let store = TokenStore::in_memory();
        store.set_token(String::new()).unwrap();
        assert!(store.token().is_none());
    }
}
