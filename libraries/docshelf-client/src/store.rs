//! Session token storage.

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Where the session token lives between requests.
///
/// The client reads the store before every request; only the login and
/// logout flows write it.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// The current token, if a session is active.
    async fn get(&self) -> Result<Option<String>>;

    /// Persist a new token.
    async fn set(&self, token: &str) -> Result<()>;

    /// Forget the stored token.
    async fn clear(&self) -> Result<()>;
}

/// In-memory token store for tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn set(&self, token: &str) -> Result<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Token store backed by a single file on disk, so a session survives
/// between runs.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, token).await?;
        debug!(path = %self.path.display(), "Token saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Token removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().await.unwrap(), None);

        store.set("abc123").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("abc123"));

        store.clear().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));

        // Missing file reads as no session
        assert_eq!(store.get().await.unwrap(), None);

        // Parent directories are created on demand
        store.set("abc123").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("abc123"));

        store.clear().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);

        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        tokio::fs::write(&path, "abc123\n").await.unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.get().await.unwrap().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_file_store_empty_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        tokio::fs::write(&path, "").await.unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.get().await.unwrap(), None);
    }
}
