//! Storage for the user data document.
//!
//! Stores expose the whole document as a single unit: callers load it,
//! mutate it in memory and save it back in full.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::{RegistryError, RegistryResult};
use crate::models::UserData;

/// Default location of the document, relative to the working directory.
pub const DEFAULT_USER_DATA_PATH: &str = "temp-data/userData.json";

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self) -> RegistryResult<UserData>;

    async fn save(&self, document: &UserData) -> RegistryResult<()>;
}

/// A JSON file on local disk.
///
/// The file must already exist; a missing file is an error, not an empty
/// document. Saves go through a sibling `.tmp` file and a rename so readers
/// never observe a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file a save replaces. Symlinks are followed so the link itself
    /// survives; a path that cannot be resolved is used as given.
    async fn resolve_target(&self) -> PathBuf {
        tokio::fs::canonicalize(&self.path)
            .await
            .unwrap_or_else(|_| self.path.clone())
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> RegistryResult<UserData> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| RegistryError::io(self.path.display(), e))?;
        UserData::from_json_str(&raw)
    }

    async fn save(&self, document: &UserData) -> RegistryResult<()> {
        let json = document.to_pretty_json()?;
        let target = self.resolve_target().await;
        let tmp = temp_path(&target);

        tokio::fs::write(&tmp, json.as_bytes())
            .await
            .map_err(|e| RegistryError::io(tmp.display(), e))?;

        // Keep the mode of the file being replaced
        if let Ok(meta) = tokio::fs::metadata(&target).await {
            if let Err(e) = tokio::fs::set_permissions(&tmp, meta.permissions()).await {
                let _ = tokio::fs::remove_file(&tmp).await;
                return Err(RegistryError::io(tmp.display(), e));
            }
        }

        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(RegistryError::io(target.display(), e));
        }

        debug!(path = %target.display(), bytes = json.len(), "Saved user data");
        Ok(())
    }
}

/// Keeps the document in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RwLock<UserData>,
}

impl MemoryStore {
    pub fn new(document: UserData) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }

    pub async fn snapshot(&self) -> UserData {
        self.document.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> RegistryResult<UserData> {
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &UserData) -> RegistryResult<()> {
        *self.document.write().await = document.clone();
        Ok(())
    }
}
