//! JSON file store for the vault context record

use super::{decode_record, encode_record, ContextStore};
use crate::context::models::VaultContext;
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info};

/// File name of the record inside the data directory
pub const STORAGE_FILE: &str = "vault-context.json";

/// Stores the record as `vault-context.json` inside a data directory
#[derive(Debug, Clone)]
pub struct FileContextStore {
    path: PathBuf,
}

impl FileContextStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STORAGE_FILE),
        }
    }

    /// Full path of the record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn try_load(&self) -> Result<Option<VaultContext>> {
        if !fs::try_exists(&self.path).await? {
            debug!("No vault context record at {}", self.path.display());
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).await?;
        decode_record(&raw)
    }

    async fn try_save(&self, context: &VaultContext) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let raw = encode_record(context)?;

        // write-then-rename so readers never see a partial record
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, raw).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    async fn try_clear(&self) -> Result<()> {
        if fs::try_exists(&self.path).await? {
            fs::remove_file(&self.path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ContextStore for FileContextStore {
    async fn load(&self) -> Option<VaultContext> {
        match self.try_load().await {
            Ok(context) => context,
            Err(e) => {
                error!("Failed to load vault context from {}: {}", self.path.display(), e);
                None
            }
        }
    }

    async fn save(&self, context: &VaultContext) {
        match self.try_save(context).await {
            Ok(()) => info!("Saved vault context to {}", self.path.display()),
            Err(e) => error!("Failed to save vault context to {}: {}", self.path.display(), e),
        }
    }

    async fn clear(&self) {
        if let Err(e) = self.try_clear().await {
            error!("Failed to clear vault context at {}: {}", self.path.display(), e);
        }
    }
}
