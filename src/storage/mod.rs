//! Persistence of the vault context record
//!
//! Stores never fail loudly: errors are logged and turned into "no record"
//! on load or a no-op on save and clear.

pub mod file;
pub mod memory;

pub use file::{FileContextStore, STORAGE_FILE};
pub use memory::MemoryContextStore;

use crate::context::models::{VaultContext, CURRENT_VERSION};
use crate::error::{ContextError, Result};
use async_trait::async_trait;
use tracing::debug;

/// Durable storage for a single vault context record
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Load the stored record; `None` when missing, unreadable or outdated
    async fn load(&self) -> Option<VaultContext>;

    /// Persist `context`, replacing any previous record
    async fn save(&self, context: &VaultContext);

    /// Remove the stored record
    async fn clear(&self);
}

/// Validate raw record JSON and decode it.
///
/// Returns `Ok(None)` for a record written with another format version and an
/// error when the record does not have the expected shape.
pub fn decode_record(raw: &str) -> Result<Option<VaultContext>> {
    let value: serde_json::Value = serde_json::from_str(raw)?;

    let version = value
        .get("version")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| ContextError::InvalidRecord("missing or non-integer version".to_string()))?;

    if version != u64::from(CURRENT_VERSION) {
        debug!(
            "Ignoring vault context record with version {} (expected {})",
            version, CURRENT_VERSION
        );
        return Ok(None);
    }

    let context: VaultContext = serde_json::from_value(value)
        .map_err(|e| ContextError::InvalidRecord(e.to_string()))?;
    Ok(Some(context))
}

/// Encode a record as pretty-printed JSON (two-space indentation)
pub fn encode_record(context: &VaultContext) -> Result<String> {
    Ok(serde_json::to_string_pretty(context)?)
}
