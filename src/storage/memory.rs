//! In-process store, for hosts without a data directory and for tests

use super::{decode_record, encode_record, ContextStore};
use crate::context::models::VaultContext;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::error;

/// Keeps the encoded record in memory, with the same version rules as the
/// file store
#[derive(Debug, Default)]
pub struct MemoryContextStore {
    record: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl MemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw record as if another build had written it
    pub fn with_raw_record(raw: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(raw.into())),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of completed saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The currently stored raw record
    pub fn raw_record(&self) -> Option<String> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ContextStore for MemoryContextStore {
    async fn load(&self) -> Option<VaultContext> {
        let raw = self.raw_record()?;
        match decode_record(&raw) {
            Ok(context) => context,
            Err(e) => {
                error!("Failed to load vault context from memory: {}", e);
                None
            }
        }
    }

    async fn save(&self, context: &VaultContext) {
        match encode_record(context) {
            Ok(raw) => {
                *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
                self.saves.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => error!("Failed to encode vault context: {}", e),
        }
    }

    async fn clear(&self) {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
