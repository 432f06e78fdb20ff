//! Data models for vault context

use chrono::{DateTime, Local, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Record format version accepted by this build
pub const CURRENT_VERSION: u32 = 1;

/// Compact summary of a vault, as persisted and handed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultContext {
    pub version: u32,
    /// Build time in milliseconds since the Unix epoch
    pub built_at: i64,
    pub note_count: usize,
    pub total_characters: usize,
    pub topics: Vec<String>,
    pub terminology: Vec<String>,
    pub writing_style: String,
    /// Folder display name to description, largest folders first
    pub folder_summary: IndexMap<String, String>,
    pub compacted_context: String,
}

impl VaultContext {
    /// Build time as a UTC timestamp, if representable
    pub fn built_at_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.built_at).single()
    }

    /// Human-readable build status, e.g. `Last built: 2024-05-01 09:30 (120 notes)`
    pub fn status_line(&self) -> String {
        let built = self
            .built_at_datetime()
            .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        format!("Last built: {} ({} notes)", built, self.note_count)
    }
}
