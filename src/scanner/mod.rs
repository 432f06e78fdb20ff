//! Vault scanning
//!
//! Enumerates the notes of a vault, filters them by include/exclude globs
//! and reads the content of the survivors. Filtering happens on paths only,
//! before any note is read.

pub mod filter;
pub mod models;
pub mod source;

pub use filter::PathFilter;
pub use models::{display_folder, NoteEntry, ScanResult, ScannedNote, ROOT_FOLDER, ROOT_LABEL};
pub use source::{FsNoteSource, NoteSource};

use crate::config::VaultContextSettings;
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Full-vault scanner over a note source
pub struct VaultScanner {
    source: Arc<dyn NoteSource>,
}

impl VaultScanner {
    pub fn new(source: Arc<dyn NoteSource>) -> Self {
        Self { source }
    }

    /// Scan every note allowed by the settings' patterns.
    ///
    /// Any error from the note source aborts the scan.
    pub async fn scan(&self, settings: &VaultContextSettings) -> Result<ScanResult> {
        let filter = PathFilter::from_settings(settings);
        let entries = self.source.list_notes().await?;
        let listed = entries.len();

        let mut notes = Vec::new();
        for entry in entries.into_iter().filter(|e| filter.allows(&e.path)) {
            let content = self.source.read_note(&entry.path).await?;
            notes.push(ScannedNote::new(entry.path, entry.folder, content));
        }

        debug!("Filtered {} of {} notes", listed - notes.len(), listed);

        let result = ScanResult::new(notes);
        info!(
            "Scanned {} notes ({} characters)",
            result.len(),
            result.total_characters
        );

        Ok(result)
    }
}
