//! Context compaction
//!
//! Turns a scan result into a [`VaultContext`]: frequent topics, recurring
//! terminology, a writing-style descriptor, per-folder summaries and the
//! token-bounded context string that is handed to downstream prompts.
//! Everything here is synchronous and free of I/O.

pub mod assembly;
pub mod folders;
pub mod frequency;
pub mod patterns;
pub mod stopwords;
pub mod style;
pub mod terminology;
pub mod topics;

pub use assembly::{assemble_context, char_budget, truncate_to_budget, CHARS_PER_TOKEN};
pub use folders::summarize_folders;
pub use frequency::FrequencyTable;
pub use style::{analyze_writing_style, StyleProfile};
pub use terminology::extract_terminology;
pub use topics::extract_topics;

use crate::context::models::{VaultContext, CURRENT_VERSION};
use crate::scanner::ScanResult;
use chrono::Utc;
use tracing::debug;

/// Builds vault context summaries from scan results
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextCompactor;

impl ContextCompactor {
    pub fn new() -> Self {
        Self
    }

    /// Compact a scan, stamping the record with the current time
    pub fn compact(&self, scan: &ScanResult, max_tokens: usize) -> VaultContext {
        self.compact_at(scan, max_tokens, Utc::now().timestamp_millis())
    }

    /// Compact a scan with an explicit build timestamp (epoch milliseconds)
    pub fn compact_at(&self, scan: &ScanResult, max_tokens: usize, built_at: i64) -> VaultContext {
        let notes = &scan.notes;

        let topics = extract_topics(notes);
        let terminology = extract_terminology(notes);
        let writing_style = analyze_writing_style(notes);
        let folder_summary = summarize_folders(notes);

        let compacted_context = assemble_context(
            notes.len(),
            &topics,
            &terminology,
            &writing_style,
            &folder_summary,
            max_tokens,
        );

        debug!(
            "Compacted {} notes: {} topics, {} terms, {} folders, {} chars",
            notes.len(),
            topics.len(),
            terminology.len(),
            folder_summary.len(),
            compacted_context.chars().count()
        );

        VaultContext {
            version: CURRENT_VERSION,
            built_at,
            note_count: notes.len(),
            total_characters: scan.total_characters,
            topics,
            terminology,
            writing_style,
            folder_summary,
            compacted_context,
        }
    }
}
