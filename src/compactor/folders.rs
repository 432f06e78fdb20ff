//! Per-folder summaries

use super::topics::extract_topics;
use crate::scanner::{display_folder, ScannedNote};
use indexmap::IndexMap;

/// Topic words listed per folder
pub const FOLDER_TOPIC_LIMIT: usize = 5;

/// Summarize each folder as `"<n> notes about <topics>"` or `"<n> notes"`.
///
/// Keys are display names (`/` becomes `Root`); entries are ordered by
/// descending note count, ties in order of first appearance.
pub fn summarize_folders(notes: &[ScannedNote]) -> IndexMap<String, String> {
    let mut groups: IndexMap<&str, Vec<&ScannedNote>> = IndexMap::new();
    for note in notes {
        groups.entry(note.folder.as_str()).or_default().push(note);
    }

    groups.sort_by(|_, a, _, b| b.len().cmp(&a.len()));

    groups
        .into_iter()
        .map(|(folder, folder_notes)| {
            let count = folder_notes.len();
            let topics = extract_topics(folder_notes);
            let description = if topics.is_empty() {
                format!("{} notes", count)
            } else {
                let top: Vec<&str> = topics
                    .iter()
                    .take(FOLDER_TOPIC_LIMIT)
                    .map(String::as_str)
                    .collect();
                format!("{} notes about {}", count, top.join(", "))
            };
            (display_folder(folder).to_string(), description)
        })
        .collect()
}

/// Leading integer of a folder description, 0 when there is none
pub fn leading_count(description: &str) -> usize {
    let digits: String = description
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
