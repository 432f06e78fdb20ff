//! Data models for vault scanning

use serde::{Deserialize, Serialize};

/// Folder value used for notes at the top of the vault
pub const ROOT_FOLDER: &str = "/";

/// Label the root folder is rendered with in summaries
pub const ROOT_LABEL: &str = "Root";

/// A note as reported by a note source, before its content is read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub path: String,
    pub folder: String,
}

impl NoteEntry {
    pub fn new(path: impl Into<String>, folder: impl AsRef<str>) -> Self {
        Self {
            path: path.into(),
            folder: normalize_folder(folder.as_ref()),
        }
    }
}

/// A note whose content has been read during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedNote {
    pub path: String,
    pub folder: String,
    pub content: String,
    pub character_count: usize,
}

impl ScannedNote {
    pub fn new(path: impl Into<String>, folder: impl AsRef<str>, content: impl Into<String>) -> Self {
        let content = content.into();
        let character_count = content.chars().count();
        Self {
            path: path.into(),
            folder: normalize_folder(folder.as_ref()),
            content,
            character_count,
        }
    }

    /// Folder name as shown in summaries
    pub fn display_folder(&self) -> &str {
        display_folder(&self.folder)
    }
}

/// Result of scanning a vault
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub notes: Vec<ScannedNote>,
    pub total_characters: usize,
}

impl ScanResult {
    pub fn new(notes: Vec<ScannedNote>) -> Self {
        let total_characters = notes.iter().map(|n| n.character_count).sum();
        Self {
            notes,
            total_characters,
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Canonical folder form: no surrounding slashes, root as `/`
pub fn normalize_folder(folder: &str) -> String {
    let trimmed = folder.trim_matches('/');
    if trimmed.is_empty() {
        ROOT_FOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Map a folder to the name used in summaries
pub fn display_folder(folder: &str) -> &str {
    if folder == ROOT_FOLDER {
        ROOT_LABEL
    } else {
        folder
    }
}
