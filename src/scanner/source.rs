//! Note sources: where the scanner gets notes from

use super::models::{NoteEntry, ROOT_FOLDER};
use crate::error::{ContextError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Read-only access to the notes of a vault
#[async_trait]
pub trait NoteSource: Send + Sync {
    /// Enumerate every note with its path and folder
    async fn list_notes(&self) -> Result<Vec<NoteEntry>>;

    /// Read the full text of the note at `path`
    async fn read_note(&self, path: &str) -> Result<String>;
}

/// Markdown notes stored in a directory tree
#[derive(Debug, Clone)]
pub struct FsNoteSource {
    root: PathBuf,
    extension: String,
}

impl FsNoteSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "md".to_string(),
        }
    }

    /// Use a different note file extension (without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walk(root: &Path, extension: &str) -> Result<Vec<NoteEntry>> {
        if !root.is_dir() {
            return Err(ContextError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Vault directory not found: {}", root.display()),
            )));
        }

        let mut notes = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable vault entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !path.extension().is_some_and(|e| e == extension) {
                continue;
            }

            let relative = match path.strip_prefix(root) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            let note_path = to_vault_path(relative);
            let folder = relative
                .parent()
                .map(to_vault_path)
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| ROOT_FOLDER.to_string());

            notes.push(NoteEntry::new(note_path, folder));
        }

        Ok(notes)
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(ContextError::NoteNotFound(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl NoteSource for FsNoteSource {
    async fn list_notes(&self) -> Result<Vec<NoteEntry>> {
        let root = self.root.clone();
        let extension = self.extension.clone();

        let notes = tokio::task::spawn_blocking(move || Self::walk(&root, &extension))
            .await
            .map_err(|e| ContextError::Internal(format!("Vault walk task failed: {}", e)))??;

        debug!("Found {} notes under {}", notes.len(), self.root.display());
        Ok(notes)
    }

    /// Invalid UTF-8 is replaced rather than rejected
    async fn read_note(&self, path: &str) -> Result<String> {
        let full_path = self.resolve(path)?;
        match tokio::fs::read(&full_path).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ContextError::NoteNotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn to_vault_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
