//! Vault context
//!
//! Scans a note vault, compacts it into a short token-bounded summary
//! (topics, terminology, writing style, folder layout) and keeps that
//! summary persisted so an assistant can be primed with it cheaply.

pub mod compactor;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod scanner;
pub mod storage;

pub use compactor::ContextCompactor;
pub use config::{AppConfig, SharedSettings, VaultContextSettings};
pub use context::{Notice, Notifier, RebuildOutcome, VaultContext, VaultContextManager};
pub use error::{ContextError, Result};
pub use scanner::{FsNoteSource, NoteSource, VaultScanner};
pub use storage::{ContextStore, FileContextStore, MemoryContextStore};
