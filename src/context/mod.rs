//! Vault context lifecycle
//!
//! The persisted [`VaultContext`] record, the [`VaultContextManager`] that
//! rebuilds and serves it, and the notices it emits along the way.

pub mod manager;
pub mod models;
pub mod notifier;

pub use manager::{RebuildOutcome, VaultContextManager, NO_CONTEXT_STATUS};
pub use models::{VaultContext, CURRENT_VERSION};
pub use notifier::{LogNotifier, Notice, Notifier, RecordingNotifier};
