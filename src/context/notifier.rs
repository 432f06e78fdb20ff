//! User-facing notices emitted by the manager

use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// A notice about rebuild progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    RebuildStarted,
    RebuildSucceeded { note_count: usize },
    RebuildFailed,
    RebuildInProgress,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::RebuildStarted => write!(f, "Building vault context..."),
            Notice::RebuildSucceeded { note_count } => {
                write!(f, "Vault context built: {} notes analyzed", note_count)
            }
            Notice::RebuildFailed => {
                write!(f, "Failed to build vault context. Check logs for details.")
            }
            Notice::RebuildInProgress => write!(f, "Vault context rebuild already in progress"),
        }
    }
}

/// Receives notices for display to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::RebuildFailed | Notice::RebuildInProgress => warn!("{}", notice),
            _ => info!("{}", notice),
        }
    }
}

/// Keeps every notice, for hosts that display them later
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
