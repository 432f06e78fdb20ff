//! Include/exclude glob filtering of note paths
//!
//! Patterns are matched against the vault-relative note path with `/`
//! separators. `*` and `?` never cross a `/`; `**` spans any number of
//! folders. A path is kept when the include set is empty or one include
//! pattern matches, and no exclude pattern matches.

use crate::config::VaultContextSettings;
use crate::error::ContextError;
use glob::{MatchOptions, Pattern};
use tracing::warn;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled include/exclude filter
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PathFilter {
    /// Compile a filter, rejecting the first invalid pattern
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, ContextError> {
        Ok(Self {
            include: compile_all(include)?,
            exclude: compile_all(exclude)?,
        })
    }

    /// Compile a filter from settings, skipping invalid patterns with a warning
    pub fn from_settings(settings: &VaultContextSettings) -> Self {
        Self {
            include: compile_lenient(&settings.include_patterns),
            exclude: compile_lenient(&settings.exclude_patterns),
        }
    }

    /// Whether a note at `path` should be scanned
    pub fn allows(&self, path: &str) -> bool {
        if !self.include.is_empty()
            && !self
                .include
                .iter()
                .any(|p| p.matches_with(path, MATCH_OPTIONS))
        {
            return false;
        }

        !self
            .exclude
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS))
    }
}

fn compile(pattern: &str) -> Result<Pattern, ContextError> {
    Pattern::new(pattern).map_err(|e| ContextError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.msg.to_string(),
    })
}

fn compile_all(patterns: &[String]) -> Result<Vec<Pattern>, ContextError> {
    patterns.iter().map(|p| compile(p)).collect()
}

fn compile_lenient(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| match compile(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Ignoring glob pattern: {}", e);
                None
            }
        })
        .collect()
}
