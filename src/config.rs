//! Configuration for vault context building
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `VAULT_CONTEXT` (nested keys use `__`,
//! e.g. `VAULT_CONTEXT_VAULT_CONTEXT__MAX_CONTEXT_TOKENS=3000`). The pattern
//! lists take comma-separated values from the environment, e.g.
//! `VAULT_CONTEXT_VAULT_CONTEXT__EXCLUDE_PATTERNS=Archive/**,Templates/**`.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Token budget used when none (or an unusable one) is configured
pub const DEFAULT_MAX_CONTEXT_TOKENS: usize = 2000;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "VAULT_CONTEXT";

/// Keys whose environment values are split on commas
const ENV_LIST_KEYS: [&str; 2] = [
    "vault_context.include_patterns",
    "vault_context.exclude_patterns",
];

/// Settings handle shared between the host and the manager
pub type SharedSettings = Arc<RwLock<VaultContextSettings>>;

/// Vault context feature settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultContextSettings {
    /// Whether compacted context is handed out to callers
    #[serde(default)]
    pub enabled: bool,

    /// Budget for the compacted context, in approximate tokens (4 chars each)
    #[serde(default = "default_max_context_tokens")]
    pub max_context_tokens: usize,

    /// Glob patterns a note must match (any) to be scanned; empty means all
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Glob patterns that always drop a note
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

fn default_max_context_tokens() -> usize {
    DEFAULT_MAX_CONTEXT_TOKENS
}

impl Default for VaultContextSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_context_tokens: default_max_context_tokens(),
            include_patterns: vec![],
            exclude_patterns: vec![],
        }
    }
}

impl VaultContextSettings {
    /// Copy of these settings with the token budget clamped to a positive value
    pub fn normalized(&self) -> Self {
        let mut settings = self.clone();
        if settings.max_context_tokens == 0 {
            settings.max_context_tokens = DEFAULT_MAX_CONTEXT_TOKENS;
        }
        settings
    }

    /// Wrap these settings in a handle the manager can share with the host
    pub fn shared(self) -> SharedSettings {
        Arc::new(RwLock::new(self))
    }
}

/// Parse a comma-separated pattern list as typed into a settings form
pub fn parse_pattern_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a token budget as typed into a settings form.
///
/// Leading digits are used and anything after them ignored (`"42abc"` is 42,
/// `"3.7"` is 3). No digits, zero or a negative number give the default.
pub fn parse_max_tokens(input: &str) -> usize {
    let trimmed = input.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<usize>() {
        Ok(0) | Err(_) => DEFAULT_MAX_CONTEXT_TOKENS,
        Ok(tokens) => tokens,
    }
}

/// Location of the vault being summarized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default = "default_vault_root")]
    pub root: PathBuf,

    /// Note file extension, without the dot
    #[serde(default = "default_note_extension")]
    pub extension: String,
}

fn default_vault_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_note_extension() -> String {
    "md".to_string()
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: default_vault_root(),
            extension: default_note_extension(),
        }
    }
}

/// Where the persisted context record lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory owned by this tool; the record file is created inside it
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".vault-context")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub vault: VaultConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub vault_context: VaultContextSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from an optional file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(environment(None));

        let config: AppConfig = builder.build()?.try_deserialize()?;
        Ok(config.normalized())
    }

    /// Load from a configuration file plus environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(Some(path.as_ref()))
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    fn normalized(mut self) -> Self {
        self.vault_context = self.vault_context.normalized();
        self
    }
}

/// Environment source; `vars` replaces the process environment when given
fn environment(vars: Option<config::Map<String, String>>) -> config::Environment {
    ENV_LIST_KEYS.iter().fold(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .source(vars),
        |env, key| env.with_list_parse_key(key),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = VaultContextSettings::default();
        assert!(!settings.enabled);
        assert_eq!(settings.max_context_tokens, 2000);
        assert!(settings.include_patterns.is_empty());
        assert!(settings.exclude_patterns.is_empty());
    }

    #[test]
    fn test_normalized_clamps_zero_budget() {
        let settings = VaultContextSettings {
            max_context_tokens: 0,
            ..Default::default()
        };
        assert_eq!(settings.normalized().max_context_tokens, 2000);

        let settings = VaultContextSettings {
            max_context_tokens: 150,
            ..Default::default()
        };
        assert_eq!(settings.normalized().max_context_tokens, 150);
    }

    #[test]
    fn test_parse_pattern_list() {
        assert_eq!(
            parse_pattern_list("Projects/**, Daily/*.md,, ,Archive/**"),
            vec!["Projects/**", "Daily/*.md", "Archive/**"]
        );
        assert!(parse_pattern_list("  ").is_empty());
    }

    #[test]
    fn test_parse_max_tokens() {
        assert_eq!(parse_max_tokens("3500"), 3500);
        assert_eq!(parse_max_tokens(" 42 "), 42);
        assert_eq!(parse_max_tokens("lots"), 2000);
        assert_eq!(parse_max_tokens("0"), 2000);
        assert_eq!(parse_max_tokens("-5"), 2000);
        assert_eq!(parse_max_tokens("42abc"), 42);
        assert_eq!(parse_max_tokens("3.7"), 3);
        assert_eq!(parse_max_tokens("+120"), 120);
    }

    #[test]
    fn test_environment_overrides() {
        let vars: config::Map<String, String> = [
            ("VAULT_CONTEXT_VAULT_CONTEXT__ENABLED", "true"),
            ("VAULT_CONTEXT_VAULT_CONTEXT__MAX_CONTEXT_TOKENS", "3000"),
            (
                "VAULT_CONTEXT_VAULT_CONTEXT__INCLUDE_PATTERNS",
                "Projects/**,Daily/*",
            ),
            ("VAULT_CONTEXT_VAULT_CONTEXT__EXCLUDE_PATTERNS", "Archive/**"),
            ("VAULT_CONTEXT_LOGGING__LEVEL", "debug"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config: AppConfig = config::Config::builder()
            .add_source(environment(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(config.vault_context.enabled);
        assert_eq!(config.vault_context.max_context_tokens, 3000);
        assert_eq!(
            config.vault_context.include_patterns,
            vec!["Projects/**", "Daily/*"]
        );
        assert_eq!(config.vault_context.exclude_patterns, vec!["Archive/**"]);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: VaultContextSettings =
            serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.max_context_tokens, 2000);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [vault]
            root = "/tmp/notes"

            [vault_context]
            enabled = true
            max_context_tokens = 0
            exclude_patterns = ["Archive/**"]

            [logging]
            level = "debug"
            "#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.vault.root, PathBuf::from("/tmp/notes"));
        assert_eq!(config.vault.extension, "md");
        assert!(config.vault_context.enabled);
        assert_eq!(config.vault_context.max_context_tokens, 2000);
        assert_eq!(config.vault_context.exclude_patterns, vec!["Archive/**"]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.storage.data_dir, PathBuf::from(".vault-context"));
    }
}
