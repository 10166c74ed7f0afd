//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_DOC_FILE_NAME, ENV_AUTO_BACKUP, ENV_DOC_PATH, ENV_SCHEMA_PATH, ENV_STRICT,
};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for attrlist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// JSON attribute document.
    pub doc_path: String,
    /// Optional schema file with templates and field kinds.
    pub schema_path: Option<String>,
    /// Copy the document aside before each write.
    pub auto_backup: bool,
    /// Reject edits that do not match the attribute schema.
    pub strict: bool,
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Some(home) = non_empty_var("HOME") {
        return Some(PathBuf::from(home));
    }
    if let Some(profile) = non_empty_var("USERPROFILE") {
        return Some(PathBuf::from(profile));
    }
    env::current_dir().ok()
}

/// Default document location: `~/.cache/attrlist/attributes.json`.
pub fn default_doc_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("attrlist")
        .join(DEFAULT_DOC_FILE_NAME)
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment; missing or unrecognized is `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            doc_path: non_empty_var(ENV_DOC_PATH)
                .map(expand_tilde)
                .unwrap_or_else(default_doc_path),
            schema_path: non_empty_var(ENV_SCHEMA_PATH).map(expand_tilde),
            auto_backup: env_flag_enabled(ENV_AUTO_BACKUP),
            strict: env_flag_enabled(ENV_STRICT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{env_lock, EnvGuard};

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn from_env_reads_overrides() {
        let _lock = env_lock().lock().expect("env lock");
        let _doc = EnvGuard::set(ENV_DOC_PATH, "/tmp/attrlist-config-test/doc.json");
        let _schema = EnvGuard::set(ENV_SCHEMA_PATH, "/tmp/attrlist-config-test/schema.json");
        let _backup = EnvGuard::set(ENV_AUTO_BACKUP, "yes");
        let _strict = EnvGuard::set(ENV_STRICT, "maybe");

        let config = Config::from_env();
        assert_eq!(config.doc_path, "/tmp/attrlist-config-test/doc.json");
        assert_eq!(
            config.schema_path.as_deref(),
            Some("/tmp/attrlist-config-test/schema.json")
        );
        assert!(config.auto_backup);
        assert!(!config.strict);
    }

    #[test]
    fn from_env_defaults_under_home_cache() {
        let _lock = env_lock().lock().expect("env lock");
        let _home = EnvGuard::set("HOME", "/home/attrlist-test");
        let _doc = EnvGuard::remove(ENV_DOC_PATH);
        let _schema = EnvGuard::set(ENV_SCHEMA_PATH, "  ");
        let _backup = EnvGuard::remove(ENV_AUTO_BACKUP);
        let _strict = EnvGuard::remove(ENV_STRICT);

        let config = Config::from_env();
        let expected = PathBuf::from("/home/attrlist-test")
            .join(".cache")
            .join("attrlist")
            .join(DEFAULT_DOC_FILE_NAME);
        assert_eq!(PathBuf::from(&config.doc_path), expected);
        assert_eq!(config.schema_path, None);
        assert!(!config.auto_backup);
        assert!(!config.strict);
    }

    #[test]
    fn expand_tilde_uses_home() {
        let _lock = env_lock().lock().expect("env lock");
        let _home = EnvGuard::set("HOME", "/home/attrlist-test");
        assert_eq!(
            PathBuf::from(expand_tilde("~/docs/a.json".to_string())),
            PathBuf::from("/home/attrlist-test").join("docs/a.json")
        );
        assert_eq!(expand_tilde("/abs/a.json".to_string()), "/abs/a.json");
    }
}
