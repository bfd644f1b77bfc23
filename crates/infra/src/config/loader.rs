//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `AIRVANTAGE_HOST`: Server host (required)
//! - `AIRVANTAGE_CLIENT_ID`: OAuth client id (required)
//! - `AIRVANTAGE_CLIENT_SECRET`: OAuth client secret (required)
//! - `AIRVANTAGE_LOGIN` / `AIRVANTAGE_PASSWORD`: Resource-owner credentials
//! - `AIRVANTAGE_COMPANY_UID`: Tenant injected as `company`
//! - `AIRVANTAGE_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `AIRVANTAGE_DEBUG`: Observe raw responses (true/false)
//! - `AIRVANTAGE_POLL_INTERVAL_SECS`: Operation poll interval in seconds
//!
//! ## File Locations
//! The loader probes `airvantage.toml`, `airvantage.json`, `config.toml`
//! and `config.json` in the current directory, its two parents, and next to
//! the executable.

use std::path::{Path, PathBuf};

use airvantage_domain::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS};
use airvantage_domain::{AirVantageConfig, AirVantageError, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["airvantage.toml", "airvantage.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `AirVantageError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<AirVantageConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!(host = %config.host, "Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `AirVantageError::Config` if a required variable is missing, a
/// numeric variable does not parse, or a duration is zero.
pub fn load_from_env() -> Result<AirVantageConfig> {
    let host = env_var("AIRVANTAGE_HOST")?;
    let client_id = env_var("AIRVANTAGE_CLIENT_ID")?;
    let client_secret = env_var("AIRVANTAGE_CLIENT_SECRET")?;

    let mut config = AirVantageConfig::new(host, client_id, client_secret);
    config.login = env_opt("AIRVANTAGE_LOGIN");
    config.password = env_opt("AIRVANTAGE_PASSWORD");
    config.company_uid = env_opt("AIRVANTAGE_COMPANY_UID");
    config.timeout_secs = env_u64("AIRVANTAGE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
    config.debug = env_bool("AIRVANTAGE_DEBUG", false);
    config.poll_interval_secs = env_u64("AIRVANTAGE_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations (see
/// [`probe_config_paths`]). The format is detected by extension.
///
/// # Errors
/// Returns `AirVantageError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<AirVantageConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AirVantageError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AirVantageError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AirVantageError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, by file extension
fn parse_config(contents: &str, path: &Path) -> Result<AirVantageConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let config: AirVantageConfig = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AirVantageError::Config(format!("Invalid TOML format: {e}")))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| AirVantageError::Config(format!("Invalid JSON format: {e}")))?,
        _ => return Err(AirVantageError::Config(format!("Unsupported config format: {extension}"))),
    };

    config.validate()?;
    Ok(config)
}

/// Probe the standard locations for a configuration file
///
/// Searches the current working directory, its parent and grandparent, then
/// the executable's directory and its parents. Within a directory
/// `airvantage.*` wins over `config.*`, TOML over JSON.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    dirs.iter().find_map(|dir| find_config_in(dir))
}

/// First standard config file name present in `dir`
fn find_config_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| AirVantageError::Config(format!("Missing required environment variable: {key}")))
}

/// Optional environment variable; empty counts as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match env_opt(key) {
        Some(value) => value
            .parse::<u64>()
            .map_err(|e| AirVantageError::Config(format!("Invalid value for {key}: {e}"))),
        None => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::TempDir;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 9] = [
        "AIRVANTAGE_HOST",
        "AIRVANTAGE_CLIENT_ID",
        "AIRVANTAGE_CLIENT_SECRET",
        "AIRVANTAGE_LOGIN",
        "AIRVANTAGE_PASSWORD",
        "AIRVANTAGE_COMPANY_UID",
        "AIRVANTAGE_TIMEOUT_SECS",
        "AIRVANTAGE_DEBUG",
        "AIRVANTAGE_POLL_INTERVAL_SECS",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for value in ["1", "true", "yes", "on", "TRUE"] {
            std::env::set_var("AV_TEST_BOOL", value);
            assert!(env_bool("AV_TEST_BOOL", false), "{value} should be true");
        }
        for value in ["0", "false", "no", "off"] {
            std::env::set_var("AV_TEST_BOOL", value);
            assert!(!env_bool("AV_TEST_BOOL", true), "{value} should be false");
        }

        std::env::remove_var("AV_TEST_BOOL");
        assert!(env_bool("AV_TEST_BOOL", true));
        assert!(!env_bool("AV_TEST_BOOL", false));
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("AIRVANTAGE_HOST", "eu.airvantage.net");
        std::env::set_var("AIRVANTAGE_CLIENT_ID", "cid");
        std::env::set_var("AIRVANTAGE_CLIENT_SECRET", "csecret");
        std::env::set_var("AIRVANTAGE_LOGIN", "me@example.com");
        std::env::set_var("AIRVANTAGE_PASSWORD", "pw");
        std::env::set_var("AIRVANTAGE_COMPANY_UID", "T");
        std::env::set_var("AIRVANTAGE_TIMEOUT_SECS", "12");
        std::env::set_var("AIRVANTAGE_DEBUG", "yes");
        std::env::set_var("AIRVANTAGE_POLL_INTERVAL_SECS", "2");

        let config = load_from_env().expect("config from env");
        clear_env();

        assert_eq!(config.host, "eu.airvantage.net");
        assert_eq!(config.client_id, "cid");
        assert_eq!(config.client_secret, "csecret");
        assert_eq!(config.resource_owner(), Some(("me@example.com", "pw")));
        assert_eq!(config.company_uid.as_deref(), Some("T"));
        assert_eq!(config.timeout_secs, 12);
        assert!(config.debug);
        assert_eq!(config.poll_interval_secs, 2);
    }

    #[test]
    fn test_load_from_env_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("AIRVANTAGE_HOST", "h");
        std::env::set_var("AIRVANTAGE_CLIENT_ID", "id");
        std::env::set_var("AIRVANTAGE_CLIENT_SECRET", "s");
        std::env::set_var("AIRVANTAGE_COMPANY_UID", "");

        let config = load_from_env().expect("config from env");
        clear_env();

        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
        assert!(!config.debug);
        assert!(config.company_uid.is_none());
        assert!(config.login.is_none());
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("AIRVANTAGE_HOST", "h");

        let err = load_from_env().unwrap_err();
        clear_env();

        assert!(matches!(err, AirVantageError::Config(ref msg) if msg.contains("AIRVANTAGE_CLIENT_ID")));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("AIRVANTAGE_HOST", "h");
        std::env::set_var("AIRVANTAGE_CLIENT_ID", "id");
        std::env::set_var("AIRVANTAGE_CLIENT_SECRET", "s");
        std::env::set_var("AIRVANTAGE_TIMEOUT_SECS", "soon");

        let err = load_from_env().unwrap_err();
        clear_env();

        assert!(matches!(err, AirVantageError::Config(_)));
    }

    #[test]
    fn test_load_from_env_zero_poll_interval() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("AIRVANTAGE_HOST", "h");
        std::env::set_var("AIRVANTAGE_CLIENT_ID", "id");
        std::env::set_var("AIRVANTAGE_CLIENT_SECRET", "s");
        std::env::set_var("AIRVANTAGE_POLL_INTERVAL_SECS", "0");

        let err = load_from_env().unwrap_err();
        clear_env();

        assert!(matches!(err, AirVantageError::Config(ref msg) if msg.contains("poll_interval_secs")));
    }

    #[test]
    fn test_load_from_file_zero_timeout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("airvantage.toml");
        std::fs::write(&path, "host = \"h\"\nclient_id = \"id\"\nclient_secret = \"s\"\ntimeout_secs = 0\n").unwrap();

        let err = load_from_file(Some(path)).unwrap_err();
        assert!(matches!(err, AirVantageError::Config(ref msg) if msg.contains("timeout_secs")));
    }

    #[test]
    fn test_load_from_file_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("airvantage.toml");
        std::fs::write(
            &path,
            r#"
host = "https://na.airvantage.net"
client_id = "id"
client_secret = "secret"
company_uid = "T"
debug = true
"#,
        )
        .unwrap();

        let config = load_from_file(Some(path)).expect("toml config");
        assert_eq!(config.host, "https://na.airvantage.net");
        assert_eq!(config.company_uid.as_deref(), Some("T"));
        assert!(config.debug);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_from_file_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"host":"eu.airvantage.net","client_id":"id","client_secret":"s","login":"me","password":"pw","timeout_secs":30}"#,
        )
        .unwrap();

        let config = load_from_file(Some(path)).expect("json config");
        assert_eq!(config.resource_owner(), Some(("me", "pw")));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/airvantage.toml"))).unwrap_err();
        assert!(matches!(err, AirVantageError::Config(_)));
    }

    #[test]
    fn test_load_from_file_missing_required_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("airvantage.json");
        std::fs::write(&path, r#"{"host":"h"}"#).unwrap();

        let err = load_from_file(Some(path)).unwrap_err();
        assert!(matches!(err, AirVantageError::Config(ref msg) if msg.starts_with("Invalid JSON format")));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("host: h", Path::new("airvantage.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_find_config_prefers_airvantage_toml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        assert_eq!(find_config_in(dir.path()), Some(dir.path().join("config.json")));

        std::fs::write(dir.path().join("airvantage.toml"), "").unwrap();
        assert_eq!(find_config_in(dir.path()), Some(dir.path().join("airvantage.toml")));
    }

    #[test]
    fn test_find_config_in_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_in(dir.path()).is_none());
    }
}
