//! Configuration loading and resolution
//!
//! Values are resolved in priority order:
//! 1. Command-line argument (or its environment variable fallback)
//! 2. TOML config file
//! 3. Compiled default
//!
//! A missing config file is not an error: [`read_toml_config`] returns `None`
//! and the caller falls back to compiled defaults. A file that exists but does
//! not parse is.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory name under the platform config/data dirs
pub const APP_DIR: &str = "chessrate";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CHESSRATE_CONFIG";

pub const DEFAULT_USER_AGENT: &str = concat!(
    "chessrate/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/chessrate/chessrate)"
);
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_CONCURRENT_PAIRS: usize = 4;
pub const DEFAULT_LICHESS_BASE_URL: &str = "https://lichess.org";
pub const DEFAULT_CHESSCOM_BASE_URL: &str = "https://api.chess.com";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Client-identifying User-Agent sent with every request
    pub user_agent: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Upper bound on pairs resolved at the same time
    pub max_concurrent_pairs: Option<usize>,
    /// Refuse to run when the two handle lists differ in length
    pub strict_pairing: Option<bool>,
    /// Save the last handle lists for the next run
    pub remember_input: Option<bool>,
    pub lichess_base_url: Option<String>,
    pub chesscom_base_url: Option<String>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "warn" or "chessrate_cli=debug"
    pub level: Option<String>,
}

/// Values supplied on the command line (already merged with their env fallbacks)
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub timeout_secs: Option<u64>,
    pub max_concurrent_pairs: Option<usize>,
    pub strict_pairing: bool,
    pub no_remember: bool,
}

/// Fully resolved runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_concurrent_pairs: usize,
    pub strict_pairing: bool,
    pub remember_input: bool,
    pub lichess_base_url: String,
    pub chesscom_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrent_pairs: DEFAULT_MAX_CONCURRENT_PAIRS,
            strict_pairing: false,
            remember_input: true,
            lichess_base_url: DEFAULT_LICHESS_BASE_URL.to_string(),
            chesscom_base_url: DEFAULT_CHESSCOM_BASE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Merge overrides over the file config over compiled defaults
    pub fn resolve(file: &TomlConfig, overrides: &SettingsOverrides) -> Result<Self> {
        let defaults = Settings::default();

        let timeout_secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::InvalidInput(
                "timeout_secs must be at least 1".to_string(),
            ));
        }

        let max_concurrent_pairs = overrides
            .max_concurrent_pairs
            .or(file.max_concurrent_pairs)
            .unwrap_or(DEFAULT_MAX_CONCURRENT_PAIRS);
        if max_concurrent_pairs == 0 {
            return Err(Error::InvalidInput(
                "max_concurrent_pairs must be at least 1".to_string(),
            ));
        }

        let user_agent = file
            .user_agent
            .as_deref()
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.user_agent);

        Ok(Self {
            user_agent,
            timeout: Duration::from_secs(timeout_secs),
            max_concurrent_pairs,
            strict_pairing: overrides.strict_pairing || file.strict_pairing.unwrap_or(false),
            remember_input: !overrides.no_remember && file.remember_input.unwrap_or(true),
            lichess_base_url: trim_base_url(file.lichess_base_url.as_deref())
                .unwrap_or(defaults.lichess_base_url),
            chesscom_base_url: trim_base_url(file.chesscom_base_url.as_deref())
                .unwrap_or(defaults.chesscom_base_url),
        })
    }
}

fn trim_base_url(url: Option<&str>) -> Option<String> {
    url.map(|u| u.trim().trim_end_matches('/'))
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}

/// Config file location:
/// 1. Command-line argument
/// 2. `CHESSRATE_CONFIG` environment variable
/// 3. `<config dir>/chessrate/config.toml`
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path()
}

/// `<config dir>/chessrate/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Read a TOML config without logging; `None` when the file does not exist
pub fn read_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&content)?))
}

/// Write a value as TOML atomically (temp file + rename)
pub fn write_toml_file<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(value)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))?;
    }

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(Error::Io(e));
    }

    Ok(())
}

/// Platform data directory for local state (`~/.local/share/chessrate` on Linux)
pub fn data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
}
