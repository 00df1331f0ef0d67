//! Configuration loader
//!
//! Loads MailBridge configuration from an optional file and environment
//! variables.
//!
//! ## Loading Strategy
//! 1. A `.env` file in the working directory is read (if present)
//! 2. The first config file found by [`find_config_path`] provides the base,
//!    otherwise built-in defaults are used
//! 3. Environment variables override individual settings
//! 4. The result is validated before it is returned
//!
//! ## Environment Variables
//! - `MAILBRIDGE_HTTP_TIMEOUT_SECS`: Per-attempt request timeout
//! - `MAILBRIDGE_HTTP_CALL_BUDGET_SECS`: Overall budget for one call
//! - `MAILBRIDGE_HTTP_MAX_ATTEMPTS`: Total attempts including the first
//! - `MAILBRIDGE_HTTP_BASE_BACKOFF_MS`: First retry delay
//! - `MAILBRIDGE_HTTP_MAX_BACKOFF_MS`: Retry delay ceiling
//! - `MAILBRIDGE_HTTP_USER_AGENT`: User-Agent header
//! - `MAILBRIDGE_<PLATFORM>_BASE_URL`: Base URL override, e.g.
//!   `MAILBRIDGE_SENDGRID_BASE_URL`
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./mailbridge.json` or `./mailbridge.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent directory
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use mailbridge_domain::{Config, Platform, PlatformError, Result};

const ENV_PREFIX: &str = "MAILBRIDGE";

/// Load configuration from the discovered file (or defaults) plus environment
/// overrides.
///
/// # Errors
/// Returns `PlatformError::Config` if a discovered file cannot be parsed, an
/// environment variable has an invalid value, or validation fails.
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let mut config = match find_config_path() {
        Some(path) => read_config_file(&path)?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    tracing::info!(
        max_attempts = config.http.max_attempts,
        base_url_overrides = config.base_urls.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from defaults and environment variables only.
///
/// # Errors
/// Returns `PlatformError::Config` if a variable has an invalid value or the
/// resulting configuration fails validation.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Environment variables are not consulted.
///
/// # Errors
/// Returns `PlatformError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Validation fails
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PlatformError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_path().ok_or_else(|| {
            PlatformError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    let config = read_config_file(&config_path)?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Config> {
    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| PlatformError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PlatformError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PlatformError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(PlatformError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Search multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_path() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["mailbridge.json", "mailbridge.toml", "config.json", "config.toml"];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
            roots.push(exe_dir.join(".."));
        }
    }

    roots
        .iter()
        .flat_map(|root| NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    let http = &mut config.http;
    if let Some(value) = env_parse("MAILBRIDGE_HTTP_TIMEOUT_SECS")? {
        http.timeout_secs = value;
    }
    if let Some(value) = env_parse("MAILBRIDGE_HTTP_CALL_BUDGET_SECS")? {
        http.call_budget_secs = value;
    }
    if let Some(value) = env_parse("MAILBRIDGE_HTTP_MAX_ATTEMPTS")? {
        http.max_attempts = value;
    }
    if let Some(value) = env_parse("MAILBRIDGE_HTTP_BASE_BACKOFF_MS")? {
        http.base_backoff_ms = value;
    }
    if let Some(value) = env_parse("MAILBRIDGE_HTTP_MAX_BACKOFF_MS")? {
        http.max_backoff_ms = value;
    }
    if let Some(agent) = env_var("MAILBRIDGE_HTTP_USER_AGENT") {
        http.user_agent = Some(agent);
    }

    for platform in Platform::ALL {
        if let Some(url) = env_var(&base_url_key(platform)) {
            config.base_urls.insert(platform.as_str().to_string(), url);
        }
    }

    Ok(())
}

/// `MAILBRIDGE_CONSTANT_CONTACT_BASE_URL` for `constant_contact`.
fn base_url_key(platform: Platform) -> String {
    format!("{ENV_PREFIX}_{}_BASE_URL", platform.as_str().to_ascii_uppercase())
}

/// Non-blank environment variable value.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

/// Parse an optional numeric environment variable.
///
/// # Errors
/// Returns `PlatformError::Config` if the variable is set but unparsable.
fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    env_var(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| PlatformError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}
