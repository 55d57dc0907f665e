//! Connection settings for the CLI.
//!
//! Three sources, highest precedence first: command-line flags, the TOML
//! profile (`chassis.toml`), and the environment (`CHASSIS_*`, `.env`).

use crate::cli::ConnectionArgs;
use crate::error::CliError;

use chassis_core::{SessionConfig, ShellConfig};

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;

pub const PROFILE_FILE_NAME: &str = "chassis.toml";
const PROFILE_DIR_NAME: &str = "chassis-cli";

pub const ENV_ADDRESS: &str = "CHASSIS_ADDRESS";
pub const ENV_USERNAME: &str = "CHASSIS_USERNAME";
pub const ENV_PASSWORD: &str = "CHASSIS_PASSWORD";
pub const ENV_API_KEY: &str = "CHASSIS_API_KEY";

// ============================================
// PROFILE FILE
// ============================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellProfile {
    pub port: Option<u16>,
    /// Humantime duration, e.g. `"30s"`.
    pub read_timeout: Option<String>,
    pub settle_delay: Option<String>,
    pub prompt: Option<String>,
}

/// Contents of `chassis.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChassisProfile {
    pub address: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<String>,
    pub poll_interval: Option<String>,
    pub request_timeout: Option<String>,
    pub verbose: Option<bool>,
    pub insecure_request_warning: Option<bool>,
    pub log_dir: Option<PathBuf>,
    pub shell: ShellProfile,
}

impl ChassisProfile {
    /// Default profile location under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROFILE_DIR_NAME).join(PROFILE_FILE_NAME))
    }

    /// Load the profile.
    ///
    /// An explicit path must exist. The default location falls back to an
    /// empty profile when there is no file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("No profile found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("Failed to read profile {}: {e}", path.display()))
        })?;

        let profile: ChassisProfile = toml::from_str(&contents).map_err(|e| {
            CliError::config(format!("Failed to parse profile {}: {e}", path.display()))
        })?;

        info!("Profile loaded from {}", path.display());
        Ok(profile)
    }
}

// ============================================
// ENVIRONMENT
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    pub address: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
}

impl EnvSettings {
    /// Read `CHASSIS_*` variables after loading `.env` from the working directory.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from: {}", path.display()),
            Err(e) => debug!("No .env loaded: {e}"),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            address: read(ENV_ADDRESS),
            username: read(ENV_USERNAME),
            password: read(ENV_PASSWORD),
            api_key: read(ENV_API_KEY),
        }
    }
}

// ============================================
// RESOLUTION
// ============================================

/// Build the session config from flags, profile and environment.
///
/// # Errors
///
/// - no chassis address in any source
/// - a profile duration that does not parse
/// - a resulting config that fails validation
pub fn session_config(
    flags: &ConnectionArgs,
    profile: &ChassisProfile,
    env: &EnvSettings,
    verbose: bool,
) -> Result<SessionConfig, CliError> {
    let address = first([&flags.address, &profile.address, &env.address]).ok_or_else(|| {
        CliError::config(format!(
            "No chassis address: pass --address, set `address` in {PROFILE_FILE_NAME} or {ENV_ADDRESS}"
        ))
    })?;

    let mut config = SessionConfig::new(address);

    let username = first([&flags.username, &profile.username, &env.username]);
    let password = first([&flags.password, &profile.password, &env.password]);
    if let Some(username) = username {
        config = config.with_credentials(username, password.unwrap_or_default());
    }

    if let Some(api_key) = first([&flags.api_key, &profile.api_key, &env.api_key]) {
        config = config.with_api_key(api_key);
    }

    if let Some(timeout) = duration_setting(flags.timeout, &profile.timeout, "timeout")? {
        config = config.with_timeout(timeout);
    }
    if let Some(interval) = duration_setting(flags.poll_interval, &profile.poll_interval, "poll_interval")? {
        config = config.with_poll_interval(interval);
    }
    if let Some(limit) = duration_setting(None, &profile.request_timeout, "request_timeout")? {
        config = config.with_request_timeout(limit);
    }

    config = config
        .with_verbose(verbose || profile.verbose.unwrap_or(false))
        .with_insecure_request_warning(profile.insecure_request_warning.unwrap_or(false));

    config
        .validate()
        .map_err(|e| CliError::config(e.to_string()))?;

    Ok(config)
}

/// Shell settings for the session's chassis, with profile overrides.
pub fn shell_config(session: &SessionConfig, profile: &ChassisProfile) -> Result<ShellConfig, CliError> {
    let mut shell = ShellConfig::for_session(session).map_err(|e| CliError::config(e.to_string()))?;
    let overrides = &profile.shell;

    if let Some(port) = overrides.port {
        shell.port = port;
    }
    if let Some(timeout) = duration_setting(None, &overrides.read_timeout, "shell.read_timeout")? {
        shell.read_timeout = timeout;
    }
    if let Some(delay) = duration_setting(None, &overrides.settle_delay, "shell.settle_delay")? {
        shell.settle_delay = delay;
    }
    if let Some(prompt) = &overrides.prompt {
        shell.prompt = prompt.clone();
    }

    shell.validate().map_err(|e| CliError::config(e.to_string()))?;
    Ok(shell)
}

fn first<const N: usize>(sources: [&Option<String>; N]) -> Option<String> {
    sources.into_iter().flatten().next().cloned()
}

fn duration_setting(
    flag: Option<Duration>,
    profile: &Option<String>,
    name: &str,
) -> Result<Option<Duration>, CliError> {
    if flag.is_some() {
        return Ok(flag);
    }

    profile
        .as_deref()
        .map(|text| {
            humantime::parse_duration(text)
                .map_err(|e| CliError::config(format!("Invalid duration for `{name}` ('{text}'): {e}")))
        })
        .transpose()
}
