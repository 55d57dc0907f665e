use crate::error::shell::ShellError;
use crate::shell::{ShellBridge, ShellConfig, ShellOutput};

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use log::info;
use regex::Regex;

const ENTER_CHASSIS_COMMAND: &str = "enter chassis";
const SHOW_LICENSE_CHECK_COMMAND: &str = "show license-check";
const SET_LICENSE_CHECK_COMMAND: &str = "set license-check";
const ANSI_ESCAPE_PATTERN: &str = r"\x1b\[[0-9;]*[A-Za-z]";

static ANSI_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn get_ansi_regex() -> &'static Regex {
    ANSI_REGEX.get_or_init(|| Regex::new(ANSI_ESCAPE_PATTERN).expect("valid regex pattern"))
}

/// License-check feature flag operations, only reachable from the chassis shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseCheckOperation {
    Show,
    Enable,
    Disable,
}

impl LicenseCheckOperation {
    pub fn command(&self) -> String {
        match self {
            LicenseCheckOperation::Show => SHOW_LICENSE_CHECK_COMMAND.to_string(),
            LicenseCheckOperation::Enable => format!("{SET_LICENSE_CHECK_COMMAND} enable"),
            LicenseCheckOperation::Disable => format!("{SET_LICENSE_CHECK_COMMAND} disable"),
        }
    }
}

impl FromStr for LicenseCheckOperation {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "get" | "show" => Ok(LicenseCheckOperation::Show),
            "enable" => Ok(LicenseCheckOperation::Enable),
            "disable" => Ok(LicenseCheckOperation::Disable),
            other => Err(format!(
                "unknown license-check operation '{other}' (expected show, enable or disable)"
            )),
        }
    }
}

impl fmt::Display for LicenseCheckOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseCheckOperation::Show => write!(f, "show"),
            LicenseCheckOperation::Enable => write!(f, "enable"),
            LicenseCheckOperation::Disable => write!(f, "disable"),
        }
    }
}

/// Run a license-check operation over a fresh shell and return the status line.
///
/// Blocking. The shell is closed when this returns, whatever the outcome.
pub fn run_license_check(
    config: &ShellConfig,
    operation: LicenseCheckOperation,
) -> Result<String, ShellError> {
    let mut bridge = ShellBridge::open(config)?;
    bridge.enter(ENTER_CHASSIS_COMMAND)?;

    let output = bridge.send_command(&operation.command())?;
    let status = status_line(&output)?;

    info!("License check {operation} on {}: {status}", config.host);
    Ok(status)
}

/// Async wrapper running [`run_license_check`] on the blocking pool.
pub async fn license_check(
    config: ShellConfig,
    operation: LicenseCheckOperation,
) -> Result<String, ShellError> {
    tokio::task::spawn_blocking(move || run_license_check(&config, operation)).await?
}

/// Second line of the command output (the first is the echoed command), colour codes removed.
pub(crate) fn status_line(output: &ShellOutput) -> Result<String, ShellError> {
    let text = strip_ansi(&output.text());

    text.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .nth(1)
        .map(|line| line.trim().to_string())
        .ok_or_else(|| ShellError::output(format!("No status line in shell output {text:?}")))
}

pub(crate) fn strip_ansi(text: &str) -> String {
    get_ansi_regex().replace_all(text, "").into_owned()
}
