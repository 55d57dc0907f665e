use chassis_core::{ActivationCodeQuantity, LicenseCheckOperation};

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chassis")]
#[command(about = "Chassis management client - licensing and license-check from the command line")]
#[command(version)]
pub struct Cli {
    /// Log every request and response, and debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Profile to load instead of the default chassis.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write logs to chassis.log in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that override the profile and environment.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Chassis host or origin (e.g. 10.0.0.5 or https://chassis.lab)
    #[arg(short, long, global = true, value_name = "HOST")]
    pub address: Option<String>,

    #[arg(short, long, global = true)]
    pub username: Option<String>,

    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Pre-obtained API key; skips login
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Limit for async operations (e.g. 10m)
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Delay between async status polls (e.g. 2s)
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub poll_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// GET a resource under the IxOS API root, or an absolute URL
    Get {
        target: String,
    },

    /// List license servers
    Servers,

    /// Register a license server
    AddServer {
        host: String,
    },

    /// Remove a license server
    RemoveServer {
        id: u32,
    },

    /// Test the license server's connection to the licensing backend
    Connectivity {
        #[arg(long, default_value_t = 1)]
        id: u32,
    },

    /// List installed licenses
    #[command(alias = "ls")]
    Licenses {
        #[arg(long, default_value_t = 1)]
        id: u32,
    },

    /// Show what an activation code entitles to
    CodeInfo {
        code: String,
        #[arg(long, default_value_t = 1)]
        id: u32,
    },

    /// Activate licenses; codes as CODE or CODE:QUANTITY
    Activate {
        #[arg(required = true, value_parser = parse_code_quantity)]
        codes: Vec<ActivationCodeQuantity>,
        #[arg(long, default_value_t = 1)]
        id: u32,
    },

    /// Deactivate licenses; codes as CODE or CODE:QUANTITY
    Deactivate {
        #[arg(required = true, value_parser = parse_code_quantity)]
        codes: Vec<ActivationCodeQuantity>,
        #[arg(long, default_value_t = 1)]
        id: u32,
    },

    /// Show or toggle license checking (over SSH)
    LicenseCheck {
        /// show, enable or disable
        #[arg(value_parser = LicenseCheckOperation::from_str, default_value = "show")]
        operation: LicenseCheckOperation,
    },
}

/// Parse `CODE` or `CODE:QUANTITY`; quantity defaults to 1.
pub fn parse_code_quantity(value: &str) -> Result<ActivationCodeQuantity, String> {
    let (code, quantity) = match value.rsplit_once(':') {
        Some((code, quantity)) => {
            let quantity = quantity
                .parse::<u32>()
                .map_err(|e| format!("invalid quantity in '{value}': {e}"))?;
            (code, quantity)
        }
        None => (value, 1),
    };

    if code.trim().is_empty() {
        return Err(format!("missing activation code in '{value}'"));
    }
    if quantity == 0 {
        return Err(format!("quantity must be at least 1 in '{value}'"));
    }

    Ok(ActivationCodeQuantity::new(code.trim(), quantity))
}
