use chassis_cli::cli::Cli;
use chassis_cli::commands;
use chassis_cli::config::{ChassisProfile, EnvSettings};
use chassis_cli::error::CliError;
use chassis_cli::logger::{initialize as LoggerInitialize, level_for};

use chassis_core::CancellationToken;

use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use serde_json::Value;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let profile = ChassisProfile::load(cli.config.as_deref())?;
    let verbose = cli.verbose || profile.verbose.unwrap_or(false);

    // Initialize logger FIRST
    let log_dir = cli.log_dir.clone().or_else(|| profile.log_dir.clone());
    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir).map_err(|e| {
            CliError::config(format!("Failed to create log directory {}: {e}", dir.display()))
        })?;
    }
    LoggerInitialize(level_for(verbose), log_dir.as_deref())?;

    let env = EnvSettings::load();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            trigger.cancel();
        }
    });

    let value = tokio::select! {
        result = commands::run(&cli, &profile, &env, &cancel) => result?,
        _ = cancel.cancelled() => return Err(CliError::cli("Interrupted")),
    };

    print_value(&value)?;
    info!("Done");
    Ok(())
}

fn print_value(value: &Value) -> Result<(), CliError> {
    match value {
        Value::String(text) => println!("{text}"),
        Value::Null => {}
        other => {
            let text = serde_json::to_string_pretty(other)
                .map_err(|e| CliError::cli(format!("Failed to render output: {e}")))?;
            println!("{text}");
        }
    }
    Ok(())
}
