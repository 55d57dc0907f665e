use crate::cli::{Cli, Commands};
use crate::config::{ChassisProfile, EnvSettings, session_config, shell_config};
use crate::error::CliError;

use chassis_core::shell::license_check;
use chassis_core::{CancellationToken, ChassisRequest, Licensing, Session};

use log::{debug, info};
use serde_json::Value;

/// Run one subcommand and return what should be printed.
///
/// # Errors
///
/// Returns [`CliError`] if configuration is incomplete, the session cannot
/// be established, or the chassis rejects the call.
pub async fn run(
    cli: &Cli,
    profile: &ChassisProfile,
    env: &EnvSettings,
    cancel: &CancellationToken,
) -> Result<Value, CliError> {
    let config = session_config(&cli.connection, profile, env, cli.verbose)?;
    debug!("Resolved session config: {config:?}");

    match &cli.command {
        Commands::LicenseCheck { operation } => {
            let shell = shell_config(&config, profile)?;
            let status = license_check(shell, *operation).await?;
            Ok(Value::String(status))
        }
        command => {
            info!("Connecting to {}", config.address);
            let session = Session::connect(config).await?;
            run_rest(&session, command, cancel).await
        }
    }
}

async fn run_rest(
    session: &Session,
    command: &Commands,
    cancel: &CancellationToken,
) -> Result<Value, CliError> {
    let licensing = Licensing::new(session);

    let value = match command {
        Commands::Get { target } => session
            .request_with_cancellation(ChassisRequest::get(target.as_str()), cancel)
            .await?
            .into_response()?
            .body
            .unwrap_or(Value::Null),
        Commands::Servers => licensing.servers().await?,
        Commands::AddServer { host } => licensing.add_server(host).await?,
        Commands::RemoveServer { id } => licensing.remove_server(*id).await?,
        Commands::Connectivity { id } => licensing.test_connectivity(*id).await?,
        Commands::Licenses { id } => licensing.retrieve_licenses(*id).await?,
        Commands::CodeInfo { code, id } => licensing.activation_code_info(*id, code).await?,
        Commands::Activate { codes, id } => licensing.activate(*id, codes).await?,
        Commands::Deactivate { codes, id } => licensing.deactivate(*id, codes).await?,
        Commands::LicenseCheck { .. } => {
            return Err(CliError::cli("license-check runs over the shell, not REST"));
        }
    };

    Ok(value)
}
