use chassis_cli::cli::ConnectionArgs;
use chassis_cli::config::{ChassisProfile, EnvSettings, session_config, shell_config};

use std::time::Duration;

fn profile() -> ChassisProfile {
    ChassisProfile {
        address: Some(String::from("profile.lab")),
        username: Some(String::from("profile-user")),
        password: Some(String::from("profile-pass")),
        timeout: Some(String::from("15m")),
        ..Default::default()
    }
}

fn env() -> EnvSettings {
    EnvSettings {
        address: Some(String::from("env.lab")),
        username: Some(String::from("env-user")),
        password: Some(String::from("env-pass")),
        api_key: Some(String::from("env-key")),
    }
}

/// **VALUE**: Verifies precedence: flags over profile over environment.
///
/// **WHY THIS MATTERS**: A one-off `--address` must win over the saved profile, and the
/// profile over whatever is exported in the shell.
///
/// **BUG THIS CATCHES**: Would catch sources being consulted in the wrong order.
#[test]
fn given_all_sources_when_resolved_then_flags_win_then_profile_then_env() {
    // GIVEN: A flag for the address only
    let flags = ConnectionArgs {
        address: Some(String::from("flag.lab")),
        ..Default::default()
    };

    // WHEN: Resolving
    let config = session_config(&flags, &profile(), &env(), false).unwrap();

    // THEN: Each field comes from the highest source that has it
    assert_eq!(config.address, "flag.lab");
    let credentials = config.credentials.as_ref().unwrap();
    assert_eq!(credentials.username, "profile-user");
    assert_eq!(credentials.password.expose(), "profile-pass");
    assert_eq!(config.api_key.as_ref().unwrap().expose(), "env-key");
    assert_eq!(config.timeout, Duration::from_secs(900));
}

#[test]
fn given_no_address_anywhere_when_resolved_then_config_error() {
    let err = session_config(
        &ConnectionArgs::default(),
        &ChassisProfile::default(),
        &EnvSettings::default(),
        false,
    )
    .unwrap_err();

    assert!(err.to_string().contains("No chassis address"));
}

/// **VALUE**: Verifies that a malformed duration in the profile is reported by name.
#[test]
fn given_bad_profile_duration_when_resolved_then_error_names_setting() {
    let profile = ChassisProfile {
        address: Some(String::from("c")),
        poll_interval: Some(String::from("soon")),
        ..Default::default()
    };

    let err = session_config(&ConnectionArgs::default(), &profile, &EnvSettings::default(), false)
        .unwrap_err();

    assert!(err.to_string().contains("poll_interval"));
}

#[test]
fn given_verbose_flag_when_resolved_then_session_logs_requests() {
    let flags = ConnectionArgs {
        address: Some(String::from("c")),
        ..Default::default()
    };

    let config = session_config(&flags, &ChassisProfile::default(), &EnvSettings::default(), true)
        .unwrap();

    assert!(config.verbose);
}

/// **VALUE**: Verifies that shell settings reuse the session's host and apply overrides.
#[test]
fn given_shell_overrides_when_shell_config_built_then_applied() {
    let mut profile = profile();
    profile.shell.port = Some(2222);
    profile.shell.settle_delay = Some(String::from("1s"));

    let session = session_config(&ConnectionArgs::default(), &profile, &EnvSettings::default(), false)
        .unwrap();
    let shell = shell_config(&session, &profile).unwrap();

    assert_eq!(shell.host, "profile.lab");
    assert_eq!(shell.port, 2222);
    assert_eq!(shell.settle_delay, Duration::from_secs(1));
    assert_eq!(shell.username, "profile-user");
}
