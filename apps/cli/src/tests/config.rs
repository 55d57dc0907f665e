// Unit tests for profile loading

use crate::config::{ChassisProfile, EnvSettings, PROFILE_FILE_NAME};

use std::fs;

/// **VALUE**: Verifies that a full profile file is read, including the shell table.
///
/// **BUG THIS CATCHES**: Would catch field renames that silently drop settings.
#[test]
fn given_profile_file_when_loaded_then_all_fields_read() {
    // GIVEN: A profile on disk
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(PROFILE_FILE_NAME);
    fs::write(
        &path,
        r#"
address = "10.36.237.139"
username = "admin"
password = "secret"
timeout = "10m"
poll_interval = "2s"
verbose = true

[shell]
port = 2222
read_timeout = "45s"
prompt = "$ "
"#,
    )
    .unwrap();

    // WHEN: Loading it explicitly
    let profile = ChassisProfile::load(Some(&path)).unwrap();

    // THEN: Fields are populated
    assert_eq!(profile.address.as_deref(), Some("10.36.237.139"));
    assert_eq!(profile.username.as_deref(), Some("admin"));
    assert_eq!(profile.timeout.as_deref(), Some("10m"));
    assert_eq!(profile.verbose, Some(true));
    assert_eq!(profile.shell.port, Some(2222));
    assert_eq!(profile.shell.prompt.as_deref(), Some("$ "));
}

/// **VALUE**: Verifies that a missing explicit profile is an error.
///
/// **WHY THIS MATTERS**: `--config` with a wrong path must not silently fall back to
/// defaults and talk to the wrong chassis.
#[test]
fn given_missing_explicit_profile_when_loaded_then_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");

    let err = ChassisProfile::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("Failed to read profile"));
}

/// **VALUE**: Verifies that typos in the profile are rejected.
///
/// **BUG THIS CATCHES**: Would catch `deny_unknown_fields` being removed, letting
/// `adress = ...` be ignored.
#[test]
fn given_profile_with_unknown_key_when_loaded_then_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(PROFILE_FILE_NAME);
    fs::write(&path, "adress = \"10.0.0.1\"\n").unwrap();

    let err = ChassisProfile::load_from_path(&path).unwrap_err();

    assert!(err.to_string().contains("Failed to parse profile"));
}

#[test]
fn given_env_lookup_when_loaded_then_blank_values_ignored() {
    let env = EnvSettings::from_lookup(|key| match key {
        "CHASSIS_USERNAME" => Some(String::from("admin")),
        "CHASSIS_PASSWORD" => Some(String::from("   ")),
        _ => None,
    });

    assert_eq!(env.username.as_deref(), Some("admin"));
    assert_eq!(env.password, None);
    assert_eq!(env.api_key, None);
}
