// Unit tests for error module

use crate::error::CliError;

use chassis_core::error::config::ConfigError;
use chassis_core::{CoreError, SessionError};

/// **VALUE**: Tests that errors can be serialized.
///
/// **WHY THIS MATTERS**: Wrapper scripts parse failures from the CLI; if serialization
/// breaks they only get opaque text.
///
/// **BUG THIS CATCHES**: Would catch a non-serializable field being added to a variant.
#[test]
fn given_cli_error_when_serialized_then_succeeds() {
    // GIVEN: A CliError
    let err = CliError::cli("Interrupted");

    // WHEN: Serializing to JSON
    let json = serde_json::to_string(&err).unwrap();

    // THEN: Variant tag and message are present
    assert!(json.contains("\"type\":\"Cli\""), "JSON should contain variant tag: {json}");
    assert!(json.contains("Interrupted"));
}

/// **VALUE**: Verifies that core errors keep their category when flattened.
///
/// **BUG THIS CATCHES**: Would catch every core failure being reported as the same kind.
#[test]
fn given_session_error_when_converted_then_category_kept() {
    let err: CliError = SessionError::protocol("no apiKey").into();

    match &err {
        CliError::Core { category, message, .. } => {
            assert_eq!(*category, "protocol");
            assert!(message.contains("no apiKey"));
        }
        other => panic!("Expected Core, got {other:?}"),
    }
    assert!(serde_json::to_string(&err).unwrap().contains("protocol"));
}

#[test]
fn given_core_config_error_when_converted_then_config_variant() {
    let core = CoreError::Config(ConfigError::validation("Shell host cannot be empty"));

    let err: CliError = core.into();

    assert!(matches!(err, CliError::Config { .. }));
    assert!(err.to_string().contains("Shell host cannot be empty"));
}
