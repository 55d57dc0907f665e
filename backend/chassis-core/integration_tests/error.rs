use chassis_core::error::config::ConfigError;
use chassis_core::{CoreError, SessionError, ShellError};

use std::io::{Error as IoError, ErrorKind};
use std::time::Duration;

/// **VALUE**: Verifies that `SessionError` constructors record where they were called.
///
/// **WHY THIS MATTERS**: The same protocol error can come from the poller, the translator
/// or the session; the location is what tells them apart in a log.
///
/// **BUG THIS CATCHES**: Would catch `#[track_caller]` being removed from a constructor, or
/// the location disappearing from Display.
#[test]
fn given_protocol_error_when_formatted_then_includes_location() {
    // GIVEN: A protocol error created here
    let err = SessionError::protocol("missing resultUrl");

    // WHEN: Formatting
    let text = err.to_string();

    // THEN: Category, message and this file are present
    assert!(text.contains("Protocol Error"));
    assert!(text.contains("missing resultUrl"));
    assert!(text.contains("error.rs"));
}

#[test]
fn given_async_timeout_when_formatted_then_includes_url_and_limit() {
    let err = SessionError::async_timeout(
        "https://chassis/op/1",
        Duration::from_secs(601),
        Duration::from_secs(600),
    );

    let text = err.to_string();

    assert!(text.contains("https://chassis/op/1"));
    assert!(text.contains("600s"));
    assert_eq!(err.error_category(), "async_timeout");
}

/// **VALUE**: Verifies that config errors keep their reason through every wrapper.
///
/// **BUG THIS CATCHES**: Would catch a `#[error(transparent)]` being replaced with a
/// message that hides the reason.
#[test]
fn given_config_error_when_wrapped_then_reason_survives() {
    let session: SessionError = ConfigError::validation("Poll interval must be greater than zero").into();
    let shell: ShellError = ConfigError::validation("Shell host cannot be empty").into();
    let core: CoreError = session.into();

    assert!(core.to_string().contains("Poll interval must be greater than zero"));
    assert!(shell.to_string().contains("Shell host cannot be empty"));
}

#[test]
fn given_io_error_when_converted_to_shell_error_then_source_kept() {
    let err: ShellError = IoError::new(ErrorKind::BrokenPipe, "pipe closed").into();

    match &err {
        ShellError::Io { source, .. } => assert_eq!(source.kind(), ErrorKind::BrokenPipe),
        other => panic!("Expected Io, got {other:?}"),
    }
    assert!(err.to_string().contains("pipe closed"));
    assert!(err.to_string().contains("error.rs"));
}

#[test]
fn given_shell_timeout_when_formatted_then_shows_prompt_and_received_text() {
    let err = ShellError::Timeout {
        prompt: String::from("# "),
        timeout: Duration::from_secs(30),
        received: String::from("Password: "),
        location: common::ErrorLocation::from(std::panic::Location::caller()),
    };

    let text = err.to_string();

    assert!(text.contains("'# '"));
    assert!(text.contains("Password: "));
}

/// **VALUE**: Verifies libssh2 failures become channel errors located at the `?` site.
///
/// **BUG THIS CATCHES**: Would catch the conversion losing the libssh2 message, or
/// `#[track_caller]` being dropped so every channel error points into `shell.rs`.
#[test]
fn given_ssh2_error_when_converted_then_channel_error_with_message() {
    // GIVEN: A libssh2 session error
    let source = ssh2::Error::new(ssh2::ErrorCode::Session(-7), "Unable to send data");

    // WHEN: Converting it the way `?` does
    let err = ShellError::from(source);

    // THEN: Channel variant, message kept, location in this file
    assert!(matches!(err, ShellError::Channel { .. }), "got {err:?}");
    let text = err.to_string();
    assert!(text.contains("Unable to send data"));
    assert!(text.contains("error.rs"));
}
