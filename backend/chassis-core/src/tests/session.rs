// Unit tests for session configuration and endpoint resolution

use crate::error::config::ConfigError;
use crate::session::{ChassisEndpoint, ChassisRequest, Reply, Session, SessionConfig};
use crate::shell::{ShellConfig, host_of};
use crate::async_op::AsyncOutcome;

use std::time::Duration;

use url::Url;

/// **VALUE**: Verifies the defaults a session starts with.
///
/// **WHY THIS MATTERS**: Async operations such as license activation routinely take
/// minutes; a short default timeout would fail them spuriously.
///
/// **BUG THIS CATCHES**: Would catch default constants drifting.
#[test]
fn given_new_config_when_inspected_then_defaults_apply() {
    let config = SessionConfig::new("10.0.0.5");

    assert_eq!(config.timeout, Duration::from_secs(600));
    assert_eq!(config.poll_interval, Duration::from_secs(2));
    assert!(config.accept_invalid_certs);
    assert!(!config.insecure_request_warning);
    assert!(!config.verbose);
    assert!(config.validate().is_ok());
}

/// **VALUE**: Verifies that invalid configs are rejected before any I/O.
///
/// **WHY THIS MATTERS**: A zero poll interval would hammer the chassis in a tight loop;
/// an empty address would fail with a confusing URL error on the first call.
///
/// **BUG THIS CATCHES**: Would catch a validation rule being dropped.
#[test]
fn given_invalid_configs_when_validated_then_rejected() {
    let cases = vec![
        SessionConfig::new("  "),
        SessionConfig::new("chassis").with_poll_interval(Duration::ZERO),
        SessionConfig::new("chassis").with_request_timeout(Duration::ZERO),
        SessionConfig::new("chassis")
            .with_timeout(Duration::from_secs(1))
            .with_poll_interval(Duration::from_secs(5)),
        SessionConfig::new("chassis").with_credentials("", "secret"),
    ];

    for config in cases {
        assert!(
            matches!(config.validate(), Err(ConfigError::Validation { .. })),
            "should reject {config:?}"
        );
    }
}

/// **VALUE**: Verifies that the password never shows up in debug output.
///
/// **BUG THIS CATCHES**: Would catch `Credentials` deriving Debug over a plain `String`.
#[test]
fn given_config_with_secrets_when_debug_formatted_then_secrets_redacted() {
    let config = SessionConfig::new("chassis")
        .with_credentials("admin", "hunter2")
        .with_api_key("0123456789abcdef");

    let debug = format!("{config:?}");

    assert!(!debug.contains("hunter2"));
    assert!(!debug.contains("0123456789abcdef"));
    assert!(debug.contains("admin"));
}

/// **VALUE**: Verifies how a bare host and relative targets map onto URLs.
///
/// **WHY THIS MATTERS**: Every endpoint method passes relative targets; a missing slash or
/// wrong base path sends every call to a 404.
///
/// **BUG THIS CATCHES**: Would catch double slashes or a lost IxOS API prefix.
#[test]
fn given_bare_host_when_resolving_targets_then_https_urls_under_api_roots() {
    // GIVEN: An endpoint built from a bare host
    let endpoint = ChassisEndpoint::new("10.36.237.139").unwrap();

    // WHEN / THEN: Each API root is correct
    assert_eq!(endpoint.origin(), "https://10.36.237.139");
    assert_eq!(
        endpoint.resolve("ports").unwrap().as_str(),
        "https://10.36.237.139/chassis/api/v2/ixos/ports"
    );
    assert_eq!(
        endpoint.resolve("/cards/1").unwrap().as_str(),
        "https://10.36.237.139/chassis/api/v2/ixos/cards/1"
    );
    assert_eq!(
        endpoint.auth_url().unwrap().as_str(),
        "https://10.36.237.139/platform/api/v1/auth/session"
    );
    assert_eq!(
        endpoint.licensing_url("servers").unwrap().as_str(),
        "https://10.36.237.139/platform/api/v2/licensing/servers"
    );
}

/// **VALUE**: Verifies that absolute targets (such as status URLs) pass through untouched.
///
/// **BUG THIS CATCHES**: Would catch status URLs being prefixed with the IxOS root.
#[test]
fn given_absolute_target_when_resolved_then_used_verbatim() {
    let endpoint = ChassisEndpoint::new("http://127.0.0.1:8080/").unwrap();

    assert_eq!(endpoint.origin(), "http://127.0.0.1:8080");
    assert_eq!(
        endpoint.resolve("https://other/op/1").unwrap().as_str(),
        "https://other/op/1"
    );
}

#[test]
fn given_urls_when_checked_for_auth_then_only_login_path_matches() {
    let auth = Url::parse("https://c/platform/api/v1/auth/session").unwrap();
    let other = Url::parse("https://c/chassis/api/v2/ixos/session").unwrap();

    assert!(ChassisEndpoint::is_auth_url(&auth));
    assert!(!ChassisEndpoint::is_auth_url(&other));
}

/// **VALUE**: Verifies that building a session performs validation but no I/O.
#[test]
fn given_invalid_config_when_session_built_then_config_error() {
    let result = Session::new(SessionConfig::new(""));

    assert!(matches!(result, Err(crate::SessionError::Config(_))));
}

#[test]
fn given_request_builders_when_chained_then_fields_set() {
    let request = ChassisRequest::post("servers")
        .with_payload(serde_json::json!({"host": "h"}))
        .with_param("limit", "5");

    assert_eq!(request.method, reqwest::Method::POST);
    assert_eq!(request.target, "servers");
    assert!(request.payload.is_some());
    assert_eq!(request.params, vec![(String::from("limit"), String::from("5"))]);
}

/// **VALUE**: Verifies that asking a reply for the wrong shape is a protocol error.
///
/// **BUG THIS CATCHES**: Would catch a silent `None`/default when an endpoint that should
/// answer directly unexpectedly ran asynchronously.
#[test]
fn given_async_reply_when_into_response_then_protocol_error() {
    let reply = Reply::Async(AsyncOutcome::Failed {
        message: String::new(),
    });

    assert!(reply.is_async());
    assert!(reply.body().is_none());
    assert!(matches!(
        reply.into_response(),
        Err(crate::SessionError::Protocol { .. })
    ));
}

/// **VALUE**: Verifies that the shell reuses the REST session's host and credentials.
///
/// **BUG THIS CATCHES**: Would catch a full URL (with scheme and port) being passed to
/// the SSH connect call as a host name.
#[test]
fn given_session_config_when_shell_config_derived_then_host_and_credentials_reused() {
    let session = SessionConfig::new("https://10.0.0.5:8443").with_credentials("admin", "pw");

    let shell = ShellConfig::for_session(&session).unwrap();

    assert_eq!(shell.host, "10.0.0.5");
    assert_eq!(shell.port, 22);
    assert_eq!(shell.username, "admin");
    assert_eq!(shell.password.expose(), "pw");
    assert_eq!(shell.prompt, "# ");
    assert_eq!(shell.terminal_width, 500);
}

#[test]
fn given_session_without_credentials_when_shell_config_derived_then_error() {
    let session = SessionConfig::new("10.0.0.5").with_api_key("k");

    assert!(ShellConfig::for_session(&session).is_err());
}

#[test]
fn given_addresses_when_host_extracted_then_scheme_and_path_removed() {
    assert_eq!(host_of("chassis.lab").unwrap(), "chassis.lab");
    assert_eq!(host_of("chassis.lab/").unwrap(), "chassis.lab");
    assert_eq!(host_of("http://127.0.0.1:9000").unwrap(), "127.0.0.1");
    assert!(host_of("").is_err());
}
