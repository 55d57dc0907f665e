// Unit tests for status classification and terminal-state resolution

use crate::async_op::{AsyncOperationDescriptor, AsyncOutcome, AsyncState};
use crate::error::session::{REAUTHENTICATE_HINT, SessionError};
use crate::translator::{check_status, resolve_terminal};
use crate::transport::Response;

use common::HttpStatusCode;

use serde_json::json;
use url::Url;

fn response(status: u16, url: &str, body: Option<serde_json::Value>) -> Response {
    let text = body.as_ref().map(|b| b.to_string()).unwrap_or_default();
    Response {
        status: HttpStatusCode(status),
        reason: String::from("Reason"),
        url: Url::parse(url).unwrap(),
        body,
        text,
    }
}

fn descriptor(state: &str, result_url: Option<&str>, message: Option<&str>) -> AsyncOperationDescriptor {
    AsyncOperationDescriptor {
        state: AsyncState::from(state.to_string()),
        url: Some(String::from("https://chassis/op/1")),
        result_url: result_url.map(str::to_string),
        message: message.map(str::to_string),
    }
}

/// **VALUE**: Verifies that 2xx, 3xx and 5xx responses pass through `check_status()`.
///
/// **WHY THIS MATTERS**: Only 4xx is turned into an error. Server errors are handed back
/// to the caller as ordinary responses so they can inspect the body themselves.
///
/// **BUG THIS CATCHES**: Would catch a classification that treats every non-2xx as a
/// failure, which would hide 5xx diagnostics behind a generic error.
#[test]
fn given_non_client_error_status_when_checked_then_passes() {
    // GIVEN: Responses across the non-4xx ranges
    for status in [200, 201, 204, 302, 500, 503] {
        let response = response(status, "https://chassis/chassis/api/v2/ixos/ports", None);

        // WHEN / THEN: No error is produced
        assert!(check_status(&response).is_ok(), "status {status} should pass");
    }
}

/// **VALUE**: Verifies that a 4xx becomes `SessionError::Client` with status and body kept.
///
/// **WHY THIS MATTERS**: Callers branch on the status code (404 vs 409 etc.), so it must
/// be stored on the error, not only rendered into the message.
///
/// **BUG THIS CATCHES**: Would catch loss of the status code or of the chassis' body.
#[test]
fn given_404_with_body_when_checked_then_client_error_carries_status_and_body() {
    // GIVEN: A 404 with a JSON body
    let response = response(
        404,
        "https://chassis/chassis/api/v2/ixos/ports/99",
        Some(json!({"error": "no such port"})),
    );

    // WHEN: Checking the status
    let err = check_status(&response).unwrap_err();

    // THEN: Status and body survive
    assert_eq!(err.status_code(), Some(HttpStatusCode(404)));
    let text = err.to_string();
    assert!(text.contains("Client Error: 404"));
    assert!(text.contains("no such port"));
    assert!(!text.contains(REAUTHENTICATE_HINT));
}

/// **VALUE**: Verifies the re-authentication hint on a 401 from a regular endpoint.
///
/// **WHY THIS MATTERS**: An expired key is the usual cause of a 401 on a data endpoint;
/// the hint tells the user what to do next.
///
/// **BUG THIS CATCHES**: Would catch the hint being dropped or attached unconditionally.
#[test]
fn given_401_from_data_endpoint_when_checked_then_error_has_reauth_hint() {
    // GIVEN: A 401 from an IxOS resource
    let response = response(401, "https://chassis/chassis/api/v2/ixos/ports", None);

    // WHEN: Checking the status
    let err = check_status(&response).unwrap_err();

    // THEN: The hint is present and the error is classified as an auth failure
    assert!(err.is_auth_failure());
    assert_eq!(err.error_category(), "unauthorized");
    assert!(err.to_string().contains(REAUTHENTICATE_HINT));
}

/// **VALUE**: Verifies that a 401 from the authentication endpoint has no hint.
///
/// **WHY THIS MATTERS**: Telling a user whose password was rejected to "call authenticate"
/// is misleading; they just did.
///
/// **BUG THIS CATCHES**: Would catch the auth-endpoint check matching on the wrong path.
#[test]
fn given_401_from_auth_endpoint_when_checked_then_no_hint() {
    // GIVEN: A 401 from the login endpoint
    let response = response(401, "https://chassis/platform/api/v1/auth/session", None);

    // WHEN: Checking the status
    let err = check_status(&response).unwrap_err();

    // THEN: The error carries no hint
    match err {
        SessionError::Client { hint, .. } => assert!(hint.is_none()),
        other => panic!("Expected Client error, got {other:?}"),
    }
}

/// **VALUE**: Verifies that `SUCCESS` and `COMPLETED` both resolve to `Completed`.
///
/// **WHY THIS MATTERS**: Different chassis builds report success with different words.
///
/// **BUG THIS CATCHES**: Would catch one of the two success spellings being treated as unknown.
#[test]
fn given_success_states_with_result_url_when_resolved_then_completed() {
    for state in ["SUCCESS", "COMPLETED"] {
        // GIVEN: A terminal success descriptor
        let descriptor = descriptor(state, Some("https://chassis/result/1"), None);

        // WHEN: Resolving
        let outcome = resolve_terminal(&descriptor).unwrap();

        // THEN: The result URL is handed back
        assert_eq!(
            outcome,
            AsyncOutcome::Completed {
                result_url: String::from("https://chassis/result/1")
            }
        );
    }
}

/// **VALUE**: Verifies that a success state without `resultUrl` is a protocol error.
///
/// **WHY THIS MATTERS**: A success with nothing to fetch cannot be acted on; returning an
/// empty URL would just move the failure to the next request.
///
/// **BUG THIS CATCHES**: Would catch `unwrap_or_default()` creeping into the success path.
#[test]
fn given_success_without_result_url_when_resolved_then_protocol_error() {
    // GIVEN: SUCCESS with no resultUrl
    let descriptor = descriptor("SUCCESS", None, None);

    // WHEN: Resolving
    let err = resolve_terminal(&descriptor).unwrap_err();

    // THEN: Protocol error
    assert!(matches!(err, SessionError::Protocol { .. }));
}

/// **VALUE**: Verifies that `ERROR` yields `Failed` with the message, or an empty one.
///
/// **WHY THIS MATTERS**: A failed chassis operation is an outcome, not a transport error;
/// callers decide what to do with the message.
///
/// **BUG THIS CATCHES**: Would catch `ERROR` being raised as an exception-style error, or a
/// missing message turning into a parse failure.
#[test]
fn given_error_state_when_resolved_then_failed_with_message() {
    // GIVEN: ERROR with and without a message
    let with_message = descriptor("ERROR", None, Some("license server unreachable"));
    let without_message = descriptor("ERROR", None, None);

    // WHEN: Resolving both
    let first = resolve_terminal(&with_message).unwrap();
    let second = resolve_terminal(&without_message).unwrap();

    // THEN: Messages are passed through verbatim
    assert_eq!(first.failure_message(), Some("license server unreachable"));
    assert_eq!(second.failure_message(), Some(""));
    assert!(!first.is_completed());
}

/// **VALUE**: Verifies that unknown states are reported, not looped on.
///
/// **WHY THIS MATTERS**: A new state name from a future firmware must not leave the client
/// polling until timeout or report success.
///
/// **BUG THIS CATCHES**: Would catch unknown states being folded into IN_PROGRESS or SUCCESS.
#[test]
fn given_unknown_state_when_resolved_then_protocol_error_names_state() {
    // GIVEN: An unrecognized state
    let descriptor = descriptor("QUEUED", None, None);

    // WHEN: Resolving
    let err = resolve_terminal(&descriptor).unwrap_err();

    // THEN: The state name is in the message
    assert!(err.to_string().contains("QUEUED"));
    assert_eq!(err.error_category(), "protocol");
}
