// Unit tests for async operation descriptors

use crate::async_op::{AsyncOperationDescriptor, AsyncOutcome, AsyncState};
use crate::error::session::SessionError;

use serde_json::json;

/// **VALUE**: Verifies that descriptor fields are read from camelCase JSON.
///
/// **WHY THIS MATTERS**: The chassis sends `resultUrl`; a snake_case mismatch would make
/// every successful operation look like it had no result.
///
/// **BUG THIS CATCHES**: Would catch a missing `rename_all = "camelCase"`.
#[test]
fn given_chassis_descriptor_json_when_parsed_then_fields_are_populated() {
    // GIVEN: A typical terminal descriptor
    let body = json!({
        "state": "SUCCESS",
        "url": "https://chassis/op/7",
        "resultUrl": "https://chassis/op/7/result",
        "progress": 100
    });

    // WHEN: Parsing
    let descriptor = AsyncOperationDescriptor::from_body(Some(&body)).unwrap();

    // THEN: Known fields are set, unknown ones ignored
    assert_eq!(descriptor.state, AsyncState::Success);
    assert_eq!(descriptor.url.as_deref(), Some("https://chassis/op/7"));
    assert_eq!(descriptor.result_url.as_deref(), Some("https://chassis/op/7/result"));
    assert!(descriptor.message.is_none());
}

/// **VALUE**: Verifies that unknown state strings are kept rather than rejected.
///
/// **WHY THIS MATTERS**: The poller needs the original state name to report it.
///
/// **BUG THIS CATCHES**: Would catch deserialization failing outright on new states.
#[test]
fn given_unknown_state_string_when_parsed_then_other_keeps_name() {
    let body = json!({"state": "PAUSED", "url": "https://chassis/op/1"});

    let descriptor = AsyncOperationDescriptor::from_body(Some(&body)).unwrap();

    assert_eq!(descriptor.state, AsyncState::Other(String::from("PAUSED")));
    assert_eq!(descriptor.state.to_string(), "PAUSED");
    assert!(!descriptor.state.is_in_progress());
}

/// **VALUE**: Verifies that a 202 body without a status URL is rejected.
///
/// **WHY THIS MATTERS**: Without a URL there is nothing to poll; the client would spin on
/// an empty target.
///
/// **BUG THIS CATCHES**: Would catch `from_accepted()` accepting empty or missing `url`.
#[test]
fn given_accepted_body_without_url_when_parsed_then_protocol_error() {
    for body in [
        json!({"state": "IN_PROGRESS"}),
        json!({"state": "IN_PROGRESS", "url": ""}),
    ] {
        let err = AsyncOperationDescriptor::from_accepted(Some(&body)).unwrap_err();
        assert!(matches!(err, SessionError::Protocol { .. }), "body {body}");
    }
}

/// **VALUE**: Verifies that a missing body or missing `state` is a protocol error.
///
/// **BUG THIS CATCHES**: Would catch a default state being invented for malformed replies.
#[test]
fn given_missing_body_or_state_when_parsed_then_protocol_error() {
    let no_state = json!({"url": "https://chassis/op/1"});

    assert!(matches!(
        AsyncOperationDescriptor::from_body(None),
        Err(SessionError::Protocol { .. })
    ));
    assert!(matches!(
        AsyncOperationDescriptor::from_body(Some(&no_state)),
        Err(SessionError::Protocol { .. })
    ));
}

#[test]
fn given_outcomes_when_accessors_called_then_match_variant() {
    let completed = AsyncOutcome::Completed {
        result_url: String::from("https://chassis/r"),
    };
    let failed = AsyncOutcome::Failed {
        message: String::from("boom"),
    };

    assert_eq!(completed.result_url(), Some("https://chassis/r"));
    assert_eq!(completed.failure_message(), None);
    assert_eq!(failed.result_url(), None);
    assert_eq!(failed.failure_message(), Some("boom"));
}
