use crate::helpers::{fast_config, in_progress, succeeded};

use chassis_core::{
    AsyncOperationDescriptor, AsyncOperationPoller, AsyncOutcome, CancellationToken, Reply, Session,
    SessionError,
};

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const START_PATH: &str = "/chassis/api/v2/ixos/operations/collectlogs";
const STATUS_PATH: &str = "/chassis/api/v2/ixos/operations/collectlogs/1";
const RESULT_PATH: &str = "/chassis/api/v2/ixos/operations/collectlogs/1/result";

async fn mount_accepted(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(START_PATH))
        .respond_with(ResponseTemplate::new(202).set_body_json(in_progress(server, STATUS_PATH)))
        .mount(server)
        .await;
}

// ============================================================================
// Public API tests for async operation polling
// ============================================================================

/// **VALUE**: Verifies the full 202 → IN_PROGRESS → SUCCESS path.
///
/// **WHY THIS MATTERS**: Every long-running chassis operation (log collection, license
/// activation) follows this flow; the caller must receive the result URL.
///
/// **BUG THIS CATCHES**: Would catch polling stopping after the first IN_PROGRESS, or the
/// result URL being lost on the way back.
#[tokio::test]
async fn given_accepted_operation_when_status_succeeds_then_completed_with_result_url() {
    // GIVEN: A 202, two IN_PROGRESS polls, then SUCCESS
    let server = MockServer::start().await;
    mount_accepted(&server).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(in_progress(&server, STATUS_PATH)))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(succeeded(&server, STATUS_PATH, RESULT_PATH)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    // WHEN: Starting the operation
    let reply = session.post("operations/collectlogs", None).await.unwrap();

    // THEN: The outcome carries the result URL
    let outcome = reply.into_outcome().unwrap();
    assert_eq!(
        outcome,
        AsyncOutcome::Completed {
            result_url: format!("{}{RESULT_PATH}", server.uri())
        }
    );
}

/// **VALUE**: Verifies that an `ERROR` state yields `Failed` with the chassis' message.
///
/// **BUG THIS CATCHES**: Would catch ERROR being raised as a transport/protocol error, or
/// the message being replaced with a generic one.
#[tokio::test]
async fn given_accepted_operation_when_status_errors_then_failed_with_message() {
    let server = MockServer::start().await;
    mount_accepted(&server).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "ERROR",
            "message": "Disk full",
        })))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let reply = session.post("operations/collectlogs", None).await.unwrap();

    match reply {
        Reply::Async(AsyncOutcome::Failed { message }) => assert_eq!(message, "Disk full"),
        other => panic!("Expected failed outcome, got {other:?}"),
    }
}

/// **VALUE**: Verifies that a stuck operation ends with `AsyncTimeout`.
///
/// **WHY THIS MATTERS**: Without a wall-clock bound a hung operation blocks the caller
/// forever.
///
/// **BUG THIS CATCHES**: Would catch the timeout being counted in attempts instead of
/// elapsed time, or not being checked at all.
#[tokio::test]
async fn given_operation_stuck_in_progress_when_polling_then_async_timeout() {
    // GIVEN: A status URL that never leaves IN_PROGRESS and a 100ms limit
    let server = MockServer::start().await;
    mount_accepted(&server).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(in_progress(&server, STATUS_PATH)))
        .mount(&server)
        .await;
    let config = fast_config(&server).with_timeout(Duration::from_millis(100));
    let session = Session::new(config).unwrap();

    // WHEN: Starting the operation
    let started = Instant::now();
    let err = session.post("operations/collectlogs", None).await.unwrap_err();

    // THEN: Timeout, reasonably soon after the limit
    assert!(started.elapsed() < Duration::from_secs(3));
    match err {
        SessionError::AsyncTimeout { status_url, timeout, .. } => {
            assert!(status_url.ends_with(STATUS_PATH));
            assert_eq!(timeout, Duration::from_millis(100));
        }
        other => panic!("Expected AsyncTimeout, got {other:?}"),
    }
}

/// **VALUE**: Verifies that a terminal state arriving after the deadline still wins.
///
/// **WHY THIS MATTERS**: A slow final poll that reports SUCCESS means the work is done;
/// reporting a timeout would make the caller retry a completed operation.
///
/// **BUG THIS CATCHES**: Would catch the deadline being checked before the fresh state.
#[tokio::test]
async fn given_slow_final_poll_past_deadline_when_terminal_then_outcome_returned() {
    let server = MockServer::start().await;
    mount_accepted(&server).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(succeeded(&server, STATUS_PATH, RESULT_PATH))
                .set_delay(Duration::from_millis(150)),
        )
        .mount(&server)
        .await;
    let config = fast_config(&server)
        .with_timeout(Duration::from_millis(20))
        .with_poll_interval(Duration::from_millis(10));
    let session = Session::new(config).unwrap();

    let outcome = session
        .post("operations/collectlogs", None)
        .await
        .unwrap()
        .into_outcome()
        .unwrap();

    assert!(outcome.is_completed());
}

/// **VALUE**: Verifies that cancelling stops polling promptly.
///
/// **WHY THIS MATTERS**: A user aborting a CLI command should not wait out a ten-minute
/// async timeout.
///
/// **BUG THIS CATCHES**: Would catch the token only being checked between polls (or not
/// at all) while the poller sleeps.
#[tokio::test]
async fn given_cancellation_when_polling_then_cancelled_error() {
    // GIVEN: A never-ending operation, a long timeout and a slow poll interval
    let server = MockServer::start().await;
    mount_accepted(&server).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(in_progress(&server, STATUS_PATH)))
        .mount(&server)
        .await;
    let config = fast_config(&server)
        .with_timeout(Duration::from_secs(60))
        .with_poll_interval(Duration::from_secs(30));
    let session = Session::new(config).unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    // WHEN: Starting the operation
    let started = Instant::now();
    let err = session
        .request_with_cancellation(
            chassis_core::ChassisRequest::post("operations/collectlogs"),
            &cancel,
        )
        .await
        .unwrap_err();

    // THEN: Cancelled long before the poll interval elapsed
    assert!(matches!(err, SessionError::Cancelled { .. }), "{err:?}");
    assert!(started.elapsed() < Duration::from_secs(10));
}

/// **VALUE**: Verifies that the poller follows a status URL that moves.
///
/// **BUG THIS CATCHES**: Would catch the poller sticking to the first URL forever.
#[tokio::test]
async fn given_status_url_changes_when_polling_then_new_url_followed() {
    let server = MockServer::start().await;
    let moved = "/chassis/api/v2/ixos/operations/collectlogs/2";
    mount_accepted(&server).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(in_progress(&server, moved)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(moved))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded(&server, moved, RESULT_PATH)))
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let outcome = session
        .post("operations/collectlogs", None)
        .await
        .unwrap()
        .into_outcome()
        .unwrap();

    assert!(outcome.is_completed());
}

/// **VALUE**: Verifies that an unknown state ends polling with a protocol error.
#[tokio::test]
async fn given_unknown_state_when_polling_then_protocol_error() {
    let server = MockServer::start().await;
    mount_accepted(&server).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"state": "SUSPENDED"})))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let err = session.post("operations/collectlogs", None).await.unwrap_err();

    assert!(matches!(err, SessionError::Protocol { .. }));
    assert!(err.to_string().contains("SUSPENDED"));
}

/// **VALUE**: Verifies that a 4xx on a status poll aborts with a client error.
///
/// **BUG THIS CATCHES**: Would catch 4xx poll replies being parsed as descriptors.
#[tokio::test]
async fn given_status_poll_rejected_when_polling_then_client_error() {
    let server = MockServer::start().await;
    mount_accepted(&server).await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let err = session.post("operations/collectlogs", None).await.unwrap_err();

    assert_eq!(err.status_code().map(|s| s.as_u16()), Some(404));
}

/// **VALUE**: Verifies that a 202 without a status URL is a protocol error.
#[tokio::test]
async fn given_accepted_without_status_url_when_requesting_then_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(START_PATH))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"state": "IN_PROGRESS"})))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let err = session.post("operations/collectlogs", None).await.unwrap_err();

    assert!(matches!(err, SessionError::Protocol { .. }));
}

/// **VALUE**: Verifies that the poller can be driven directly with its own limits.
#[tokio::test]
async fn given_descriptor_when_poller_waits_with_overrides_then_overrides_apply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(in_progress(&server, STATUS_PATH)))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();
    let descriptor = AsyncOperationDescriptor::from_accepted(Some(&in_progress(&server, STATUS_PATH)))
        .unwrap();

    let err = AsyncOperationPoller::new(&session)
        .with_timeout(Duration::from_millis(50))
        .with_poll_interval(Duration::from_millis(5))
        .wait(descriptor, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.error_category(), "async_timeout");
}
