use crate::helpers::{
    AUTH_PATH, TEST_API_KEY, TEST_PASSWORD, TEST_USERNAME, fast_config, ixos_path,
};

use chassis_core::{ChassisRequest, Reply, Session, SessionConfig, SessionError};
use common::HttpStatusCode;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ============================================================================
// Public API tests for Session
// The mock server plays the chassis; every test owns its own server
// ============================================================================

// ----------------------------------------------------------------------------
// Status classification
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies that a 200 reply comes back as `Reply::Response` with its JSON body.
///
/// **WHY THIS MATTERS**: This is the path every read-only call takes.
///
/// **BUG THIS CATCHES**: Would catch relative targets resolving to the wrong API root, or
/// the API key header not being sent.
#[tokio::test]
async fn given_200_reply_when_request_sent_then_response_with_body() {
    // GIVEN: A chassis answering GET ports when the key is presented
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ixos_path("ports")))
        .and(header("x-api-key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    // WHEN: Requesting a relative target
    let reply = session.get("ports").await.unwrap();

    // THEN: Direct response with the parsed body
    assert!(!reply.is_async());
    assert_eq!(reply.body(), Some(&json!([{"id": 1}])));
}

/// **VALUE**: Verifies that query parameters reach the chassis.
#[tokio::test]
async fn given_request_with_params_when_sent_then_query_string_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ixos_path("chassis")))
        .and(query_param("include", "cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let reply = session
        .request(ChassisRequest::get("chassis").with_param("include", "cards"))
        .await
        .unwrap();

    assert_eq!(reply.body(), Some(&json!({"ok": true})));
}

/// **VALUE**: Verifies that a 404 becomes `SessionError::Client` with the chassis' body.
///
/// **BUG THIS CATCHES**: Would catch 4xx replies being returned as ordinary responses.
#[tokio::test]
async fn given_404_reply_when_request_sent_then_client_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ixos_path("cards/42")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "card not found"})))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let err = session.get("cards/42").await.unwrap_err();

    assert_eq!(err.status_code(), Some(HttpStatusCode(404)));
    assert!(err.to_string().contains("card not found"));
    assert!(!err.is_auth_failure());
}

/// **VALUE**: Verifies that a 401 on a data endpoint suggests re-authenticating.
///
/// **WHY THIS MATTERS**: API keys expire; the hint is the only guidance the user gets.
///
/// **BUG THIS CATCHES**: Would catch the hint missing from real 401 replies.
#[tokio::test]
async fn given_401_on_data_endpoint_when_request_sent_then_error_has_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ixos_path("ports")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let err = session.get("ports").await.unwrap_err();

    assert!(err.is_auth_failure());
    assert!(err.to_string().contains("Session::authenticate"));
}

/// **VALUE**: Verifies that a 5xx is handed back as a response, not an error.
///
/// **WHY THIS MATTERS**: Only 4xx is classified. Callers inspect server errors themselves.
///
/// **BUG THIS CATCHES**: Would catch `is_client_error()` being widened to all failures.
#[tokio::test]
async fn given_500_reply_when_request_sent_then_response_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ixos_path("ports")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "internal"})))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let response = session.get("ports").await.unwrap().into_response().unwrap();

    assert_eq!(response.status, HttpStatusCode(500));
    assert_eq!(response.str_field("message"), Some("internal"));
}

/// **VALUE**: Verifies that a non-JSON or empty body is tolerated.
///
/// **BUG THIS CATCHES**: Would catch JSON parse failures surfacing as errors on calls that
/// succeeded (DELETE answering 204, HTML error pages).
#[tokio::test]
async fn given_non_json_or_empty_body_when_request_sent_then_body_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(ixos_path("sessions/3")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ixos_path("banner")))
        .respond_with(ResponseTemplate::new(200).set_body_string("Welcome to IxOS"))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let deleted = session.delete("sessions/3").await.unwrap().into_response().unwrap();
    let banner = session.get("banner").await.unwrap().into_response().unwrap();

    assert!(deleted.body().is_none());
    assert!(banner.body().is_none());
    assert_eq!(banner.text, "Welcome to IxOS");
}

/// **VALUE**: Verifies that payloads go out with sorted keys and two-space indentation.
///
/// **BUG THIS CATCHES**: Would catch the payload being sent compact or in insertion order.
#[tokio::test]
async fn given_payload_when_posted_then_body_is_sorted_and_indented() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ixos_path("ports/operations/reboot")))
        .and(body_string("{\n  \"force\": true,\n  \"ports\": [\n    1,\n    2\n  ]\n}"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let reply = session
        .post("ports/operations/reboot", Some(json!({"ports": [1, 2], "force": true})))
        .await;

    assert!(reply.is_ok(), "{reply:?}");
}

// ----------------------------------------------------------------------------
// Authentication
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies that `connect()` logs in and later requests use the new key.
///
/// **WHY THIS MATTERS**: This is how every CLI invocation starts a session.
///
/// **BUG THIS CATCHES**: Would catch the key being read but never stored, or the login
/// payload missing the fields the chassis requires.
#[tokio::test]
async fn given_credentials_when_connecting_then_key_obtained_and_used() {
    // GIVEN: A chassis issuing a key for the test credentials
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(body_json(json!({
            "username": TEST_USERNAME,
            "password": TEST_PASSWORD,
            "rememberMe": false,
            "resetWeakPassword": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"apiKey": "key-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ixos_path("ports")))
        .and(header("x-api-key", "key-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = SessionConfig::new(server.uri()).with_credentials(TEST_USERNAME, TEST_PASSWORD);

    // WHEN: Connecting and issuing a request
    let session = Session::connect(config).await.unwrap();
    let reply = session.get("ports").await.unwrap();

    // THEN: The issued key is held and sent
    assert_eq!(session.api_key().await.unwrap().expose(), "key-1");
    assert_eq!(reply.body(), Some(&json!([])));
}

/// **VALUE**: Verifies that re-authenticating swaps the key for all later requests.
///
/// **WHY THIS MATTERS**: Long-running tools refresh an expired key without rebuilding the
/// session.
///
/// **BUG THIS CATCHES**: Would catch a key cached at construction and never replaced.
#[tokio::test]
async fn given_refresh_when_new_key_issued_then_later_requests_use_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"apiKey": "key-1"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"apiKey": "key-2"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ixos_path("ports")))
        .and(header("x-api-key", "key-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["fresh"])))
        .expect(1)
        .mount(&server)
        .await;

    let config = SessionConfig::new(server.uri()).with_credentials(TEST_USERNAME, TEST_PASSWORD);
    let session = Session::connect(config).await.unwrap();
    assert_eq!(session.api_key().await.unwrap().expose(), "key-1");

    let refreshed = session.refresh().await.unwrap();
    let reply = session.get("ports").await.unwrap();

    assert_eq!(refreshed.expose(), "key-2");
    assert_eq!(reply.body(), Some(&json!(["fresh"])));
}

const SLOW_LOGIN: Duration = Duration::from_millis(200);

/// Login endpoint that hands out `key-1`, `key-2`, ... slowly, in arrival order.
struct SlowKeyIssuer {
    issued: AtomicUsize,
}

impl Respond for SlowKeyIssuer {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let serial = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        ResponseTemplate::new(200)
            .set_body_json(json!({"apiKey": format!("key-{serial}")}))
            .set_delay(SLOW_LOGIN)
    }
}

/// **VALUE**: Verifies that concurrent refreshes run one after the other and that a
/// request issued meanwhile carries a whole key.
///
/// **WHY THIS MATTERS**: A session shared between tasks may see several of them notice
/// an expired key at once. Overlapping logins would race on which key is kept.
///
/// **BUG THIS CATCHES**: Would catch the auth lock being dropped before the login reply
/// is stored, letting two logins overlap, or a request reading a key mid-swap.
#[tokio::test]
async fn given_concurrent_refreshes_when_joined_then_logins_are_sequential() {
    // GIVEN: A session holding key-0 and a slow login endpoint
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(SlowKeyIssuer {
            issued: AtomicUsize::new(0),
        })
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ixos_path("ports")))
        .respond_with(|request: &Request| {
            let key = request
                .headers
                .get("x-api-key")
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();
            ResponseTemplate::new(200).set_body_json(json!({"seenKey": key}))
        })
        .mount(&server)
        .await;

    let config = fast_config(&server)
        .with_api_key("key-0")
        .with_credentials(TEST_USERNAME, TEST_PASSWORD);
    let session = Session::connect(config).await.unwrap();

    // WHEN: Two refreshes and a request run concurrently
    let started = Instant::now();
    let (first, second, reply) = tokio::join!(
        session.refresh(),
        session.refresh(),
        session.get("ports"),
    );
    let elapsed = started.elapsed();

    // THEN: Exactly two logins, back to back, each issuing its own key
    let mut issued = vec![
        first.unwrap().expose().to_string(),
        second.unwrap().expose().to_string(),
    ];
    issued.sort();
    assert_eq!(issued, vec!["key-1", "key-2"]);
    assert!(
        elapsed >= SLOW_LOGIN * 2,
        "Logins overlapped: both finished in {elapsed:?}"
    );

    // THEN: The last login's key is kept
    assert_eq!(session.api_key().await.unwrap().expose(), "key-2");

    // THEN: The interleaved request sent one complete key
    let seen = reply.unwrap().body().cloned().unwrap();
    let seen = seen["seenKey"].as_str().unwrap();
    assert!(
        ["key-0", "key-1", "key-2"].contains(&seen),
        "Request carried an unexpected key: {seen:?}"
    );
}

/// **VALUE**: Verifies that a rejected login is a client error without the re-auth hint.
#[tokio::test]
async fn given_wrong_password_when_authenticating_then_401_without_hint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "bad credentials"})))
        .mount(&server)
        .await;
    let session = Session::new(SessionConfig::new(server.uri())).unwrap();

    let err = session.authenticate(TEST_USERNAME, "wrong").await.unwrap_err();

    assert!(err.is_auth_failure());
    assert!(!err.to_string().contains("Session::authenticate"));
    assert!(session.api_key().await.is_none());
}

/// **VALUE**: Verifies that a login reply without `apiKey` is a protocol error.
///
/// **BUG THIS CATCHES**: Would catch an empty key being stored and sent on every request.
#[tokio::test]
async fn given_login_reply_without_key_when_authenticating_then_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "x"})))
        .mount(&server)
        .await;
    let session = Session::new(SessionConfig::new(server.uri())).unwrap();

    let err = session.authenticate(TEST_USERNAME, TEST_PASSWORD).await.unwrap_err();

    assert!(matches!(err, SessionError::Protocol { .. }));
}

#[tokio::test]
async fn given_session_without_credentials_when_refreshing_then_config_error() {
    let server = MockServer::start().await;
    let session = Session::new(fast_config(&server)).unwrap();

    let err = session.refresh().await.unwrap_err();

    assert!(matches!(err, SessionError::Config(_)));
}

// ----------------------------------------------------------------------------
// Transport failures
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies that an unreachable chassis surfaces as a transport error.
///
/// **WHY THIS MATTERS**: Connection failures are not retried; the caller must be able to
/// tell them apart from chassis-side errors.
///
/// **BUG THIS CATCHES**: Would catch connection failures being mapped to a client or
/// protocol error.
#[tokio::test]
async fn given_unreachable_chassis_when_request_sent_then_transport_error() {
    let config = SessionConfig::new("http://127.0.0.1:1").with_api_key(TEST_API_KEY);
    let session = Session::new(config).unwrap();

    let err = session.get("ports").await.unwrap_err();

    assert!(matches!(err, SessionError::Transport { .. }), "{err:?}");
}

/// **VALUE**: Verifies that a reply slower than the request timeout is a transport timeout.
#[tokio::test]
async fn given_slow_reply_when_request_sent_then_transport_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ixos_path("ports")))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)))
        .mount(&server)
        .await;
    let config = fast_config(&server).with_request_timeout(std::time::Duration::from_millis(50));
    let session = Session::new(config).unwrap();

    let err = session.get("ports").await.unwrap_err();

    assert_eq!(err.error_category(), "timeout");
}

#[tokio::test]
async fn given_direct_reply_when_into_outcome_then_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ixos_path("ports")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let reply = session.get("ports").await.unwrap();

    assert!(matches!(reply, Reply::Response(_)));
    assert!(matches!(reply.into_outcome(), Err(SessionError::Protocol { .. })));
}
