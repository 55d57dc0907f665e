use crate::helpers::{fast_config, in_progress, licensing_path, succeeded};

use chassis_core::{ActivationCodeQuantity, Licensing, Session, SessionError};

use serde_json::json;
use wiremock::matchers::{body_json, body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Public API tests for the licensing endpoints
// ============================================================================

#[tokio::test]
async fn given_license_servers_when_listed_then_body_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(licensing_path("servers")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1, "host": "localhost", "isActive": true}])),
        )
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let servers = Licensing::new(&session).servers().await.unwrap();

    assert_eq!(servers[0]["host"], "localhost");
}

/// **VALUE**: Verifies the add-server payload, including key order.
///
/// **BUG THIS CATCHES**: Would catch the server being added inactive, or a field being
/// renamed from `isActive`.
#[tokio::test]
async fn given_host_when_adding_server_then_active_server_posted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(licensing_path("servers")))
        .and(body_string("{\n  \"host\": \"192.168.10.1\",\n  \"isActive\": true\n}"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2})))
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let created = Licensing::new(&session).add_server("192.168.10.1").await.unwrap();

    assert_eq!(created, json!({"id": 2}));
}

#[tokio::test]
async fn given_server_id_when_removing_then_delete_sent() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(licensing_path("servers/2")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let removed = Licensing::new(&session).remove_server(2).await.unwrap();

    assert!(removed.is_null());
}

/// **VALUE**: Verifies that activation is followed through polling to its result document.
///
/// **WHY THIS MATTERS**: The caller wants the activation result, not an operation handle.
///
/// **BUG THIS CATCHES**: Would catch the result URL being returned instead of fetched, or
/// the activation list being sent with snake_case keys.
#[tokio::test]
async fn given_activation_codes_when_activating_then_result_document_returned() {
    // GIVEN: 202 → SUCCESS → result document
    let server = MockServer::start().await;
    let status = licensing_path("servers/1/operations/activate/5");
    let result = licensing_path("servers/1/operations/activate/5/result");
    Mock::given(method("POST"))
        .and(path(licensing_path("servers/1/operations/activate")))
        .and(body_json(json!([{"activationCode": "D3AA-E129-CBB2-34BB", "quantity": 1}])))
        .respond_with(ResponseTemplate::new(202).set_body_json(in_progress(&server, &status)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(status.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded(&server, &status, &result)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(result))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"href": "https://portal/a/1"})))
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    // WHEN: Activating one seat
    let codes = [ActivationCodeQuantity::new("D3AA-E129-CBB2-34BB", 1)];
    let document = Licensing::new(&session).activate(1, &codes).await.unwrap();

    // THEN: The result document comes back
    assert_eq!(document["href"], "https://portal/a/1");
}

/// **VALUE**: Verifies that a failed licensing operation becomes `OperationFailed`.
///
/// **BUG THIS CATCHES**: Would catch a failed activation being reported as success with an
/// empty document.
#[tokio::test]
async fn given_failing_operation_when_deactivating_then_operation_failed() {
    let server = MockServer::start().await;
    let status = licensing_path("servers/1/operations/deactivate/9");
    Mock::given(method("POST"))
        .and(path(licensing_path("servers/1/operations/deactivate")))
        .respond_with(ResponseTemplate::new(202).set_body_json(in_progress(&server, &status)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(status))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "ERROR",
            "message": "Activation code not found",
        })))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let codes = [ActivationCodeQuantity::new("XXXX", 1)];
    let err = Licensing::new(&session).deactivate(1, &codes).await.unwrap_err();

    assert!(matches!(err, SessionError::OperationFailed { .. }));
    assert!(err.to_string().contains("Activation code not found"));
}

#[tokio::test]
async fn given_activation_code_when_querying_info_then_code_posted_and_result_followed() {
    let server = MockServer::start().await;
    let status = licensing_path("servers/1/operations/retrieveactivationcodeinfo/1");
    let result = licensing_path("servers/1/operations/retrieveactivationcodeinfo/1/result");
    Mock::given(method("POST"))
        .and(path(licensing_path("servers/1/operations/retrieveactivationcodeinfo")))
        .and(body_json(json!({"activationCode": "D3AA"})))
        .respond_with(ResponseTemplate::new(202).set_body_json(succeeded(&server, &status, &result)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(result))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalQuantity": 4})))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let info = Licensing::new(&session)
        .activation_code_info(1, "D3AA")
        .await
        .unwrap();

    assert_eq!(info["totalQuantity"], 4);
}

#[tokio::test]
async fn given_connectivity_test_when_run_then_result_followed() {
    let server = MockServer::start().await;
    let status = licensing_path("servers/1/operations/testbackendconnectivity/1");
    let result = licensing_path("servers/1/operations/testbackendconnectivity/1/result");
    Mock::given(method("POST"))
        .and(path(licensing_path("servers/1/operations/testbackendconnectivity")))
        .respond_with(ResponseTemplate::new(202).set_body_json(succeeded(&server, &status, &result)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(result))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"isReachable": true})))
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let report = Licensing::new(&session).test_connectivity(1).await.unwrap();

    assert_eq!(report["isReachable"], true);
}

/// **VALUE**: Verifies the fallback read when retrieve-licenses answers synchronously.
///
/// **WHY THIS MATTERS**: Some chassis models answer with a plain 200 and keep the list at
/// a fixed result location.
///
/// **BUG THIS CATCHES**: Would catch the empty 200 body being returned as "no licenses".
#[tokio::test]
async fn given_synchronous_retrieve_when_listing_licenses_then_fallback_result_read() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(licensing_path("servers/1/operations/retrievelicenses")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(licensing_path("servers/1/operations/retrievelicenses/1/result")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"partNumber": "930-2000", "quantity": 2}])),
        )
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let licenses = Licensing::new(&session).retrieve_licenses(1).await.unwrap();

    assert_eq!(licenses[0]["partNumber"], "930-2000");
}

#[tokio::test]
async fn given_async_retrieve_when_listing_licenses_then_result_url_read() {
    let server = MockServer::start().await;
    let status = licensing_path("servers/1/operations/retrievelicenses/7");
    let result = licensing_path("servers/1/operations/retrievelicenses/7/result");
    Mock::given(method("POST"))
        .and(path(licensing_path("servers/1/operations/retrievelicenses")))
        .respond_with(ResponseTemplate::new(202).set_body_json(in_progress(&server, &status)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(status.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(succeeded(&server, &status, &result)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(result))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::new(fast_config(&server)).unwrap();

    let licenses = Licensing::new(&session).retrieve_licenses(1).await.unwrap();

    assert_eq!(licenses, json!([]));
}
