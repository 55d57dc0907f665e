//! Test helpers for chassis integration tests.
//!
//! A wiremock server stands in for the chassis; sessions built here point at
//! it over plain HTTP and poll on a millisecond scale.

use chassis_core::SessionConfig;

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key-12345";
pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "admin-password";

pub const IXOS_ROOT: &str = "/chassis/api/v2/ixos";
pub const AUTH_PATH: &str = "/platform/api/v1/auth/session";
pub const LICENSING_ROOT: &str = "/platform/api/v2/licensing";

pub const FAST_POLL: Duration = Duration::from_millis(10);

/// Session config against the mock with a pre-obtained key and fast polling.
pub fn fast_config(server: &MockServer) -> SessionConfig {
    SessionConfig::new(server.uri())
        .with_api_key(TEST_API_KEY)
        .with_poll_interval(FAST_POLL)
        .with_timeout(Duration::from_secs(5))
        .with_request_timeout(Duration::from_secs(5))
}

pub fn ixos_path(relative: &str) -> String {
    format!("{IXOS_ROOT}/{relative}")
}

pub fn licensing_path(relative: &str) -> String {
    format!("{LICENSING_ROOT}/{relative}")
}

/// Async descriptor whose status URL points back at the mock.
pub fn in_progress(server: &MockServer, status_path: &str) -> Value {
    json!({
        "state": "IN_PROGRESS",
        "url": format!("{}{status_path}", server.uri()),
        "progress": 0,
    })
}

pub fn succeeded(server: &MockServer, status_path: &str, result_path: &str) -> Value {
    json!({
        "state": "SUCCESS",
        "url": format!("{}{status_path}", server.uri()),
        "resultUrl": format!("{}{result_path}", server.uri()),
        "progress": 100,
    })
}
