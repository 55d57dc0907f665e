// Unit tests for body parsing and payload serialization

use crate::transport::{canonical_json, parse_body};

use serde_json::json;

/// **VALUE**: Verifies that empty and non-JSON bodies parse to `None` instead of failing.
///
/// **WHY THIS MATTERS**: DELETE and some POST endpoints answer with an empty body or plain
/// text. Treating that as an error would fail operations that actually succeeded.
///
/// **BUG THIS CATCHES**: Would catch `serde_json::from_str(...)?` being used directly.
#[test]
fn given_empty_or_text_body_when_parsed_then_none() {
    assert_eq!(parse_body(""), None);
    assert_eq!(parse_body("   \n"), None);
    assert_eq!(parse_body("<html>Service Unavailable</html>"), None);
}

#[test]
fn given_json_body_when_parsed_then_value() {
    assert_eq!(parse_body(r#"{"apiKey":"abc"}"#), Some(json!({"apiKey": "abc"})));
    assert_eq!(parse_body("[1,2]"), Some(json!([1, 2])));
}

/// **VALUE**: Verifies that payload keys are sorted at every depth and indented.
///
/// **WHY THIS MATTERS**: Request bodies are logged and compared in captures; a stable
/// layout makes them diffable across runs.
///
/// **BUG THIS CATCHES**: Would catch nested objects (inside arrays) being left unsorted.
#[test]
fn given_nested_payload_when_serialized_then_keys_sorted_and_indented() {
    // GIVEN: A payload with unsorted keys, including inside an array
    let payload = json!({
        "quantity": 1,
        "activationCode": "AAAA",
        "nested": [{"z": 1, "a": 2}]
    });

    // WHEN: Serializing
    let text = canonical_json(&payload).unwrap();

    // THEN: Keys are ordered and the output round-trips
    let expected = "{\n  \"activationCode\": \"AAAA\",\n  \"nested\": [\n    {\n      \"a\": 2,\n      \"z\": 1\n    }\n  ],\n  \"quantity\": 1\n}";
    assert_eq!(text, expected);
    assert_eq!(serde_json::from_str::<serde_json::Value>(&text).unwrap(), payload);
}
