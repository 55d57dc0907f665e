use crate::{RedactError, RedactedSecret, SecretKind};

/// **VALUE**: Verifies a token never shows up in formatted output.
///
/// **WHY THIS MATTERS**: Sessions log requests verbosely. A token printed once
/// in a log file is a leaked chassis credential.
///
/// **BUG THIS CATCHES**: Someone swapping the manual Debug impl for `#[derive(Debug)]`.
#[test]
fn given_secret_when_formatted_then_value_is_hidden() {
    // GIVEN: A secret with a recognisable value
    let secret = RedactedSecret::api_key("super-secret-token");

    // WHEN: Formatting through Debug and Display
    let debug = format!("{secret:?}");
    let display = format!("{secret}");

    // THEN: Neither contains the value, but expose() does
    assert!(!debug.contains("super-secret-token"));
    assert!(!display.contains("super-secret-token"));
    assert_eq!(secret.expose(), "super-secret-token");
    assert_eq!(secret.len(), 18);
}

/// **VALUE**: Verifies secrets refuse serialization.
///
/// **BUG THIS CATCHES**: A secret embedded in a serializable struct being written to disk.
#[test]
fn given_secret_when_serialized_then_fails() {
    let secret = RedactedSecret::api_key("token");

    let result = serde_json::to_string(&secret);

    let err = result.expect_err("Secrets must not serialize");
    assert!(err.to_string().contains("API key"), "Error should name the kind: {err}");
    assert!(!err.to_string().contains("token\""));
}

/// **VALUE**: Verifies the refusal names which credential was involved.
///
/// **WHY THIS MATTERS**: A password sneaking into a profile dump and an API key
/// sneaking into a request body are different bugs; the message should say which.
#[test]
fn given_password_when_serialization_refused_then_error_names_password() {
    // GIVEN: A password secret
    let secret = RedactedSecret::password("hunter2");

    // WHEN: Building the refusal for it
    let err = RedactError::refused(secret.kind());

    // THEN: Kind and location are reported, the value is not
    assert_eq!(err.kind(), SecretKind::Password);
    let text = err.to_string();
    assert!(text.contains("password"));
    assert!(text.contains("redacted_secret.rs"), "Location should point here: {text}");
    assert!(!text.contains("hunter2"));
    assert!(format!("{secret:?}").contains("password"));
}
