use crate::ErrorLocation;

#[track_caller]
fn tracked() -> ErrorLocation {
    ErrorLocation::here()
}

/// **VALUE**: Verifies `here()` reports the caller of a tracked constructor.
///
/// **BUG THIS CATCHES**: Would catch `#[track_caller]` being dropped from `here()`,
/// which would make every error point into `error_location.rs`.
#[test]
fn given_tracked_constructor_when_called_then_location_is_call_site() {
    // GIVEN/WHEN: Calling through a tracked helper
    let expected_line = line!() + 1;
    let location = tracked();

    // THEN: The location is this line in this file
    assert_eq!(location.line, expected_line);
    assert_eq!(location.file_name(), "error_location.rs");
    assert!(location.file.contains("tests"));
    assert!(location.to_string().starts_with('['));
}
