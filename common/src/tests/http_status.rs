use crate::HttpStatusCode;

/// **VALUE**: Verifies the status classes that drive request branching.
///
/// **WHY THIS MATTERS**: The session decides between "typed error", "poll" and
/// "return response" purely from these predicates.
///
/// **BUG THIS CATCHES**: Off-by-one range bounds (e.g. 500 counted as a client error).
#[test]
fn given_boundary_codes_when_classified_then_ranges_are_exact() {
    assert!(HttpStatusCode(400).is_client_error());
    assert!(HttpStatusCode(499).is_client_error());
    assert!(!HttpStatusCode(500).is_client_error());
    assert!(!HttpStatusCode(399).is_client_error());

    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(202).is_success());
    assert!(HttpStatusCode(202).is_accepted());
    assert!(!HttpStatusCode(200).is_accepted());

    assert!(HttpStatusCode(503).is_server_error());
    assert!(HttpStatusCode(401).is_unauthorized());
}

#[test]
fn given_status_code_when_displayed_then_prints_number_only() {
    assert_eq!(HttpStatusCode::from(404).to_string(), "404");
}
