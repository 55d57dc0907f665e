// Unit tests for license-check commands and status extraction

use crate::shell::ShellOutput;
use crate::shell::license_check::{LicenseCheckOperation, status_line, strip_ansi};

use std::str::FromStr;

#[test]
fn given_operations_when_command_built_then_matches_chassis_cli() {
    assert_eq!(LicenseCheckOperation::Show.command(), "show license-check");
    assert_eq!(LicenseCheckOperation::Enable.command(), "set license-check enable");
    assert_eq!(LicenseCheckOperation::Disable.command(), "set license-check disable");
}

/// **VALUE**: Verifies that user input maps onto operations, including the `get` alias.
///
/// **BUG THIS CATCHES**: Would catch case sensitivity or a dropped alias breaking scripts.
#[test]
fn given_operation_names_when_parsed_then_operations() {
    assert_eq!(LicenseCheckOperation::from_str("get"), Ok(LicenseCheckOperation::Show));
    assert_eq!(LicenseCheckOperation::from_str("SHOW"), Ok(LicenseCheckOperation::Show));
    assert_eq!(LicenseCheckOperation::from_str("Enable"), Ok(LicenseCheckOperation::Enable));
    assert_eq!(LicenseCheckOperation::from_str("disable"), Ok(LicenseCheckOperation::Disable));
    assert!(LicenseCheckOperation::from_str("toggle").is_err());
}

/// **VALUE**: Verifies that the status is the line after the echoed command, uncoloured.
///
/// **WHY THIS MATTERS**: The chassis CLI colours its values; raw escape codes in the
/// returned status would break comparisons like `status == "enabled"`.
///
/// **BUG THIS CATCHES**: Would catch returning the echoed command line, or leaving
/// colour codes in place.
#[test]
fn given_coloured_output_when_status_extracted_then_clean_second_line() {
    // GIVEN: Output as the chassis prints it, over two chunks
    let output = ShellOutput {
        chunks: vec![
            String::from("show license-check\r\n\u{1b}[33mLicense check: "),
            String::from("enabled\u{1b}[39m\r\nchassis# "),
        ],
    };

    // WHEN: Extracting the status
    let status = status_line(&output).unwrap();

    // THEN: Only the status text remains
    assert_eq!(status, "License check: enabled");
}

#[test]
fn given_single_line_output_when_status_extracted_then_output_error() {
    let output = ShellOutput {
        chunks: vec![String::from("chassis# ")],
    };

    assert!(status_line(&output).is_err());
}

#[test]
fn given_text_with_escape_sequences_when_stripped_then_plain() {
    assert_eq!(strip_ansi("\u{1b}[1;32mOK\u{1b}[0m"), "OK");
    assert_eq!(strip_ansi("plain"), "plain");
}
