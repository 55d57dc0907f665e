use chassis_cli::cli::{Cli, Commands, parse_code_quantity};

use chassis_core::{ActivationCodeQuantity, LicenseCheckOperation};

use std::time::Duration;

use clap::Parser;

// ============================================================================
// Public API tests for argument parsing
// ============================================================================

/// **VALUE**: Verifies that activation codes accept an optional quantity.
///
/// **BUG THIS CATCHES**: Would catch `CODE:2` being sent as a code literally named
/// "CODE:2", or the default quantity changing from 1.
#[test]
fn given_activate_with_codes_when_parsed_then_quantities_applied() {
    // GIVEN: Two codes, one with an explicit quantity
    let cli = Cli::try_parse_from([
        "chassis",
        "--address",
        "10.0.0.5",
        "activate",
        "D3AA-E129-CBB2-34BB",
        "AAAA-BBBB:3",
        "--id",
        "2",
    ])
    .unwrap();

    // THEN: Both codes are parsed with their quantities
    match cli.command {
        Commands::Activate { codes, id } => {
            assert_eq!(id, 2);
            assert_eq!(
                codes,
                vec![
                    ActivationCodeQuantity::new("D3AA-E129-CBB2-34BB", 1),
                    ActivationCodeQuantity::new("AAAA-BBBB", 3),
                ]
            );
        }
        other => panic!("Expected Activate, got {other:?}"),
    }
    assert_eq!(cli.connection.address.as_deref(), Some("10.0.0.5"));
}

#[test]
fn given_bad_code_quantities_when_parsed_then_rejected() {
    assert!(parse_code_quantity("CODE:zero").is_err());
    assert!(parse_code_quantity("CODE:0").is_err());
    assert!(parse_code_quantity(":2").is_err());
}

/// **VALUE**: Verifies that global connection flags work after the subcommand.
///
/// **BUG THIS CATCHES**: Would catch `global = true` being dropped from a flag, which
/// makes `chassis servers --address x` fail.
#[test]
fn given_flags_after_subcommand_when_parsed_then_accepted() {
    let cli = Cli::try_parse_from([
        "chassis",
        "servers",
        "--address",
        "chassis.lab",
        "--timeout",
        "5m",
        "--poll-interval",
        "500ms",
        "-v",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Servers));
    assert!(cli.verbose);
    assert_eq!(cli.connection.timeout, Some(Duration::from_secs(300)));
    assert_eq!(cli.connection.poll_interval, Some(Duration::from_millis(500)));
}

#[test]
fn given_license_check_operations_when_parsed_then_mapped() {
    let default = Cli::try_parse_from(["chassis", "license-check"]).unwrap();
    let enable = Cli::try_parse_from(["chassis", "license-check", "enable"]).unwrap();
    let invalid = Cli::try_parse_from(["chassis", "license-check", "toggle"]);

    assert!(matches!(
        default.command,
        Commands::LicenseCheck { operation: LicenseCheckOperation::Show }
    ));
    assert!(matches!(
        enable.command,
        Commands::LicenseCheck { operation: LicenseCheckOperation::Enable }
    ));
    assert!(invalid.is_err());
}
