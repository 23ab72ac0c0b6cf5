//! Tests for merged-argument validation

use crate::app::cli::args::Args;
use crate::app::cli::validation::validate_concurrency_value;
use crate::core::error_handling::ContextualError;

fn with_location(location: &str) -> Args {
    Args {
        location: Some(location.to_string()),
        ..Args::new()
    }
}

#[test]
fn test_valid_args_pass() {
    assert!(with_location("us-central1").validate().is_ok());
}

#[test]
fn test_missing_location_fails() {
    let err = Args::new().validate().unwrap_err();
    assert!(err.message().contains("Location is required"));
    assert!(err.is_user_actionable());
    assert!(err.user_message().is_some());
}

#[test]
fn test_blank_location_fails() {
    assert!(with_location("   ").validate().is_err());
}

#[test]
fn test_blank_project_fails() {
    let args = Args {
        project: Some(" ".to_string()),
        ..with_location("us")
    };
    assert!(args.validate().is_err());
}

#[test]
fn test_unknown_names_fail() {
    let args = Args {
        min_severity: Some("SEVERE".to_string()),
        ..with_location("us")
    };
    assert!(args.validate().unwrap_err().message().contains("SEVERE"));

    let args = Args {
        output_format: Some("yaml".to_string()),
        ..with_location("us")
    };
    assert!(args.validate().unwrap_err().message().contains("yaml"));
}

#[test]
fn test_zero_concurrency_fails() {
    let args = Args {
        concurrency: Some(0),
        ..with_location("us")
    };
    assert!(args.validate().is_err());
}

#[test]
fn test_concurrency_value_bounds() {
    assert_eq!(validate_concurrency_value(1).unwrap(), 1);
    assert_eq!(validate_concurrency_value(255).unwrap(), 255);
    assert!(validate_concurrency_value(0).is_err());
    assert!(validate_concurrency_value(256).is_err());
    assert!(validate_concurrency_value(-3).is_err());
}
