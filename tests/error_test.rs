use std::time::Duration;

use mimir::{MimirError, Result};

#[test]
fn test_error_display() {
    let err = MimirError::ClassifierNotFound("fruit_a_b_c_12".to_string());
    assert!(err.to_string().contains("fruit_a_b_c_12"));
}

#[test]
fn test_io_error_names_path() {
    let err = MimirError::io(
        "/bundles/fruit/apple.zip",
        std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
    );
    let text = err.to_string();
    assert!(text.contains("/bundles/fruit/apple.zip"));
    assert!(text.contains("no such file"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_training_failed_display() {
    let err = MimirError::TrainingFailed {
        classifier_id: "c1".into(),
        name: "fruit_a_b_c".into(),
        explanation: "corrupt archive".into(),
    };
    let text = err.to_string();
    assert!(text.contains("fruit_a_b_c"));
    assert!(text.contains("corrupt archive"));
}

#[test]
fn test_json_error_converts() {
    fn parse() -> Result<serde_json::Value> {
        Ok(serde_json::from_str("{ nope")?)
    }
    assert!(matches!(parse(), Err(MimirError::Json(_))));
}

// ============================================================================
// Transient error classification
// ============================================================================

#[test]
fn transient_errors() {
    assert!(MimirError::RateLimited { retry_after: None }.is_transient());
    assert!(MimirError::Http("connection reset".into()).is_transient());
    assert!(
        MimirError::Api {
            status: 500,
            message: "internal".into()
        }
        .is_transient()
    );
    assert!(
        MimirError::Api {
            status: 599,
            message: "edge".into()
        }
        .is_transient()
    );
}

#[test]
fn permanent_errors() {
    assert!(!MimirError::AuthenticationFailed.is_transient());
    assert!(!MimirError::ClassifierNotFound("c1".into()).is_transient());
    assert!(!MimirError::InvalidInput("two negatives".into()).is_transient());
    assert!(!MimirError::Configuration("bad".into()).is_transient());
    assert!(!MimirError::EmptyResponse.is_transient());
    assert!(
        !MimirError::Api {
            status: 400,
            message: "bad request".into()
        }
        .is_transient()
    );
    assert!(
        !MimirError::TrainingFailed {
            classifier_id: "c1".into(),
            name: "n".into(),
            explanation: "e".into(),
        }
        .is_transient()
    );
}

#[test]
fn only_not_found_is_visibility_race() {
    assert!(MimirError::ClassifierNotFound("c1".into()).is_visibility_race());
    assert!(!MimirError::AuthenticationFailed.is_visibility_race());
    assert!(
        !MimirError::Api {
            status: 404,
            message: "route not found".into()
        }
        .is_visibility_race()
    );
}

#[test]
fn retry_after_only_from_rate_limit() {
    let err = MimirError::RateLimited {
        retry_after: Some(Duration::from_secs(3)),
    };
    assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
    assert_eq!(MimirError::Http("x".into()).retry_after(), None);
}
