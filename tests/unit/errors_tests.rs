/*!
 * Tests for error types and classification
 */

use ppt_translator::errors::{ErrorClass, ProviderError, TranslationError};

#[test]
fn test_providerError_fromStatus_shouldMapToClasses() {
    assert_eq!(ProviderError::from_status(401, "bad key").class(), ErrorClass::Auth);
    assert_eq!(ProviderError::from_status(403, "forbidden").class(), ErrorClass::Auth);
    assert_eq!(ProviderError::from_status(429, "slow down").class(), ErrorClass::Transient);
    assert_eq!(ProviderError::from_status(408, "timeout").class(), ErrorClass::Transient);
    assert_eq!(ProviderError::from_status(503, "unavailable").class(), ErrorClass::Transient);
    assert_eq!(ProviderError::from_status(400, "policy").class(), ErrorClass::Content);
    assert_eq!(ProviderError::from_status(413, "too large").class(), ErrorClass::Content);
    assert_eq!(ProviderError::from_status(422, "unprocessable").class(), ErrorClass::Content);
}

#[test]
fn test_providerError_fromStatus_withAccountOrModelProblem_shouldBeFatal() {
    let balance = ProviderError::from_status(402, "Insufficient Balance");
    assert!(matches!(balance, ProviderError::AuthenticationError(_)));
    assert!(balance.to_string().contains("Insufficient Balance"));

    for status in [402, 404, 405, 409] {
        let error = ProviderError::from_status(status, "model_not_found");
        assert_eq!(error.class(), ErrorClass::Auth, "status {}", status);
        assert!(!error.is_retryable());
    }
}

#[test]
fn test_providerError_isRetryable_shouldOnlyAcceptTransient() {
    assert!(ProviderError::ConnectionError("reset".to_string()).is_retryable());
    assert!(ProviderError::Timeout("slow".to_string()).is_retryable());
    assert!(!ProviderError::ParseError("garbage".to_string()).is_retryable());
    assert!(!ProviderError::CardinalityMismatch { expected: 3, actual: 2 }.is_retryable());
    assert!(!ProviderError::AuthenticationError("no key".to_string()).is_retryable());
    assert!(!ProviderError::ContentRejected("policy".to_string()).is_retryable());
}

#[test]
fn test_providerError_cardinalityMismatch_shouldDisplayCounts() {
    let error = ProviderError::CardinalityMismatch { expected: 3, actual: 2 };
    let display = error.to_string();
    assert!(display.contains("expected 3"));
    assert!(display.contains("got 2"));
    assert_eq!(error.class(), ErrorClass::Protocol);
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 500,
        message: "Internal error".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("Internal error"));
}

#[test]
fn test_translationError_fromProviderError_shouldWrap() {
    let error: TranslationError = ProviderError::AuthenticationError("rejected".to_string()).into();
    assert!(matches!(error, TranslationError::Provider(ref e) if e.class() == ErrorClass::Auth));
    assert!(error.to_string().contains("rejected"));
}

#[test]
fn test_errorClass_shouldSerializeLowercase() {
    assert_eq!(serde_json::to_string(&ErrorClass::Transient).unwrap(), "\"transient\"");
    assert_eq!(ErrorClass::Protocol.to_string(), "protocol");
}
