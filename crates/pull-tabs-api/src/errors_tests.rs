//! Tests for [`PayloadError`] status mapping and response bodies.

use super::*;

async fn response_json(error: PayloadError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_invalid_signature_is_401() {
    let (status, body) = response_json(PayloadError::InvalidSignature).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Signature invalid");
    assert_eq!(body["status"], 401);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_unsupported_event_type_is_400_and_names_type() {
    let (status, body) = response_json(PayloadError::UnsupportedEventType {
        event_type: "issue_comment".to_string(),
    })
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported event type: issue_comment");
}

#[tokio::test]
async fn test_malformed_payload_is_400() {
    let (status, body) = response_json(PayloadError::MalformedPayload {
        message: "EOF while parsing".to_string(),
    })
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse JSON"));
}

/// Reader failures are 500 and do not echo internal detail.
#[tokio::test]
async fn test_body_unreadable_is_500_with_generic_message() {
    let (status, body) = response_json(PayloadError::BodyUnreadable {
        message: "connection reset by peer".to_string(),
    })
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Could not read request");
}

#[test]
fn test_event_errors_convert() {
    let unsupported: PayloadError = EventError::UnsupportedEventType {
        event_type: "push".to_string(),
    }
    .into();
    assert!(matches!(
        unsupported,
        PayloadError::UnsupportedEventType { ref event_type } if event_type == "push"
    ));

    let json_error = serde_json::from_slice::<serde_json::Value>(b"{").unwrap_err();
    let malformed: PayloadError = EventError::MalformedPayload(json_error).into();
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
}
