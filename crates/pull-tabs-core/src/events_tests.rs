//! Tests for event-type recognition and payload decoding.

use super::*;

/// Trimmed-down copy of a real `pull_request.labeled` delivery.
const LABELED_PAYLOAD: &str = r#"{
    "action": "labeled",
    "number": 42,
    "pull_request": {
        "url": "https://api.github.com/repos/octo/repo/pulls/42",
        "html_url": "https://github.com/octo/repo/pull/42",
        "state": "open",
        "title": "Fix flaky test",
        "user": { "login": "octocat", "id": 1 },
        "draft": false
    },
    "label": { "id": 7, "name": "awaiting review", "color": "fbca04" },
    "repository": { "full_name": "octo/repo" },
    "sender": { "login": "hubot" }
}"#;

// ============================================================================
// EventKind tests
// ============================================================================

mod event_kind_tests {
    use super::*;

    #[test]
    fn test_recognises_ping_and_pull_request() {
        assert_eq!(EventKind::from_header("ping").unwrap(), EventKind::Ping);
        assert_eq!(
            EventKind::from_header("pull_request").unwrap(),
            EventKind::PullRequest
        );
    }

    #[test]
    fn test_rejects_other_event_types() {
        for value in ["issue_comment", "push", "pull_request_review", "PING", ""] {
            let result = EventKind::from_header(value);
            assert!(
                matches!(
                    result,
                    Err(EventError::UnsupportedEventType { ref event_type }) if event_type == value
                ),
                "expected UnsupportedEventType for {:?}, got {:?}",
                value,
                result
            );
        }
    }

    #[test]
    fn test_error_message_names_event_type() {
        let err = EventKind::from_header("issue_comment").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported event type: issue_comment");
    }

    #[test]
    fn test_display_matches_header_value() {
        assert_eq!(EventKind::PullRequest.to_string(), "pull_request");
        assert_eq!("ping".parse::<EventKind>().unwrap(), EventKind::Ping);
    }
}

// ============================================================================
// parse_event tests
// ============================================================================

mod parse_event_tests {
    use super::*;

    #[test]
    fn test_decodes_labeled_payload() {
        let event = parse_pull_request(LABELED_PAYLOAD.as_bytes()).unwrap();

        assert_eq!(event.action, PullRequestAction::Labeled);
        assert_eq!(event.number, 42);
        assert_eq!(event.pull_request.state, PullRequestState::Open);
        assert_eq!(event.pull_request.title, "Fix flaky test");
        assert_eq!(
            event.pull_request.html_url,
            "https://github.com/octo/repo/pull/42"
        );
        assert_eq!(event.pull_request.user.login, "octocat");
        assert_eq!(event.label_name(), "awaiting review");
    }

    /// Ping bodies are never inspected, even when they are not JSON.
    #[test]
    fn test_ping_ignores_body() {
        let event = parse_event(EventKind::Ping, b"this is not json").unwrap();
        assert_eq!(event, WebhookEvent::Ping);
        assert_eq!(event.kind(), EventKind::Ping);
    }

    #[test]
    fn test_pull_request_kind_wraps_event() {
        let event = parse_event(EventKind::PullRequest, LABELED_PAYLOAD.as_bytes()).unwrap();

        match event {
            WebhookEvent::PullRequest(pr) => assert_eq!(pr.pull_request.title, "Fix flaky test"),
            other => panic!("expected PullRequest, got {:?}", other),
        }
    }

    /// Fields the payload omits decode to empty defaults.
    #[test]
    fn test_missing_fields_default() {
        let event = parse_pull_request(br#"{"action":"opened"}"#).unwrap();

        assert_eq!(event.action, PullRequestAction::Opened);
        assert_eq!(event.number, 0);
        assert_eq!(event.pull_request.state, PullRequestState::Missing);
        assert!(event.pull_request.title.is_empty());
        assert!(event.label_name().is_empty());
    }

    #[test]
    fn test_unknown_action_kept_verbatim() {
        let event = parse_pull_request(br#"{"action":"auto_merge_enabled"}"#).unwrap();

        assert_eq!(
            event.action,
            PullRequestAction::Other("auto_merge_enabled".to_string())
        );
        assert_eq!(event.action.to_string(), "auto_merge_enabled");
    }

    #[test]
    fn test_malformed_json_is_error() {
        let result = parse_event(EventKind::PullRequest, b"{\"action\":");
        assert!(matches!(result, Err(EventError::MalformedPayload(_))));
    }

    #[test]
    fn test_wrong_field_type_is_error() {
        let result = parse_pull_request(br#"{"action":"labeled","number":"forty-two"}"#);
        assert!(matches!(result, Err(EventError::MalformedPayload(_))));
    }

    #[test]
    fn test_non_object_body_is_error() {
        assert!(parse_pull_request(b"[1, 2, 3]").is_err());
        assert!(parse_pull_request(b"").is_err());
    }
}

// ============================================================================
// Action / state string mapping
// ============================================================================

mod string_enum_tests {
    use super::*;

    #[test]
    fn test_action_round_trips_through_string() {
        for action in [
            "assigned",
            "closed",
            "edited",
            "labeled",
            "opened",
            "ready_for_review",
            "reopened",
            "review_requested",
            "synchronize",
            "unassigned",
            "unlabeled",
        ] {
            let parsed = PullRequestAction::from(action.to_string());
            assert!(
                !matches!(parsed, PullRequestAction::Other(_)),
                "{} should be a named variant",
                action
            );
            assert_eq!(parsed.as_str(), action);
        }
    }

    #[test]
    fn test_state_serializes_as_plain_string() {
        let json = serde_json::to_string(&PullRequestState::Closed).unwrap();
        assert_eq!(json, "\"closed\"");
    }
}
