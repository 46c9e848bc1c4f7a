//! Tests for the label-matching policy.

use super::*;
use crate::events::{Label, PullRequest};

fn event(action: &str, state: &str, label: &str) -> PullRequestEvent {
    PullRequestEvent {
        action: PullRequestAction::from(action.to_string()),
        pull_request: PullRequest {
            state: PullRequestState::from(state.to_string()),
            title: "Fix bug".to_string(),
            html_url: "http://x/1".to_string(),
            ..Default::default()
        },
        label: Label {
            name: label.to_string(),
        },
        ..Default::default()
    }
}

#[test]
fn test_labeled_open_matching_label_notifies() {
    let e = event("labeled", "open", "awaiting review");
    assert!(should_notify(&e, "awaiting review"));
}

#[test]
fn test_closed_pull_request_skipped() {
    let e = event("labeled", "closed", "awaiting review");

    assert!(!should_notify(&e, "awaiting review"));
    assert_eq!(
        evaluate(&e, "awaiting review"),
        FilterDecision::Skip(SkipReason::NotOpen)
    );
}

#[test]
fn test_unlabeled_action_skipped() {
    let e = event("unlabeled", "open", "awaiting review");

    assert!(!should_notify(&e, "awaiting review"));
    assert_eq!(
        evaluate(&e, "awaiting review"),
        FilterDecision::Skip(SkipReason::NotLabeled)
    );
}

#[test]
fn test_other_label_skipped() {
    let e = event("labeled", "open", "wip");

    assert!(!should_notify(&e, "awaiting review"));
    assert_eq!(
        evaluate(&e, "awaiting review"),
        FilterDecision::Skip(SkipReason::LabelMismatch)
    );
}

/// The watched label only has to appear inside the attached label.
#[test]
fn test_substring_match_is_loose() {
    assert!(should_notify(&event("labeled", "open", "awaiting review"), "review"));
    assert!(should_notify(&event("labeled", "open", "no review needed"), "review"));
}

#[test]
fn test_match_is_case_sensitive() {
    assert!(!should_notify(
        &event("labeled", "open", "Awaiting Review"),
        "awaiting review"
    ));
}

/// Actions other than `labeled` never notify, whatever the label.
#[test]
fn test_non_labeled_actions_never_notify() {
    for action in ["opened", "closed", "reopened", "synchronize", "edited", ""] {
        assert!(
            !should_notify(&event(action, "open", "awaiting review"), "awaiting review"),
            "action {:?} should not notify",
            action
        );
    }
}

#[test]
fn test_missing_state_skipped() {
    let e = event("labeled", "", "awaiting review");
    assert_eq!(
        evaluate(&e, "awaiting review"),
        FilterDecision::Skip(SkipReason::NotOpen)
    );
}

mod filter_policy_tests {
    use super::*;

    #[test]
    fn test_policy_uses_configured_label() {
        let policy = FilterPolicy::new("needs qa");

        assert_eq!(policy.watched_label(), "needs qa");
        assert!(policy.should_notify(&event("labeled", "open", "needs qa")));
        assert!(!policy.should_notify(&event("labeled", "open", "awaiting review")));
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::LabelMismatch.to_string(), "label_mismatch");
        assert_eq!(SkipReason::NotOpen.to_string(), "not_open");
        assert_eq!(SkipReason::NotLabeled.to_string(), "not_labeled");
    }
}
