//! Label-matching notification policy.
//!
//! A `pull_request` event qualifies for an alert when all of the following
//! hold:
//!
//! - the action is `labeled`
//! - the pull request is `open`
//! - the attached label name **contains** the watched label
//!
//! The label test is a substring match, not equality. With a watched label of
//! `review`, labels such as `awaiting review` and `no review needed` both
//! qualify. Pick a watched label that is specific enough for your labelling
//! scheme.

use crate::events::{PullRequestAction, PullRequestEvent, PullRequestState};
use std::fmt;

/// Why an event did not qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The action was something other than `labeled`.
    NotLabeled,
    /// The pull request is not open.
    NotOpen,
    /// The attached label does not contain the watched label.
    LabelMismatch,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotLabeled => "not_labeled",
            Self::NotOpen => "not_open",
            Self::LabelMismatch => "label_mismatch",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating an event against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Notify,
    Skip(SkipReason),
}

impl FilterDecision {
    pub fn should_notify(&self) -> bool {
        matches!(self, Self::Notify)
    }
}

/// Returns `true` when `event` should trigger a notification for
/// `watched_label`.
pub fn should_notify(event: &PullRequestEvent, watched_label: &str) -> bool {
    evaluate(event, watched_label).should_notify()
}

/// Evaluate `event`, reporting the first failed condition.
pub fn evaluate(event: &PullRequestEvent, watched_label: &str) -> FilterDecision {
    if event.action != PullRequestAction::Labeled {
        return FilterDecision::Skip(SkipReason::NotLabeled);
    }

    if event.pull_request.state != PullRequestState::Open {
        return FilterDecision::Skip(SkipReason::NotOpen);
    }

    if !event.label_name().contains(watched_label) {
        return FilterDecision::Skip(SkipReason::LabelMismatch);
    }

    FilterDecision::Notify
}

/// Policy bound to the configured watched label.
#[derive(Debug, Clone)]
pub struct FilterPolicy {
    watched_label: String,
}

impl FilterPolicy {
    pub fn new(watched_label: impl Into<String>) -> Self {
        Self {
            watched_label: watched_label.into(),
        }
    }

    pub fn watched_label(&self) -> &str {
        &self.watched_label
    }

    pub fn evaluate(&self, event: &PullRequestEvent) -> FilterDecision {
        evaluate(event, &self.watched_label)
    }

    pub fn should_notify(&self, event: &PullRequestEvent) -> bool {
        self.evaluate(event).should_notify()
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
