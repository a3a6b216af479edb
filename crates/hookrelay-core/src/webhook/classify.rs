//! Event classifier.
//!
//! Maps an (event type, payload) pair to a [`ClassifiedEvent`]. Pure: no I/O,
//! no clock, no configuration beyond what is passed in, so the same input
//! always yields an equal result.
//!
//! Preconditions are checked in a fixed order so a foreign repository is
//! rejected before anything else about the payload is looked at:
//!
//! 1. `repository.full_name` is present and carries the allowed prefix
//! 2. `action` is present (push payloads carry none)
//! 3. the subject required by the event family is present and valid

use serde_json::Value;

use hookrelay_types::config::PipelineConfig;
use hookrelay_types::error::ClassifyError;
use hookrelay_types::event::{ClassifiedEvent, Disposition, GitRef, Subject};

const PUSH: &str = "push";
const PULL_REQUEST: &str = "pull_request";
const PULL_REQUEST_REVIEW: &str = "pull_request_review";
const WORKFLOW_RUN: &str = "workflow_run";

const PULL_REQUEST_ACTIONS: &[&str] = &[
    "opened",
    "reopened",
    "closed",
    "ready_for_review",
    "converted_to_draft",
    "review_requested",
    "review_request_removed",
    "synchronize",
];

const ISSUE_ACTIONS: &[&str] = &["opened", "reopened", "closed", "labeled", "unlabeled"];

/// Classify one delivery.
pub fn classify(
    event: &str,
    payload: &Value,
    rules: &PipelineConfig,
) -> Result<ClassifiedEvent, ClassifyError> {
    let repository = repository_name(payload)?;
    if !repository.starts_with(&rules.allowed_repo_prefix) {
        return Err(ClassifyError::UnexpectedRepository(repository.to_string()));
    }

    let action = if event == PUSH {
        None
    } else {
        Some(
            payload
                .get("action")
                .and_then(Value::as_str)
                .ok_or(ClassifyError::MissingField("body.action"))?,
        )
    };

    let subject = subject(event, payload, rules)?;
    let disposition = disposition(event, action, &subject, rules);

    Ok(ClassifiedEvent {
        event: event.to_string(),
        action: action.map(str::to_string),
        repository: repository.to_string(),
        subject,
        disposition,
    })
}

fn repository_name(payload: &Value) -> Result<&str, ClassifyError> {
    let repository = payload
        .get("repository")
        .and_then(Value::as_object)
        .ok_or(ClassifyError::MissingField("body.repository"))?;
    repository
        .get("full_name")
        .and_then(Value::as_str)
        .ok_or(ClassifyError::MissingField("body.repository.full_name"))
}

fn subject(event: &str, payload: &Value, rules: &PipelineConfig) -> Result<Subject, ClassifyError> {
    if event.starts_with(PULL_REQUEST) {
        let number = number_of(
            payload,
            "pull_request",
            "body.pull_request",
            "body.pull_request.number",
        )?;
        return Ok(Subject::PullRequest(number));
    }
    if rules.is_issue_event(event) {
        let number = number_of(payload, "issue", "body.issue", "body.issue.number")?;
        return Ok(Subject::Issue(number));
    }
    if event == PUSH {
        let raw = payload
            .get("ref")
            .and_then(Value::as_str)
            .ok_or(ClassifyError::MissingField("body.ref"))?;
        return Ok(Subject::Ref(GitRef::parse(raw)));
    }
    Ok(Subject::None)
}

fn number_of(
    payload: &Value,
    key: &str,
    object_field: &'static str,
    number_field: &'static str,
) -> Result<u64, ClassifyError> {
    let object = payload
        .get(key)
        .and_then(Value::as_object)
        .ok_or(ClassifyError::MissingField(object_field))?;
    let number = object
        .get("number")
        .filter(|v| v.is_number())
        .ok_or(ClassifyError::MissingField(number_field))?;
    match number.as_u64() {
        Some(n) if n > 0 => Ok(n),
        _ => Err(ClassifyError::InvalidField(number_field)),
    }
}

fn disposition(
    event: &str,
    action: Option<&str>,
    subject: &Subject,
    rules: &PipelineConfig,
) -> Disposition {
    let dispatch = |event_type: String| Disposition::Dispatch { event_type };

    match (event, action) {
        (PULL_REQUEST, Some(action)) if PULL_REQUEST_ACTIONS.contains(&action) => {
            dispatch(format!("pull_request_{action}"))
        }
        (PULL_REQUEST_REVIEW, Some(action)) => dispatch(format!("pull_request_review_{action}")),
        (PUSH, _) => match subject {
            Subject::Ref(GitRef::Branch(_)) => dispatch("push_branch".to_string()),
            Subject::Ref(GitRef::Tag(_)) => dispatch("push_tag".to_string()),
            _ => Disposition::Ignore,
        },
        (WORKFLOW_RUN, Some("completed")) if rules.keepalive.enabled => Disposition::Keepalive,
        (event, Some(action)) if rules.is_issue_event(event) && ISSUE_ACTIONS.contains(&action) => {
            dispatch(format!("issue_{action}"))
        }
        _ => Disposition::Ignore,
    }
}
