//! Classified webhook events and the outbound dispatch request built from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A git reference from a push payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GitRef {
    /// `refs/heads/<name>`
    Branch(String),
    /// `refs/tags/<name>`
    Tag(String),
    /// Anything else, kept verbatim.
    Other(String),
}

impl GitRef {
    const HEADS: &'static str = "refs/heads/";
    const TAGS: &'static str = "refs/tags/";

    pub fn parse(raw: &str) -> Self {
        if let Some(name) = raw.strip_prefix(Self::HEADS) {
            GitRef::Branch(name.to_string())
        } else if let Some(name) = raw.strip_prefix(Self::TAGS) {
            GitRef::Tag(name.to_string())
        } else {
            GitRef::Other(raw.to_string())
        }
    }

    /// The fully qualified reference as it appeared in the payload.
    pub fn full_name(&self) -> String {
        match self {
            GitRef::Branch(name) => format!("{}{name}", Self::HEADS),
            GitRef::Tag(name) => format!("{}{name}", Self::TAGS),
            GitRef::Other(raw) => raw.clone(),
        }
    }
}

/// What an event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    PullRequest(u64),
    Issue(u64),
    Ref(GitRef),
    None,
}

/// What the gateway does with a classified event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Disposition {
    /// Forward as a repository-dispatch event of the given type.
    Dispatch { event_type: String },
    /// Run the workflow keepalive scan on the repository.
    Keepalive,
    /// Nothing to do. A valid outcome, not a failure.
    Ignore,
}

/// Normalized view of one inbound delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    pub event: String,
    pub action: Option<String>,
    pub repository: String,
    pub subject: Subject,
    pub disposition: Disposition,
}

impl ClassifiedEvent {
    /// Outbound event type, present only for dispatched events.
    pub fn outbound_event_type(&self) -> Option<&str> {
        match &self.disposition {
            Disposition::Dispatch { event_type } => Some(event_type),
            _ => None,
        }
    }
}

/// Body of `POST /repos/{repo}/dispatches`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub event_type: String,
    pub client_payload: Value,
}

/// What was sent upstream and what came back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchEcho {
    pub url: String,
    pub request: DispatchRequest,
    pub response_status: u16,
    pub response_body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_ref_parse() {
        assert_eq!(GitRef::parse("refs/heads/main"), GitRef::Branch("main".into()));
        assert_eq!(
            GitRef::parse("refs/heads/feature/x"),
            GitRef::Branch("feature/x".into())
        );
        assert_eq!(GitRef::parse("refs/tags/v1.2"), GitRef::Tag("v1.2".into()));
        assert_eq!(
            GitRef::parse("refs/pull/1/merge"),
            GitRef::Other("refs/pull/1/merge".into())
        );
    }

    #[test]
    fn test_git_ref_full_name_restores_raw() {
        for raw in ["refs/heads/main", "refs/tags/v1", "refs/notes/x"] {
            assert_eq!(GitRef::parse(raw).full_name(), raw);
        }
    }

    #[test]
    fn test_outbound_event_type_only_for_dispatch() {
        let mut event = ClassifiedEvent {
            event: "pull_request".into(),
            action: Some("opened".into()),
            repository: "roc-streaming/roc-toolkit".into(),
            subject: Subject::PullRequest(42),
            disposition: Disposition::Dispatch {
                event_type: "pull_request_opened".into(),
            },
        };
        assert_eq!(event.outbound_event_type(), Some("pull_request_opened"));

        event.disposition = Disposition::Keepalive;
        assert_eq!(event.outbound_event_type(), None);

        event.disposition = Disposition::Ignore;
        assert_eq!(event.outbound_event_type(), None);
    }

    #[test]
    fn test_subject_serialization() {
        assert_eq!(
            serde_json::to_value(Subject::PullRequest(7)).unwrap(),
            serde_json::json!({"pull_request": 7})
        );
        assert_eq!(
            serde_json::to_value(Subject::Ref(GitRef::Tag("v1".into()))).unwrap(),
            serde_json::json!({"ref": {"tag": "v1"}})
        );
        assert_eq!(serde_json::to_value(Subject::None).unwrap(), serde_json::json!("none"));
    }
}
