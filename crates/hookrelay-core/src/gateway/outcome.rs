//! Successful results of one gateway invocation.

use serde_json::{Value, json};

use hookrelay_types::event::{ClassifiedEvent, DispatchEcho};

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome {
    /// A repository-dispatch event was accepted by the provider.
    Dispatched {
        event: ClassifiedEvent,
        dispatch: DispatchEcho,
    },
    /// A keepalive scan finished; `workflows` were re-enabled.
    Rearmed {
        event: ClassifiedEvent,
        workflows: Vec<String>,
    },
    /// The delivery was valid but nothing is done for it.
    Ignored {
        event: String,
        action: Option<String>,
        reason: String,
    },
}

impl GatewayOutcome {
    /// HTTP status reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayOutcome::Dispatched { .. } | GatewayOutcome::Rearmed { .. } => 200,
            GatewayOutcome::Ignored { .. } => 202,
        }
    }

    /// Response body echoing what was received and what was done.
    pub fn to_body(&self) -> Value {
        match self {
            GatewayOutcome::Dispatched { event, dispatch } => json!({
                "event": event.event,
                "action": event.action,
                "repo": event.repository,
                "subject": event.subject,
                "dispatch": dispatch,
            }),
            GatewayOutcome::Rearmed { event, workflows } => json!({
                "event": event.event,
                "action": event.action,
                "repo": event.repository,
                "workflows": workflows,
            }),
            GatewayOutcome::Ignored {
                event,
                action,
                reason,
            } => json!({
                "event": event,
                "action": action,
                "message": format!("ignoring request: {reason}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookrelay_types::event::{Disposition, DispatchRequest, Subject};

    fn classified() -> ClassifiedEvent {
        ClassifiedEvent {
            event: "pull_request".into(),
            action: Some("opened".into()),
            repository: "roc-streaming/roc-toolkit".into(),
            subject: Subject::PullRequest(42),
            disposition: Disposition::Dispatch {
                event_type: "pull_request_opened".into(),
            },
        }
    }

    #[test]
    fn test_dispatched_body_echoes_request_and_response() {
        let outcome = GatewayOutcome::Dispatched {
            event: classified(),
            dispatch: DispatchEcho {
                url: "https://api.github.com/repos/roc-streaming/roc-toolkit/dispatches".into(),
                request: DispatchRequest {
                    event_type: "pull_request_opened".into(),
                    client_payload: json!({"number": 42}),
                },
                response_status: 204,
                response_body: String::new(),
            },
        };
        assert_eq!(outcome.status_code(), 200);

        let body = outcome.to_body();
        assert_eq!(body["repo"], "roc-streaming/roc-toolkit");
        assert_eq!(body["subject"], json!({"pull_request": 42}));
        assert_eq!(body["dispatch"]["response_status"], 204);
        assert_eq!(body["dispatch"]["request"]["client_payload"]["number"], 42);
    }

    #[test]
    fn test_ignored_is_accepted() {
        let outcome = GatewayOutcome::Ignored {
            event: "issues".into(),
            action: Some("starred".into()),
            reason: "unsupported event issues/starred".into(),
        };
        assert_eq!(outcome.status_code(), 202);
        assert_eq!(
            outcome.to_body()["message"],
            "ignoring request: unsupported event issues/starred"
        );
    }

    #[test]
    fn test_rearmed_lists_workflows() {
        let mut event = classified();
        event.event = "workflow_run".into();
        event.disposition = Disposition::Keepalive;
        let outcome = GatewayOutcome::Rearmed {
            event,
            workflows: vec!["Nightly".into()],
        };
        assert_eq!(outcome.status_code(), 200);
        assert_eq!(outcome.to_body()["workflows"], json!(["Nightly"]));
    }
}
