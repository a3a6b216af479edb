//! Outbound strategy selection and repository-dispatch request construction.

use serde_json::{Map, Value, json};

use hookrelay_types::config::DispatchTarget;
use hookrelay_types::event::{ClassifiedEvent, Disposition, DispatchRequest, GitRef, Subject};

/// What the pipeline does after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundAction {
    /// Dispatch back into the source repository.
    DirectDispatch,
    /// Dispatch into a fixed hub repository, naming the source in the payload.
    HubRedispatch { repository: String },
    /// Re-arm scheduled workflows of the source repository.
    KeepaliveScan,
}

/// A dispatch request and the repository it goes to.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    pub repository: String,
    pub request: DispatchRequest,
}

/// Picks the outbound action for a classified event. `None` means ignore.
pub fn select_action(event: &ClassifiedEvent, target: &DispatchTarget) -> Option<OutboundAction> {
    match &event.disposition {
        Disposition::Ignore => None,
        Disposition::Keepalive => Some(OutboundAction::KeepaliveScan),
        Disposition::Dispatch { .. } => Some(match target {
            DispatchTarget::Direct => OutboundAction::DirectDispatch,
            DispatchTarget::Hub { repository } => OutboundAction::HubRedispatch {
                repository: repository.clone(),
            },
        }),
    }
}

/// Builds the dispatch call for `event`. `None` unless the event is dispatched
/// and `action` is one of the dispatch strategies.
pub fn plan_dispatch(event: &ClassifiedEvent, action: &OutboundAction) -> Option<DispatchPlan> {
    let event_type = event.outbound_event_type()?.to_string();
    let mut payload = client_payload(&event.subject);

    let repository = match action {
        OutboundAction::DirectDispatch => event.repository.clone(),
        OutboundAction::HubRedispatch { repository } => {
            payload.insert("repo".to_string(), Value::String(event.repository.clone()));
            repository.clone()
        }
        OutboundAction::KeepaliveScan => return None,
    };

    Some(DispatchPlan {
        repository,
        request: DispatchRequest {
            event_type,
            client_payload: Value::Object(payload),
        },
    })
}

fn client_payload(subject: &Subject) -> Map<String, Value> {
    let value = match subject {
        Subject::PullRequest(number) | Subject::Issue(number) => json!({ "number": number }),
        Subject::Ref(git_ref) => {
            let mut payload = json!({ "ref": git_ref.full_name() });
            match git_ref {
                GitRef::Branch(name) => payload["branch"] = json!(name),
                GitRef::Tag(name) => payload["tag"] = json!(name),
                GitRef::Other(_) => {}
            }
            payload
        }
        Subject::None => json!({}),
    };
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
