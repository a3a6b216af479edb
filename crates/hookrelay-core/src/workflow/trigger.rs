//! Schedule-trigger detection for workflow definitions.
//!
//! A definition runs on a schedule when its `on` key names `schedule` in any
//! of the three shapes the provider accepts:
//!
//! ```yaml
//! on: schedule
//! on: [push, schedule]
//! on:
//!   schedule:
//!     - cron: "0 3 * * *"
//! ```
//!
//! YAML 1.1 readers turn a bare `on` key into boolean `true`, so that key is
//! accepted as well.

use serde_yaml_ng::Value;

const SCHEDULE: &str = "schedule";

/// Parses `definition` and reports whether it has a recurring schedule trigger.
pub fn has_schedule_trigger(definition: &str) -> Result<bool, serde_yaml_ng::Error> {
    let doc: Value = serde_yaml_ng::from_str(definition)?;
    Ok(trigger_value(&doc).is_some_and(names_schedule))
}

fn trigger_value(doc: &Value) -> Option<&Value> {
    let Value::Mapping(mapping) = doc else {
        return None;
    };
    mapping.iter().find_map(|(key, value)| match key {
        Value::String(s) if s == "on" => Some(value),
        Value::Bool(true) => Some(value),
        _ => None,
    })
}

fn names_schedule(trigger: &Value) -> bool {
    match trigger {
        Value::String(s) => s == SCHEDULE,
        Value::Sequence(events) => events
            .iter()
            .any(|e| matches!(e, Value::String(s) if s == SCHEDULE)),
        Value::Mapping(events) => events
            .iter()
            .any(|(k, _)| matches!(k, Value::String(s) if s == SCHEDULE)),
        _ => false,
    }
}
