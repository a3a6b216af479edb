//! Workflow keepalive: schedule-trigger detection and the re-arm scan.
//!
//! - `trigger` -- decides whether a workflow definition runs on a schedule
//! - `keepalive` -- lists, filters and re-enables scheduled workflows

pub mod keepalive;
pub mod trigger;
