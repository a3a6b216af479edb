//! Observability setup for hookrelay.
//!
//! Structured `tracing` output on stderr, with an optional OpenTelemetry
//! bridge for span export.

pub mod tracing_setup;
