//! The dispatch orchestrator: one shared pipeline, then a tagged outbound
//! strategy (direct dispatch, hub redispatch or keepalive scan).

pub mod outcome;
pub mod pipeline;

pub use outcome::GatewayOutcome;
pub use pipeline::Gateway;
