//! Inbound webhook handling: envelope decoding, classification and
//! construction of the outbound dispatch request.

pub mod classify;
pub mod dispatch;
pub mod envelope;
