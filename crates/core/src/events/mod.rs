//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events after
//! sync state changes. The server implements the sink to broadcast them.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
