//! Domain events runtime bridge for the server.
//!
//! The sync core emits events after state changes; the server has no
//! push channel, so they are written to the tracing stream.

mod sink;

pub use sink::TracingDomainEventSink;
