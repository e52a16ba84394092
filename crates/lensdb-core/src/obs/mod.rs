//! Observability: setup-time and decode-time counters plus the sink
//! abstraction they flow through.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, ViewCounters};
pub use sink::{EventSink, ModelEvent, event_report, event_reset_all, with_event_sink};
