//! Observability: rewrite telemetry (metrics) and sink abstractions.
//!
//! Counters are thread-local; a report reflects the rewrites run on the
//! calling thread only.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState};
pub use sink::{
    MetricsEvent, MetricsSink, SkipReason, metrics_report, metrics_reset_all, record,
    with_metrics_sink,
};
