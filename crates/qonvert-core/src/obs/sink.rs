//! Metrics sink boundary.
//!
//! Rewrite logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between rewrite logic
//! and the thread-local metrics state.
use crate::{expr::CompareOp, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// SkipReason
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SkipReason {
    GateOff,
    GateUnset,
    NoFilter,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    RewriteStart,
    RewriteSkipped { reason: SkipReason },
    LeafConverted { op: CompareOp },
    MembershipExpanded { matched: u64, dropped: u64 },
    MembershipUnchanged,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::RewriteStart => {
                metrics::with_state_mut(|m| metrics::bump(&mut m.ops.rewrites_started, 1));
            }

            MetricsEvent::RewriteSkipped { reason } => {
                metrics::with_state_mut(|m| match reason {
                    SkipReason::GateOff => metrics::bump(&mut m.ops.skipped_gate_off, 1),
                    SkipReason::GateUnset => metrics::bump(&mut m.ops.skipped_gate_unset, 1),
                    SkipReason::NoFilter => metrics::bump(&mut m.ops.skipped_no_filter, 1),
                });
            }

            MetricsEvent::LeafConverted { op } => {
                metrics::with_state_mut(|m| {
                    metrics::bump(&mut m.ops.leaves_converted, 1);
                    let entry = m.operators.entry(op.name().to_string()).or_default();
                    metrics::bump(entry, 1);
                });
            }

            MetricsEvent::MembershipExpanded { matched, dropped } => {
                metrics::with_state_mut(|m| {
                    metrics::bump(&mut m.ops.memberships_expanded, 1);
                    metrics::bump(&mut m.ops.membership_elements_matched, matched);
                    metrics::bump(&mut m.ops.membership_elements_dropped, dropped);
                });
            }

            MetricsEvent::MembershipUnchanged => {
                metrics::with_state_mut(|m| metrics::bump(&mut m.ops.memberships_unchanged, 1));
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Route one event to the scoped override, or the global sink.
pub fn record(event: MetricsEvent) {
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match override_sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state for this thread.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state on this thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        cell::Cell,
        panic::{AssertUnwindSafe, catch_unwind},
    };

    #[derive(Default)]
    struct CountingSink {
        calls: Cell<usize>,
    }

    impl MetricsSink for CountingSink {
        fn record(&self, _: MetricsEvent) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    #[test]
    fn with_metrics_sink_routes_and_restores_nested_overrides() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });

        let outer = Rc::new(CountingSink::default());
        let inner = Rc::new(CountingSink::default());

        // No override installed yet.
        record(MetricsEvent::RewriteStart);
        assert_eq!(outer.calls.get(), 0);
        assert_eq!(inner.calls.get(), 0);

        with_metrics_sink(outer.clone(), || {
            record(MetricsEvent::RewriteStart);
            assert_eq!(outer.calls.get(), 1);
            assert_eq!(inner.calls.get(), 0);

            with_metrics_sink(inner.clone(), || {
                record(MetricsEvent::MembershipUnchanged);
            });

            // Inner override was restored to outer override.
            record(MetricsEvent::LeafConverted { op: CompareOp::Gt });
        });

        assert_eq!(outer.calls.get(), 2);
        assert_eq!(inner.calls.get(), 1);

        // Outer override was restored to previous (none).
        SINK_OVERRIDE.with(|cell| {
            assert!(cell.borrow().is_none());
        });
    }

    #[test]
    fn with_metrics_sink_restores_override_on_panic() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });

        let sink = Rc::new(CountingSink::default());

        let panicked = catch_unwind(AssertUnwindSafe(|| {
            with_metrics_sink(sink.clone(), || {
                record(MetricsEvent::RewriteStart);
                panic!("intentional panic for guard test");
            });
        }))
        .is_err();
        assert!(panicked);
        assert_eq!(sink.calls.get(), 1);

        // Guard restored TLS slot after unwind.
        SINK_OVERRIDE.with(|cell| {
            assert!(cell.borrow().is_none());
        });

        record(MetricsEvent::RewriteStart);
        assert_eq!(sink.calls.get(), 1);
    }

    #[test]
    fn global_sink_accumulates_counters() {
        metrics_reset_all();

        record(MetricsEvent::RewriteStart);
        record(MetricsEvent::LeafConverted { op: CompareOp::Gte });
        record(MetricsEvent::LeafConverted { op: CompareOp::Gte });
        record(MetricsEvent::LeafConverted {
            op: CompareOp::Like,
        });
        record(MetricsEvent::MembershipExpanded {
            matched: 2,
            dropped: 1,
        });
        record(MetricsEvent::MembershipUnchanged);
        record(MetricsEvent::RewriteSkipped {
            reason: SkipReason::GateUnset,
        });

        let report = metrics_report();
        let ops = &report.counters.ops;
        assert_eq!(ops.rewrites_started, 1);
        assert_eq!(ops.leaves_converted, 3);
        assert_eq!(ops.memberships_expanded, 1);
        assert_eq!(ops.membership_elements_matched, 2);
        assert_eq!(ops.membership_elements_dropped, 1);
        assert_eq!(ops.memberships_unchanged, 1);
        assert_eq!(ops.skipped_gate_unset, 1);
        assert_eq!(ops.skipped_gate_off, 0);
        assert_eq!(report.operator(CompareOp::Gte), 2);
        assert_eq!(report.operator(CompareOp::Like), 1);
        assert_eq!(report.operator(CompareOp::Lt), 0);
    }

    #[test]
    fn reset_clears_counters() {
        record(MetricsEvent::RewriteStart);
        metrics_reset_all();

        assert_eq!(metrics_report(), metrics::EventReport::default());
    }
}
