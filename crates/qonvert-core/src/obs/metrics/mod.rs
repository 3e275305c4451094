use crate::expr::CompareOp;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// Metrics
/// Ephemeral, in-memory counters for rewrite activity on this thread.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub operators: BTreeMap<String, u64>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Pipeline entrypoints
    pub rewrites_started: u64,
    pub skipped_gate_off: u64,
    pub skipped_gate_unset: u64,
    pub skipped_no_filter: u64,

    // Leaf conversions
    pub leaves_converted: u64,

    // Membership expansion
    pub memberships_expanded: u64,
    pub memberships_unchanged: u64,
    pub membership_elements_matched: u64,
    pub membership_elements_dropped: u64,
}

///
/// EventReport
/// Point-in-time snapshot handed to callers.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub counters: EventState,
}

impl EventReport {
    /// Conversions recorded for one operator.
    #[must_use]
    pub fn operator(&self, op: CompareOp) -> u64 {
        self.counters
            .operators
            .get(op.name())
            .copied()
            .unwrap_or_default()
    }
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot the current counters.
pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        counters: m.clone(),
    })
}

/// Increment one counter, saturating at `u64::MAX`.
pub(crate) const fn bump(counter: &mut u64, by: u64) {
    *counter = counter.saturating_add(by);
}
