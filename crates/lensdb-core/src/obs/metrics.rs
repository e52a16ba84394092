use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for model setup and projection traffic.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) views: BTreeMap<String, ViewCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Synthesis
    pub shapes_synthesized: u64,
    pub shape_cache_hits: u64,

    // Model mutation
    pub projections_registered: u64,
    pub aliases_bound: u64,
    pub aliases_unchanged: u64,
    pub alias_conflicts: u64,

    // Instances
    pub instances_built: u64,
    pub instances_decoded: u64,
    pub instances_loaded: u64,
}

///
/// ViewCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ViewCounters {
    pub shape_fields: u64,
    pub cache_hits: u64,
    pub registrations: u64,
    pub instances_built: u64,
    pub instances_decoded: u64,
    pub instances_loaded: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the counters, views ordered by path.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub views: Vec<(String, ViewCounters)>,
}

impl EventReport {
    #[must_use]
    pub fn view(&self, path: &str) -> Option<&ViewCounters> {
        self.views
            .iter()
            .find(|(view, _)| view == path)
            .map(|(_, counters)| counters)
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

/// Per-view counters, created on first use.
pub(crate) fn view_mut<'a>(state: &'a mut EventState, view: &str) -> &'a mut ViewCounters {
    state.views.entry(view.to_string()).or_default()
}

/// Reset all counters (useful in tests).
pub(crate) fn reset() {
    with_state_mut(|m| *m = EventState::default());
}

#[must_use]
pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        views: m
            .views
            .iter()
            .map(|(view, counters)| (view.clone(), counters.clone()))
            .collect(),
    })
}
