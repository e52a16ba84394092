//! Event sink boundary.
//!
//! Model, synthesis and decode logic never touch `obs::metrics` directly.
//! All instrumentation flows through `ModelEvent` and `EventSink`.
use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn EventSink>>> = const { RefCell::new(None) };
}

///
/// ModelEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModelEvent<'a> {
    ShapeSynthesized {
        view: &'a str,
        fields: usize,
    },
    ShapeCacheHit {
        view: &'a str,
    },
    ProjectionRegistered {
        view: &'a str,
        base: &'a str,
        fields: usize,
    },
    AliasBound {
        alias: &'a str,
        target: &'a str,
    },
    AliasUnchanged {
        alias: &'a str,
    },
    AliasConflict {
        alias: &'a str,
    },
    InstanceBuilt {
        view: &'a str,
    },
    InstanceDecoded {
        view: &'a str,
    },
    InstancesLoaded {
        view: &'a str,
        rows: u64,
    },
}

///
/// EventSink
///

pub trait EventSink {
    fn record(&self, event: ModelEvent<'_>);
}

///
/// GlobalEventSink
/// Default sink: bumps the thread's counters and forwards to `tracing`.
/// Acts as the concrete sink when no scoped override is installed.
///

pub(crate) struct GlobalEventSink;

impl EventSink for GlobalEventSink {
    fn record(&self, event: ModelEvent<'_>) {
        match event {
            ModelEvent::ShapeSynthesized { view, fields } => {
                tracing::debug!(view, fields, "synthesized projection shape");
                metrics::with_state_mut(|m| {
                    m.ops.shapes_synthesized = m.ops.shapes_synthesized.saturating_add(1);
                    metrics::view_mut(m, view).shape_fields = u64::try_from(fields).unwrap_or(u64::MAX);
                });
            }

            ModelEvent::ShapeCacheHit { view } => {
                tracing::trace!(view, "projection shape cache hit");
                metrics::with_state_mut(|m| {
                    m.ops.shape_cache_hits = m.ops.shape_cache_hits.saturating_add(1);
                    let entry = metrics::view_mut(m, view);
                    entry.cache_hits = entry.cache_hits.saturating_add(1);
                });
            }

            ModelEvent::ProjectionRegistered { view, base, fields } => {
                tracing::info!(view, base, fields, "registered projection");
                metrics::with_state_mut(|m| {
                    m.ops.projections_registered = m.ops.projections_registered.saturating_add(1);
                    let entry = metrics::view_mut(m, view);
                    entry.registrations = entry.registrations.saturating_add(1);
                });
            }

            ModelEvent::AliasBound { alias, target } => {
                tracing::debug!(alias, target, "bound alias");
                metrics::with_state_mut(|m| {
                    m.ops.aliases_bound = m.ops.aliases_bound.saturating_add(1);
                });
            }

            ModelEvent::AliasUnchanged { alias } => {
                tracing::trace!(alias, "alias already bound to target");
                metrics::with_state_mut(|m| {
                    m.ops.aliases_unchanged = m.ops.aliases_unchanged.saturating_add(1);
                });
            }

            ModelEvent::AliasConflict { alias } => {
                tracing::warn!(alias, "alias already bound elsewhere");
                metrics::with_state_mut(|m| {
                    m.ops.alias_conflicts = m.ops.alias_conflicts.saturating_add(1);
                });
            }

            ModelEvent::InstanceBuilt { view } => {
                metrics::with_state_mut(|m| {
                    m.ops.instances_built = m.ops.instances_built.saturating_add(1);
                    let entry = metrics::view_mut(m, view);
                    entry.instances_built = entry.instances_built.saturating_add(1);
                });
            }

            ModelEvent::InstanceDecoded { view } => {
                metrics::with_state_mut(|m| {
                    m.ops.instances_decoded = m.ops.instances_decoded.saturating_add(1);
                    let entry = metrics::view_mut(m, view);
                    entry.instances_decoded = entry.instances_decoded.saturating_add(1);
                });
            }

            ModelEvent::InstancesLoaded { view, rows } => {
                tracing::debug!(view, rows, "loaded projections");
                metrics::with_state_mut(|m| {
                    m.ops.instances_loaded = m.ops.instances_loaded.saturating_add(rows);
                    let entry = metrics::view_mut(m, view);
                    entry.instances_loaded = entry.instances_loaded.saturating_add(rows);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_EVENT_SINK: GlobalEventSink = GlobalEventSink;

pub(crate) fn record(event: ModelEvent<'_>) {
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match override_sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_EVENT_SINK.record(event),
    }
}

/// Snapshot the current thread's event counters.
#[must_use]
pub fn event_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset the current thread's event counters.
pub fn event_reset_all() {
    metrics::reset();
}

/// Run a closure with a temporary event sink override on this thread.
pub fn with_event_sink<T>(sink: Rc<dyn EventSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn EventSink>>);

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
    use std::cell::RefCell;

    #[derive(Default)]
    struct Capture(RefCell<Vec<String>>);

    impl EventSink for Capture {
        fn record(&self, event: ModelEvent<'_>) {
            self.0.borrow_mut().push(format!("{event:?}"));
        }
    }

    #[test]
    fn override_captures_and_restores() {
        event_reset_all();
        let capture = Rc::new(Capture::default());

        with_event_sink(capture.clone(), || {
            record(ModelEvent::InstanceBuilt { view: "app::IView" });
        });
        record(ModelEvent::InstanceBuilt { view: "app::IView" });

        assert_eq!(capture.0.borrow().len(), 1);
        assert_eq!(event_report().ops.instances_built, 1);
    }

    #[test]
    fn global_sink_counts_per_view() {
        event_reset_all();

        record(ModelEvent::ShapeSynthesized {
            view: "app::IView",
            fields: 3,
        });
        record(ModelEvent::ShapeCacheHit { view: "app::IView" });
        record(ModelEvent::ShapeCacheHit { view: "app::IView" });

        let report = event_report();
        let view = report.view("app::IView").unwrap();

        assert_eq!(report.ops.shapes_synthesized, 1);
        assert_eq!(view.shape_fields, 3);
        assert_eq!(view.cache_hits, 2);
    }
}
