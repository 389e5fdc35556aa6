// engine/src/search/sink.rs
#![forbid(unsafe_code)]

use crate::engine::{Action, Cursor, Grid};
use crate::search::score::Score;

/// Observer interface for a search run (tracing/progress/reporting).
///
/// Every hook has an empty default so sinks only implement what they care about.
pub trait SearchSink {
    /// One sampled action (the iteration counter already includes it).
    fn on_iteration(&mut self, _iteration: u64) {}

    /// A state-changing action was applied to the provider. Called in application order;
    /// `grid` is the live grid right after the action.
    fn on_transition(&mut self, _action: Action, _cursor: Cursor, _grid: &Grid) {}

    /// Accept/reject decision for a committed placement.
    fn on_evaluate(&mut self, _before: Score, _after: Score, _accepted: bool) {}

    /// A rollback restart undid `undone` placements.
    fn on_restart(&mut self, _restart: u32, _undone: usize) {}
}

/// Default sink: does nothing.
#[derive(Default)]
pub struct NoopSink;

impl SearchSink for NoopSink {}

/// Fan out to two sinks, left first.
impl<A: SearchSink, B: SearchSink> SearchSink for (A, B) {
    fn on_iteration(&mut self, iteration: u64) {
        self.0.on_iteration(iteration);
        self.1.on_iteration(iteration);
    }

    fn on_transition(&mut self, action: Action, cursor: Cursor, grid: &Grid) {
        self.0.on_transition(action, cursor, grid);
        self.1.on_transition(action, cursor, grid);
    }

    fn on_evaluate(&mut self, before: Score, after: Score, accepted: bool) {
        self.0.on_evaluate(before, after, accepted);
        self.1.on_evaluate(before, after, accepted);
    }

    fn on_restart(&mut self, restart: u32, undone: usize) {
        self.0.on_restart(restart, undone);
        self.1.on_restart(restart, undone);
    }
}

impl<S: SearchSink + ?Sized> SearchSink for &mut S {
    fn on_iteration(&mut self, iteration: u64) {
        (**self).on_iteration(iteration);
    }

    fn on_transition(&mut self, action: Action, cursor: Cursor, grid: &Grid) {
        (**self).on_transition(action, cursor, grid);
    }

    fn on_evaluate(&mut self, before: Score, after: Score, accepted: bool) {
        (**self).on_evaluate(before, after, accepted);
    }

    fn on_restart(&mut self, restart: u32, undone: usize) {
        (**self).on_restart(restart, undone);
    }
}
