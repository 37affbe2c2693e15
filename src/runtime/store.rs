//! Mutable per-machine runtime data.

use crate::core::{LocalIndex, StateId, Timestamp};

/// Flat per-state storage indexed by `StateId`.
///
/// `current_child` is only meaningful for composites: it names the active
/// child slot, or `None` once the composite has been exited.
/// `time_entered` keeps the last entry timestamp even after exit, so a
/// stale value is only ever read for an inactive state.
#[derive(Clone, Debug)]
pub(crate) struct RuntimeStore {
    current_child: Vec<Option<LocalIndex>>,
    active: Vec<bool>,
    time_entered: Vec<Timestamp>,
}

impl RuntimeStore {
    pub(crate) fn new(states: usize) -> Self {
        Self {
            current_child: vec![None; states],
            active: vec![false; states],
            time_entered: vec![0; states],
        }
    }

    pub(crate) fn reset(&mut self) {
        self.current_child.iter_mut().for_each(|slot| *slot = None);
        self.active.iter_mut().for_each(|flag| *flag = false);
        self.time_entered.iter_mut().for_each(|t| *t = 0);
    }

    pub(crate) fn activate(&mut self, state: StateId, now: Timestamp) {
        self.active[state.index()] = true;
        self.time_entered[state.index()] = now;
    }

    pub(crate) fn deactivate(&mut self, state: StateId) {
        self.active[state.index()] = false;
    }

    pub(crate) fn set_current_child(&mut self, composite: StateId, child: LocalIndex) {
        self.current_child[composite.index()] = Some(child);
    }

    pub(crate) fn clear_current_child(&mut self, composite: StateId) {
        self.current_child[composite.index()] = None;
    }

    pub(crate) fn current_child(&self, composite: StateId) -> Option<LocalIndex> {
        self.current_child[composite.index()]
    }

    pub(crate) fn is_active(&self, state: StateId) -> bool {
        self.active.get(state.index()).copied().unwrap_or(false)
    }

    pub(crate) fn time_entered(&self, state: StateId) -> Timestamp {
        self.time_entered[state.index()]
    }
}
