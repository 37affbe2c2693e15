//! Exit and entry sequencing over the runtime store.

use super::chart::{Chart, CompiledTransition, ExitScope};
use super::error::MachineError;
use super::store::RuntimeStore;
use crate::core::{LocalIndex, StateId, StateTree, Status, Timestamp, DEFAULT_CHILD};
use tracing::trace;

/// Borrowed view that walks a chart's tree while mutating one store.
pub(crate) struct Sequencer<'a, E> {
    chart: &'a Chart<E>,
    store: &'a mut RuntimeStore,
}

impl<'a, E> Sequencer<'a, E> {
    pub(crate) fn new(chart: &'a Chart<E>, store: &'a mut RuntimeStore) -> Self {
        Self { chart, store }
    }

    /// Run one transition: exit its scope, run its action, pick a branch,
    /// run the branch action and enter the branch target.
    pub(crate) fn fire(
        &mut self,
        transition: &CompiledTransition<E>,
        event: &E,
        now: Timestamp,
    ) -> Result<(Status, StateId), MachineError> {
        let chart = self.chart;
        let mut status = match transition.exit {
            ExitScope::State(state) => self.exit(state, Status::OK)?,
            ExitScope::ChildOf(composite) => self.exit_child(composite, Status::OK)?,
        };

        if let Some(action) = &transition.action {
            status = action.run(event, status);
        }

        let branch = transition
            .branches
            .iter()
            .find(|branch| branch.guard.as_ref().map_or(true, |guard| guard.check(event)))
            .ok_or_else(|| MachineError::NoBranchSelected {
                state: chart.tree().name(transition.exit.state()).to_string(),
            })?;

        if let Some(action) = &branch.action {
            status = action.run(event, status);
        }

        self.enter(branch.entry.top(), branch.entry.descend(), now, status)
    }

    /// Enter `state` and descend to a basic state.
    ///
    /// `resume` picks the child slot at each composite on the way down; past
    /// its end the default child is taken. Returns the final status and the
    /// basic state reached.
    pub(crate) fn enter(
        &mut self,
        state: StateId,
        resume: &[LocalIndex],
        now: Timestamp,
        status: Status,
    ) -> Result<(Status, StateId), MachineError> {
        let chart = self.chart;
        let tree = chart.tree();

        self.store.activate(state, now);
        if let (Some(parent), Some(local)) = (tree.parent(state), tree.local_index(state)) {
            self.store.set_current_child(parent, local);
        }

        let status = match chart.entry_hook(state) {
            Some(hook) => hook.run(status),
            None => status,
        };
        trace!(state = tree.name(state), at = now, "entered");

        if !tree.is_composite(state) {
            return Ok((status, state));
        }

        let (slot, rest) = match resume.split_first() {
            Some((&slot, rest)) => (slot, rest),
            None => (DEFAULT_CHILD, &[][..]),
        };
        let child = tree
            .child_at(state, slot)
            .ok_or_else(|| undefined(tree, state, Some(slot)))?;

        self.enter(child, rest, now, status)
    }

    /// Exit `state` and every active descendant, innermost first.
    pub(crate) fn exit(&mut self, state: StateId, status: Status) -> Result<Status, MachineError> {
        let chart = self.chart;
        let tree = chart.tree();

        let mut status = status;
        if tree.is_composite(state) {
            status = self.exit_child(state, status)?;
        }

        if let Some(hook) = chart.exit_hook(state) {
            status = hook.run(status);
        }
        self.store.deactivate(state);
        trace!(state = tree.name(state), "exited");

        Ok(status)
    }

    /// Exit the active child of `composite`, leaving `composite` itself active.
    pub(crate) fn exit_child(&mut self, composite: StateId, status: Status) -> Result<Status, MachineError> {
        let chart = self.chart;
        let tree = chart.tree();
        let slot = self.store.current_child(composite);
        let child = slot
            .and_then(|slot| tree.child_at(composite, slot))
            .ok_or_else(|| undefined(tree, composite, slot))?;

        let status = self.exit(child, status)?;
        self.store.clear_current_child(composite);
        Ok(status)
    }
}

/// Follow `current_child` links from the root down to a basic state.
pub(crate) fn active_path(tree: &StateTree, store: &RuntimeStore) -> Result<Vec<StateId>, MachineError> {
    let mut path = vec![StateTree::ROOT];
    let mut state = StateTree::ROOT;

    while tree.is_composite(state) {
        let slot = store.current_child(state);
        state = slot
            .and_then(|slot| tree.child_at(state, slot))
            .ok_or_else(|| undefined(tree, state, slot))?;
        path.push(state);
    }

    Ok(path)
}

fn undefined(tree: &StateTree, state: StateId, slot: Option<LocalIndex>) -> MachineError {
    MachineError::UndefinedActivePath {
        state: tree.name(state).to_string(),
        slot,
    }
}
