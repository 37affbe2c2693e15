//! A running statechart instance.

use super::chart::{Chart, CompiledTransition};
use super::config::MachineConfig;
use super::error::MachineError;
use super::sequencer::{self, Sequencer};
use super::store::RuntimeStore;
use crate::core::{
    Event, StateId, StateTree, Status, Timestamp, TransitionHistory, TransitionRecord,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Unique identity of one machine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(Uuid);

impl MachineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MachineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase of a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing is active; `init` has not run since creation or reset.
    Created,
    /// `init` succeeded; events may be dispatched.
    Running,
    /// The active path became undefined; only `reset` is accepted.
    Faulted,
}

/// One instance of a compiled chart.
///
/// The chart is shared; each machine owns its runtime store, so any number
/// of independent machines can run the same chart.
///
/// # Example
///
/// ```rust
/// use statechart::builder::{simple_transition, Bindings, ChartDefinition, StateDef};
/// use statechart::event_enum;
/// use statechart::runtime::{Chart, Machine};
/// use std::sync::Arc;
///
/// event_enum! {
///     enum Switch { Flip }
/// }
///
/// let definition = ChartDefinition::new(
///     "switch",
///     StateDef::new("root")
///         .child(StateDef::new("Off").transition(simple_transition("Flip", "On")))
///         .child(StateDef::new("On").transition(simple_transition("Flip", "Off"))),
/// );
/// let chart = Arc::new(Chart::compile(&definition, &Bindings::new()).unwrap());
///
/// let mut machine = Machine::new(chart);
/// machine.init(0).unwrap();
/// assert!(machine.dispatch(&Switch::Flip, 1).unwrap());
/// assert_eq!(machine.active_leaf_name(), Some("On"));
/// ```
pub struct Machine<E: Event> {
    id: MachineId,
    chart: Arc<Chart<E>>,
    store: RuntimeStore,
    config: MachineConfig,
    history: TransitionHistory,
    phase: Phase,
}

impl<E: Event> Machine<E> {
    /// Create a machine with the default configuration. Nothing is active
    /// until `init` runs.
    pub fn new(chart: Arc<Chart<E>>) -> Self {
        Self::with_config(chart, MachineConfig::default())
    }

    pub fn with_config(chart: Arc<Chart<E>>, config: MachineConfig) -> Self {
        let store = RuntimeStore::new(chart.tree().len());
        Self {
            id: MachineId::new(),
            chart,
            store,
            config,
            history: TransitionHistory::with_limit(config.history_limit),
            phase: Phase::Created,
        }
    }

    /// Enter the root and descend through default children.
    pub fn init(&mut self, now: Timestamp) -> Result<(), MachineError> {
        match self.phase {
            Phase::Created => {}
            Phase::Running => return Err(MachineError::AlreadyInitialized),
            Phase::Faulted => return Err(MachineError::Faulted),
        }

        let chart = Arc::clone(&self.chart);
        let entered =
            Sequencer::new(&chart, &mut self.store).enter(StateTree::ROOT, &[], now, Status::OK);

        match entered {
            Ok((status, leaf)) => {
                self.phase = Phase::Running;
                debug!(
                    machine = %self.id,
                    chart = chart.name(),
                    leaf = chart.tree().name(leaf),
                    %status,
                    "machine initialized"
                );
                Ok(())
            }
            Err(error) => Err(self.fault(error)),
        }
    }

    /// Offer `event` to the active states, innermost first.
    ///
    /// Returns `Ok(true)` when a transition fired and `Ok(false)` when no
    /// active state had an eligible transition for the event.
    pub fn dispatch(&mut self, event: &E, now: Timestamp) -> Result<bool, MachineError> {
        match self.phase {
            Phase::Running => {}
            Phase::Created => return Err(MachineError::NotInitialized),
            Phase::Faulted => return Err(MachineError::Faulted),
        }

        let chart = Arc::clone(&self.chart);
        let path = match sequencer::active_path(chart.tree(), &self.store) {
            Ok(path) => path,
            Err(error) => return Err(self.fault(error)),
        };

        let selected = path.iter().rev().find_map(|&state| {
            self.eligible(&chart, state, event, now)
                .map(|transition| (state, transition))
        });

        let Some((source, transition)) = selected else {
            trace!(machine = %self.id, event = event.class(), at = now, "event not handled");
            return Ok(false);
        };

        match Sequencer::new(&chart, &mut self.store).fire(transition, event, now) {
            Ok((status, leaf)) => {
                let tree = chart.tree();
                debug!(
                    machine = %self.id,
                    source = tree.name(source),
                    target = tree.name(leaf),
                    event = event.class(),
                    %status,
                    "transition fired"
                );
                if self.history.is_enabled() {
                    self.history.record(TransitionRecord {
                        source: tree.name(source).to_string(),
                        target: tree.name(leaf).to_string(),
                        event: event.class().to_string(),
                        at: now,
                        status,
                        recorded_at: Utc::now(),
                    });
                }
                Ok(true)
            }
            Err(error) => Err(self.fault(error)),
        }
    }

    /// Deactivate everything and clear the history so `init` may run again.
    pub fn reset(&mut self) {
        self.store.reset();
        self.history.clear();
        self.phase = Phase::Created;
        debug!(machine = %self.id, "machine reset");
    }

    pub fn id(&self) -> MachineId {
        self.id
    }

    pub fn chart(&self) -> &Arc<Chart<E>> {
        &self.chart
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    pub fn is_active(&self, state: StateId) -> bool {
        self.store.is_active(state)
    }

    /// Whether the state called `name` is active. Unknown names are never
    /// active.
    pub fn is_in(&self, name: &str) -> bool {
        self.chart
            .state_id(name)
            .map_or(false, |state| self.is_active(state))
    }

    /// Active states from the root down to the leaf.
    ///
    /// Fails with the lifecycle error `dispatch` would report when the
    /// machine is not running, and with `UndefinedActivePath` when the store
    /// no longer describes a path. The machine only moves to the faulted
    /// phase once `dispatch` meets that path.
    pub fn active_path(&self) -> Result<Vec<StateId>, MachineError> {
        match self.phase {
            Phase::Running => sequencer::active_path(self.chart.tree(), &self.store),
            Phase::Created => Err(MachineError::NotInitialized),
            Phase::Faulted => Err(MachineError::Faulted),
        }
    }

    /// The active basic state, if the active path is defined.
    pub fn active_leaf(&self) -> Option<StateId> {
        self.active_path().ok()?.last().copied()
    }

    pub fn active_leaf_name(&self) -> Option<&str> {
        self.active_leaf().map(|leaf| self.chart.tree().name(leaf))
    }

    /// Entry timestamp of `state`, if it is active.
    pub fn time_entered(&self, state: StateId) -> Option<Timestamp> {
        self.is_active(state).then(|| self.store.time_entered(state))
    }

    fn eligible<'c>(
        &self,
        chart: &'c Chart<E>,
        state: StateId,
        event: &E,
        now: Timestamp,
    ) -> Option<&'c CompiledTransition<E>> {
        let class = event.class();
        chart.transitions(state).iter().find(|transition| {
            transition.event == class
                && transition.after.map_or(true, |duration| {
                    (self.config.is_after)(duration, self.store.time_entered(state), now)
                })
                && transition.guard.as_ref().map_or(true, |guard| guard.check(event))
        })
    }

    fn fault(&mut self, error: MachineError) -> MachineError {
        self.phase = Phase::Faulted;
        warn!(machine = %self.id, %error, "machine faulted");
        error
    }
}

impl<E: Event> fmt::Debug for Machine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("chart", &self.chart.name())
            .field("phase", &self.phase)
            .field("leaf", &self.active_leaf_name())
            .finish()
    }
}
