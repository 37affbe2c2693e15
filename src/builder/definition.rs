//! Plain-data chart definitions.
//!
//! A definition is what a statechart compiler emits: the state tree and
//! each state's transition list, with guards, actions and hooks referred to
//! by name. It has no behavior of its own and round-trips through serde.
//!
//! ```json
//! {
//!   "name": "firstExample",
//!   "root": {
//!     "name": "root",
//!     "children": [
//!       { "name": "IDLE", "transitions": [
//!           { "event": "Go", "target": { "choice": [
//!               { "guard": "ready", "action": "start", "to": "RUNNING" },
//!               { "to": "IDLE" } ] } } ] },
//!       { "name": "RUNNING", "transitions": [
//!           { "event": "Kill", "action": "stop", "target": { "state": "IDLE" } },
//!           { "event": "Tick", "after": 60000, "action": "stop", "target": { "state": "IDLE" } } ] }
//!     ]
//!   }
//! }
//! ```

use crate::core::Ticks;
use serde::{Deserialize, Serialize};

/// Complete chart: a name and the root state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartDefinition {
    pub name: String,
    pub root: StateDef,
}

impl ChartDefinition {
    pub fn new(name: impl Into<String>, root: StateDef) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }
}

/// Kind a state author may declare explicitly.
///
/// Only used for validation; the tree derives the kind from the children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredKind {
    Basic,
    Or,
    And,
}

/// One state and, recursively, its children.
///
/// Child order is significant: the first child is the default entered when a
/// transition does not name a deeper target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateDef {
    pub name: String,
    #[serde(default)]
    pub kind: Option<DeclaredKind>,
    #[serde(default)]
    pub on_entry: Option<String>,
    #[serde(default)]
    pub on_exit: Option<String>,
    #[serde(default)]
    pub transitions: Vec<TransitionDef>,
    #[serde(default)]
    pub children: Vec<StateDef>,
}

impl StateDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            on_entry: None,
            on_exit: None,
            transitions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: DeclaredKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn on_entry(mut self, hook: impl Into<String>) -> Self {
        self.on_entry = Some(hook.into());
        self
    }

    pub fn on_exit(mut self, hook: impl Into<String>) -> Self {
        self.on_exit = Some(hook.into());
        self
    }

    /// Append a transition; declaration order is evaluation order.
    pub fn transition(mut self, transition: TransitionDef) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Append a child; the first child appended is the default child.
    pub fn child(mut self, child: StateDef) -> Self {
        self.children.push(child);
        self
    }

    /// This state and all descendants in pre-order.
    pub fn preorder(&self) -> Vec<&StateDef> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(state) = stack.pop() {
            out.push(state);
            stack.extend(state.children.iter().rev());
        }
        out
    }
}

/// One outgoing transition of a state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionDef {
    /// Event class that triggers the transition.
    pub event: String,
    #[serde(default)]
    pub guard: Option<String>,
    /// Minimum time since the source state was entered.
    #[serde(default)]
    pub after: Option<Ticks>,
    /// Runs after the exit and before the target (or choice) is entered.
    #[serde(default)]
    pub action: Option<String>,
    /// Outermost state to exit. Defaults to the source itself.
    #[serde(default)]
    pub exit: Option<String>,
    /// Exit only the source's active child; the source stays active and
    /// keeps its entry time. Always the case for transitions on the root.
    #[serde(default)]
    pub local: bool,
    pub target: TargetDef,
}

/// Where a transition goes once the exit is complete.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetDef {
    /// A single state, possibly deep inside a composite.
    State(String),
    /// A choice pseudostate: the first branch whose guard holds is taken.
    Choice(Vec<BranchDef>),
}

/// One outgoing branch of a choice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchDef {
    /// `None` marks the else branch.
    #[serde(default)]
    pub guard: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    pub to: String,
}

impl BranchDef {
    pub fn when(guard: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            guard: Some(guard.into()),
            action: None,
            to: to.into(),
        }
    }

    pub fn otherwise(to: impl Into<String>) -> Self {
        Self {
            guard: None,
            action: None,
            to: to.into(),
        }
    }

    pub fn then(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}
