//! Compiled, immutable chart tables.
//!
//! Compilation resolves every name in a definition once: states become
//! `StateId`s, transition targets become entry paths, and guard/action/hook
//! names become the bound callables. A compiled chart is shared by any
//! number of machines.

use crate::builder::{Bindings, BuildError, ChartDefinition, TargetDef, TransitionDef};
use crate::core::{Action, Guard, LocalIndex, StateAction, StateId, StateTree, Ticks};
use crate::validation::{self, DefinitionViolation};
use tracing::debug;

/// Where entry starts and which child slots to take below it.
///
/// `top` is entered first. At each composite met on the way down, the next
/// index of `descend` picks the child; once the indices run out, entry falls
/// back to default children until a basic state is reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPath {
    top: StateId,
    descend: Vec<LocalIndex>,
}

impl EntryPath {
    pub fn top(&self) -> StateId {
        self.top
    }

    pub fn descend(&self) -> &[LocalIndex] {
        &self.descend
    }
}

/// What a transition leaves when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExitScope {
    /// The state itself and everything active below it.
    State(StateId),
    /// Only the active child of this composite; the composite stays active.
    ChildOf(StateId),
}

impl ExitScope {
    /// The state whose subtree the targets must lie in.
    fn enclosing(self, tree: &StateTree) -> Option<StateId> {
        match self {
            ExitScope::State(state) => tree.parent(state),
            ExitScope::ChildOf(composite) => Some(composite),
        }
    }

    pub(crate) fn state(self) -> StateId {
        match self {
            ExitScope::State(state) | ExitScope::ChildOf(state) => state,
        }
    }
}

pub(crate) struct Branch<E> {
    pub(crate) guard: Option<Guard<E>>,
    pub(crate) action: Option<Action<E>>,
    pub(crate) entry: EntryPath,
}

pub(crate) struct CompiledTransition<E> {
    pub(crate) event: String,
    pub(crate) guard: Option<Guard<E>>,
    pub(crate) after: Option<Ticks>,
    pub(crate) action: Option<Action<E>>,
    pub(crate) exit: ExitScope,
    /// A plain target compiles to one unguarded branch.
    pub(crate) branches: Vec<Branch<E>>,
}

/// State tree plus transition table, ready to drive machines.
pub struct Chart<E> {
    name: String,
    tree: StateTree,
    transitions: Vec<Vec<CompiledTransition<E>>>,
    entry_hooks: Vec<Option<StateAction>>,
    exit_hooks: Vec<Option<StateAction>>,
}

impl<E> Chart<E> {
    /// Validate `definition` and resolve it against `bindings`.
    pub fn compile(definition: &ChartDefinition, bindings: &Bindings<E>) -> Result<Self, BuildError> {
        let tree = StateTree::from_definition(&definition.root);
        validation::into_result(validation::validate_with_tree(definition, &tree, bindings))
            .map_err(|violations| BuildError::InvalidDefinition { violations })?;

        let states = definition.root.preorder();
        let mut transitions = Vec::with_capacity(states.len());
        let mut entry_hooks = Vec::with_capacity(states.len());
        let mut exit_hooks = Vec::with_capacity(states.len());

        for ((source, _), state) in tree.iter().zip(states) {
            let compiled = state
                .transitions
                .iter()
                .map(|transition| compile_transition(&tree, source, transition, bindings))
                .collect::<Result<Vec<_>, _>>()?;
            transitions.push(compiled);
            entry_hooks.push(bound("hook", state.on_entry.as_deref(), |n| bindings.get_hook(n))?);
            exit_hooks.push(bound("hook", state.on_exit.as_deref(), |n| bindings.get_hook(n))?);
        }

        debug!(
            chart = %definition.name,
            states = tree.len(),
            transitions = transitions.iter().map(Vec::len).sum::<usize>(),
            "chart compiled"
        );

        Ok(Chart {
            name: definition.name.clone(),
            tree,
            transitions,
            entry_hooks,
            exit_hooks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree(&self) -> &StateTree {
        &self.tree
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.tree.id_of(name)
    }

    /// Number of transitions declared directly on `state`.
    pub fn transition_count(&self, state: StateId) -> usize {
        self.transitions.get(state.index()).map_or(0, Vec::len)
    }

    pub(crate) fn transitions(&self, state: StateId) -> &[CompiledTransition<E>] {
        &self.transitions[state.index()]
    }

    pub(crate) fn entry_hook(&self, state: StateId) -> Option<&StateAction> {
        self.entry_hooks[state.index()].as_ref()
    }

    pub(crate) fn exit_hook(&self, state: StateId) -> Option<&StateAction> {
        self.exit_hooks[state.index()].as_ref()
    }
}

fn compile_transition<E>(
    tree: &StateTree,
    source: StateId,
    transition: &TransitionDef,
    bindings: &Bindings<E>,
) -> Result<CompiledTransition<E>, BuildError> {
    let exit = match &transition.exit {
        _ if validation::exits_locally(source, transition) => ExitScope::ChildOf(source),
        Some(name) => ExitScope::State(state_id(tree, name)?),
        None => ExitScope::State(source),
    };

    let branches = match &transition.target {
        TargetDef::State(to) => vec![Branch {
            guard: None,
            action: None,
            entry: entry_path(tree, exit, to)?,
        }],
        TargetDef::Choice(branches) => branches
            .iter()
            .map(|branch| -> Result<Branch<E>, BuildError> {
                Ok(Branch {
                    guard: bound("guard", branch.guard.as_deref(), |n| bindings.get_guard(n))?,
                    action: bound("action", branch.action.as_deref(), |n| bindings.get_action(n))?,
                    entry: entry_path(tree, exit, &branch.to)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(CompiledTransition {
        event: transition.event.clone(),
        guard: bound("guard", transition.guard.as_deref(), |n| bindings.get_guard(n))?,
        after: transition.after,
        action: bound("action", transition.action.as_deref(), |n| bindings.get_action(n))?,
        exit,
        branches,
    })
}

fn state_id(tree: &StateTree, name: &str) -> Result<StateId, BuildError> {
    tree.id_of(name).ok_or_else(|| BuildError::UnknownState {
        name: name.to_string(),
    })
}

fn bound<'b, T, F>(kind: &'static str, name: Option<&str>, find: F) -> Result<Option<T>, BuildError>
where
    T: Clone + 'b,
    F: Fn(&str) -> Option<&'b T>,
{
    name.map(|name| {
        find(name).cloned().ok_or_else(|| BuildError::UnboundName {
            kind,
            name: name.to_string(),
        })
    })
    .transpose()
}

/// Entry path from just inside the exit scope down to `to`.
fn entry_path(tree: &StateTree, exit: ExitScope, to: &str) -> Result<EntryPath, BuildError> {
    let target = state_id(tree, to)?;
    let out_of_scope = |violation: DefinitionViolation| BuildError::InvalidDefinition {
        violations: vec![violation],
    };

    let scope = exit.enclosing(tree).ok_or_else(|| {
        out_of_scope(DefinitionViolation::RootExit {
            state: tree.name(exit.state()).to_string(),
        })
    })?;
    let lineage = tree.lineage(scope, target).ok_or_else(|| {
        out_of_scope(DefinitionViolation::TargetOutsideScope {
            state: tree.name(exit.state()).to_string(),
            target: to.to_string(),
            scope: tree.name(scope).to_string(),
        })
    })?;

    let (&top, below) = lineage.split_first().ok_or_else(|| BuildError::UnknownState {
        name: to.to_string(),
    })?;
    Ok(EntryPath {
        top,
        descend: below.iter().filter_map(|&state| tree.local_index(state)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{simple_transition, BranchDef, StateDef, TransitionBuilder};
    use crate::core::Status;

    #[derive(Debug)]
    struct Ev;

    fn nested() -> ChartDefinition {
        let deep = TransitionBuilder::on("Deep").to("I2").build().unwrap();
        let choice = TransitionBuilder::on("Pick")
            .exit("Outer")
            .choice(vec![
                BranchDef::when("yes", "B").then("note"),
                BranchDef::otherwise("Inner"),
            ])
            .build()
            .unwrap();

        ChartDefinition::new(
            "nested",
            StateDef::new("root")
                .child(StateDef::new("A").on_entry("enter_a").transition(deep))
                .child(
                    StateDef::new("Outer")
                        .child(StateDef::new("O1"))
                        .child(
                            StateDef::new("Inner")
                                .child(StateDef::new("I1").transition(choice))
                                .child(StateDef::new("I2")),
                        ),
                )
                .child(StateDef::new("B").transition(simple_transition("Back", "A"))),
        )
    }

    fn bindings() -> Bindings<Ev> {
        Bindings::new()
            .guard("yes", |_: &Ev| true)
            .action("note", |_: &Ev, s: Status| s)
            .hook("enter_a", |s| s)
    }

    #[test]
    fn deep_target_compiles_to_entry_path() {
        let chart = Chart::compile(&nested(), &bindings()).unwrap();
        let a = chart.state_id("A").unwrap();
        let transition = &chart.transitions(a)[0];

        assert_eq!(transition.exit, ExitScope::State(a));
        let entry = &transition.branches[0].entry;
        assert_eq!(entry.top(), chart.state_id("Outer").unwrap());
        // Inner is slot 1 of Outer, I2 is slot 1 of Inner.
        assert_eq!(entry.descend(), &[1, 1]);
    }

    #[test]
    fn choice_compiles_every_branch() {
        let chart = Chart::compile(&nested(), &bindings()).unwrap();
        let i1 = chart.state_id("I1").unwrap();
        let transition = &chart.transitions(i1)[0];

        assert_eq!(transition.exit, ExitScope::State(chart.state_id("Outer").unwrap()));
        assert_eq!(transition.branches.len(), 2);
        assert!(transition.branches[0].guard.is_some());
        assert!(transition.branches[0].action.is_some());
        assert!(transition.branches[1].guard.is_none());
        assert_eq!(transition.branches[0].entry.top(), chart.state_id("B").unwrap());
        assert!(transition.branches[0].entry.descend().is_empty());
    }

    #[test]
    fn root_and_local_transitions_keep_their_source() {
        let local = TransitionBuilder::on("Back").local().to("O1").build().unwrap();
        let mut definition = nested();
        definition.root.transitions.push(simple_transition("Home", "A"));
        definition.root.children[1].transitions.push(local);
        let chart = Chart::compile(&definition, &bindings()).unwrap();
        let outer = chart.state_id("Outer").unwrap();

        let home = &chart.transitions(StateTree::ROOT)[0];
        assert_eq!(home.exit, ExitScope::ChildOf(StateTree::ROOT));
        assert_eq!(home.branches[0].entry.top(), chart.state_id("A").unwrap());

        let back = &chart.transitions(outer)[0];
        assert_eq!(back.exit, ExitScope::ChildOf(outer));
        assert_eq!(back.branches[0].entry.top(), chart.state_id("O1").unwrap());
        assert!(back.branches[0].entry.descend().is_empty());
    }

    #[test]
    fn hooks_are_resolved_per_state() {
        let chart = Chart::compile(&nested(), &bindings()).unwrap();

        assert!(chart.entry_hook(chart.state_id("A").unwrap()).is_some());
        assert!(chart.exit_hook(chart.state_id("A").unwrap()).is_none());
        assert!(chart.entry_hook(chart.state_id("B").unwrap()).is_none());
    }

    #[test]
    fn transition_counts_are_per_state() {
        let chart = Chart::compile(&nested(), &bindings()).unwrap();

        assert_eq!(chart.transition_count(chart.state_id("B").unwrap()), 1);
        assert_eq!(chart.transition_count(StateTree::ROOT), 0);
        assert_eq!(chart.name(), "nested");
    }

    #[test]
    fn invalid_definition_is_rejected_with_violations() {
        let result = Chart::compile(&nested(), &Bindings::<Ev>::new());

        match result {
            Err(BuildError::InvalidDefinition { violations }) => {
                // One hook, one guard and one action are missing.
                assert_eq!(violations.len(), 3);
            }
            Err(other) => panic!("Expected InvalidDefinition, got {other}"),
            Ok(_) => panic!("Expected InvalidDefinition, got a chart"),
        }
    }
}
