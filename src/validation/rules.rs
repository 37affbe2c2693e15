//! Validation rules for chart definitions.

use crate::builder::bindings::Bindings;
use crate::builder::definition::{
    BranchDef, ChartDefinition, DeclaredKind, StateDef, TargetDef, TransitionDef,
};
use crate::core::{StateId, StateTree};
use crate::validation::violations::DefinitionViolation;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of validating a definition: success, or every violation found.
pub type ValidationResult = Validation<(), NonEmptyVec<DefinitionViolation>>;

fn check<F>(ok: bool, violation: F) -> ValidationResult
where
    F: FnOnce() -> DefinitionViolation,
{
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Validate a definition against the callables available to it.
///
/// Accumulates ALL violations rather than stopping at the first.
pub fn validate<E>(definition: &ChartDefinition, bindings: &Bindings<E>) -> ValidationResult {
    let tree = StateTree::from_definition(&definition.root);
    validate_with_tree(definition, &tree, bindings)
}

/// Same as [`validate`] for a tree already built from `definition.root`.
pub(crate) fn validate_with_tree<E>(
    definition: &ChartDefinition,
    tree: &StateTree,
    bindings: &Bindings<E>,
) -> ValidationResult {
    let mut checks: Vec<ValidationResult> = Vec::new();
    let mut seen = HashSet::new();

    checks.push(check(!definition.root.children.is_empty(), || {
        DefinitionViolation::RootNotComposite
    }));

    for ((id, _), state) in tree.iter().zip(definition.root.preorder()) {
        state_rules(state, &mut seen, bindings, &mut checks);
        for transition in &state.transitions {
            transition_rules(id, state, transition, tree, bindings, &mut checks);
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

fn state_rules<'a, E>(
    state: &'a StateDef,
    seen: &mut HashSet<&'a str>,
    bindings: &Bindings<E>,
    checks: &mut Vec<ValidationResult>,
) {
    checks.push(check(!state.name.is_empty(), || {
        DefinitionViolation::EmptyStateName
    }));
    checks.push(check(seen.insert(state.name.as_str()), || {
        DefinitionViolation::DuplicateState {
            name: state.name.clone(),
        }
    }));

    let children = state.children.len();
    match state.kind {
        Some(DeclaredKind::And) => {
            checks.push(Validation::fail(
                DefinitionViolation::OrthogonalRegionsUnsupported {
                    name: state.name.clone(),
                },
            ));
        }
        Some(DeclaredKind::Basic) if children > 0 => {
            checks.push(Validation::fail(DefinitionViolation::KindMismatch {
                name: state.name.clone(),
                declared: "basic",
                children,
            }));
        }
        Some(DeclaredKind::Or) if children == 0 => {
            checks.push(Validation::fail(DefinitionViolation::KindMismatch {
                name: state.name.clone(),
                declared: "or",
                children,
            }));
        }
        _ => {}
    }

    for hook in [&state.on_entry, &state.on_exit].into_iter().flatten() {
        checks.push(bound(bindings.has_hook(hook), state, "hook", hook));
    }
}

fn bound(ok: bool, state: &StateDef, kind: &'static str, name: &str) -> ValidationResult {
    check(ok, || DefinitionViolation::UnboundName {
        state: state.name.clone(),
        kind,
        name: name.to_string(),
    })
}

fn transition_rules<E>(
    source: StateId,
    state: &StateDef,
    transition: &TransitionDef,
    tree: &StateTree,
    bindings: &Bindings<E>,
    checks: &mut Vec<ValidationResult>,
) {
    checks.push(check(!transition.event.is_empty(), || {
        DefinitionViolation::EmptyEvent {
            state: state.name.clone(),
        }
    }));
    if let Some(guard) = &transition.guard {
        checks.push(bound(bindings.has_guard(guard), state, "guard", guard));
    }
    if let Some(action) = &transition.action {
        checks.push(bound(bindings.has_action(action), state, "action", action));
    }

    let scope = if exits_locally(source, transition) {
        local_scope(source, state, transition, tree, checks)
    } else {
        exit_scope(source, state, transition, tree, checks).and_then(|exit| {
            match tree.parent(exit) {
                Some(parent) => Some(parent),
                None => {
                    checks.push(Validation::fail(DefinitionViolation::RootExit {
                        state: state.name.clone(),
                    }));
                    None
                }
            }
        })
    };

    let targets: Vec<&str> = match &transition.target {
        TargetDef::State(name) => vec![name.as_str()],
        TargetDef::Choice(branches) => {
            choice_rules(state, branches, bindings, checks);
            branches.iter().map(|branch| branch.to.as_str()).collect()
        }
    };

    for target in targets {
        match tree.id_of(target) {
            None => checks.push(Validation::fail(DefinitionViolation::UnknownState {
                state: state.name.clone(),
                name: target.to_string(),
            })),
            Some(target_id) => {
                if let Some(scope) = scope {
                    checks.push(check(tree.lineage(scope, target_id).is_some(), || {
                        DefinitionViolation::TargetOutsideScope {
                            state: state.name.clone(),
                            target: target.to_string(),
                            scope: tree.name(scope).to_string(),
                        }
                    }));
                }
            }
        }
    }
}

/// Whether a transition from `source` keeps its source active.
pub(crate) fn exits_locally(source: StateId, transition: &TransitionDef) -> bool {
    transition.local || source == StateTree::ROOT
}

/// A local transition stays inside its source, which must be a composite.
fn local_scope(
    source: StateId,
    state: &StateDef,
    transition: &TransitionDef,
    tree: &StateTree,
    checks: &mut Vec<ValidationResult>,
) -> Option<StateId> {
    if transition.exit.is_some() {
        checks.push(Validation::fail(DefinitionViolation::LocalWithExit {
            state: state.name.clone(),
        }));
        return None;
    }
    if !tree.is_composite(source) {
        checks.push(Validation::fail(DefinitionViolation::LocalOnBasic {
            state: state.name.clone(),
        }));
        return None;
    }
    Some(source)
}

/// Resolve the state a transition exits, recording why it cannot be resolved.
fn exit_scope(
    source: StateId,
    state: &StateDef,
    transition: &TransitionDef,
    tree: &StateTree,
    checks: &mut Vec<ValidationResult>,
) -> Option<StateId> {
    let Some(name) = &transition.exit else {
        return Some(source);
    };
    match tree.id_of(name) {
        None => {
            checks.push(Validation::fail(DefinitionViolation::UnknownState {
                state: state.name.clone(),
                name: name.clone(),
            }));
            None
        }
        Some(exit) if !tree.is_ancestor_or_self(exit, source) => {
            checks.push(Validation::fail(DefinitionViolation::ExitScopeNotAncestor {
                state: state.name.clone(),
                exit: name.clone(),
            }));
            None
        }
        Some(exit) => Some(exit),
    }
}

fn choice_rules<E>(
    state: &StateDef,
    branches: &[BranchDef],
    bindings: &Bindings<E>,
    checks: &mut Vec<ValidationResult>,
) {
    let Some((last, rest)) = branches.split_last() else {
        checks.push(Validation::fail(DefinitionViolation::EmptyChoice {
            state: state.name.clone(),
        }));
        return;
    };

    checks.push(check(last.guard.is_none(), || {
        DefinitionViolation::ChoiceWithoutElse {
            state: state.name.clone(),
        }
    }));
    checks.push(check(rest.iter().all(|branch| branch.guard.is_some()), || {
        DefinitionViolation::BranchAfterElse {
            state: state.name.clone(),
        }
    }));

    for branch in branches {
        if let Some(guard) = &branch.guard {
            checks.push(bound(bindings.has_guard(guard), state, "guard", guard));
        }
        if let Some(action) = &branch.action {
            checks.push(bound(bindings.has_action(action), state, "action", action));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{simple_transition, TransitionBuilder};
    use crate::core::Status;

    #[derive(Debug)]
    struct Ev;

    fn bindings() -> Bindings<Ev> {
        Bindings::new()
            .guard("ready", |_: &Ev| true)
            .action("start", |_: &Ev, s: Status| s)
            .hook("enter", |s| s)
    }

    fn violations(definition: &ChartDefinition) -> Vec<DefinitionViolation> {
        match validate(definition, &bindings()) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }

    fn submachine() -> StateDef {
        StateDef::new("root")
            .child(StateDef::new("A").transition(simple_transition("P", "Sub1")))
            .child(
                StateDef::new("Sub1")
                    .child(StateDef::new("U__Sub1").transition(simple_transition("x", "V__Sub1")))
                    .child(
                        StateDef::new("V__Sub1").transition(
                            TransitionBuilder::on("y").exit("Sub1").to("B").build().unwrap(),
                        ),
                    ),
            )
            .child(StateDef::new("B"))
    }

    #[test]
    fn valid_chart_passes() {
        let definition = ChartDefinition::new("submachineTest1", submachine());
        assert!(validate(&definition, &bindings()).is_success());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let root = StateDef::new("root")
            .child(
                StateDef::new("A")
                    .on_entry("missing_hook")
                    .transition(TransitionBuilder::on("Go").when("nope").to("Z").build().unwrap()),
            )
            .child(StateDef::new("A"));
        let found = violations(&ChartDefinition::new("broken", root));

        assert_eq!(found.len(), 4);
        assert!(found.contains(&DefinitionViolation::DuplicateState { name: "A".into() }));
        assert!(found
            .iter()
            .any(|v| matches!(v, DefinitionViolation::UnboundName { kind: "hook", .. })));
        assert!(found
            .iter()
            .any(|v| matches!(v, DefinitionViolation::UnboundName { kind: "guard", .. })));
        assert!(found
            .iter()
            .any(|v| matches!(v, DefinitionViolation::UnknownState { name, .. } if name == "Z")));
    }

    #[test]
    fn root_must_be_composite() {
        let found = violations(&ChartDefinition::new("empty", StateDef::new("root")));
        assert_eq!(found, [DefinitionViolation::RootNotComposite]);
    }

    #[test]
    fn exit_scope_must_enclose_source() {
        let mut root = submachine();
        root.children[0].transitions[0].exit = Some("Sub1".into());
        let found = violations(&ChartDefinition::new("bad_exit", root));

        assert_eq!(
            found,
            [DefinitionViolation::ExitScopeNotAncestor {
                state: "A".into(),
                exit: "Sub1".into(),
            }]
        );
    }

    #[test]
    fn target_must_lie_inside_exit_parent() {
        // Exiting only V__Sub1 keeps Sub1 active, so B is out of reach.
        let mut root = submachine();
        root.children[1].children[1].transitions[0].exit = None;
        let found = violations(&ChartDefinition::new("bad_target", root));

        assert_eq!(
            found,
            [DefinitionViolation::TargetOutsideScope {
                state: "V__Sub1".into(),
                target: "B".into(),
                scope: "Sub1".into(),
            }]
        );
    }

    #[test]
    fn root_transitions_are_local() {
        let root = StateDef::new("root")
            .child(StateDef::new("A"))
            .child(StateDef::new("B"))
            .transition(simple_transition("R", "A"));

        assert!(violations(&ChartDefinition::new("root_local", root)).is_empty());
    }

    #[test]
    fn exiting_the_root_is_rejected() {
        let exit_root = TransitionBuilder::on("R").exit("root").to("A").build().unwrap();
        let root = StateDef::new("root").child(StateDef::new("A").transition(exit_root));
        let found = violations(&ChartDefinition::new("root_exit", root));

        assert_eq!(found, [DefinitionViolation::RootExit { state: "A".into() }]);
    }

    #[test]
    fn local_transitions_stay_inside_a_composite_source() {
        let local = |to: &str| TransitionBuilder::on("L").local().to(to).build().unwrap();
        let mut with_exit = local("V__Sub1");
        with_exit.exit = Some("Sub1".into());

        let root = StateDef::new("root")
            .child(StateDef::new("A").transition(local("B")))
            .child(
                StateDef::new("Sub1")
                    .transition(local("V__Sub1"))
                    .transition(local("B"))
                    .transition(with_exit)
                    .child(StateDef::new("U__Sub1"))
                    .child(StateDef::new("V__Sub1")),
            )
            .child(StateDef::new("B"));
        let found = violations(&ChartDefinition::new("local", root));

        assert_eq!(found.len(), 3);
        assert!(found.contains(&DefinitionViolation::LocalOnBasic { state: "A".into() }));
        assert!(found.contains(&DefinitionViolation::LocalWithExit { state: "Sub1".into() }));
        assert!(found.contains(&DefinitionViolation::TargetOutsideScope {
            state: "Sub1".into(),
            target: "B".into(),
            scope: "Sub1".into(),
        }));
    }

    #[test]
    fn choice_needs_trailing_else() {
        let root = StateDef::new("root").child(StateDef::new("IDLE")).child(
            StateDef::new("RUNNING").transition(
                TransitionBuilder::on("Go")
                    .choice(vec![
                        BranchDef::otherwise("IDLE"),
                        BranchDef::when("ready", "RUNNING").then("start"),
                    ])
                    .build()
                    .unwrap(),
            ),
        );
        let found = violations(&ChartDefinition::new("choice", root));

        assert!(found.contains(&DefinitionViolation::ChoiceWithoutElse {
            state: "RUNNING".into()
        }));
        assert!(found.contains(&DefinitionViolation::BranchAfterElse {
            state: "RUNNING".into()
        }));
    }

    #[test]
    fn empty_choice_is_rejected() {
        let empty = TransitionBuilder::on("Go").choice(vec![]).build().unwrap();
        let root = StateDef::new("root").child(StateDef::new("A").transition(empty));
        let found = violations(&ChartDefinition::new("choice", root));

        assert_eq!(found, [DefinitionViolation::EmptyChoice { state: "A".into() }]);
    }

    #[test]
    fn declared_kinds_are_checked() {
        let root = StateDef::new("root")
            .child(StateDef::new("Leaf").kind(DeclaredKind::Or))
            .child(StateDef::new("Regions").kind(DeclaredKind::And).child(StateDef::new("R1")))
            .child(StateDef::new("Box").kind(DeclaredKind::Basic).child(StateDef::new("In")));
        let found = violations(&ChartDefinition::new("kinds", root));

        assert_eq!(found.len(), 3);
        assert!(found.contains(&DefinitionViolation::OrthogonalRegionsUnsupported {
            name: "Regions".into()
        }));
        assert!(found
            .iter()
            .any(|v| matches!(v, DefinitionViolation::KindMismatch { declared: "or", .. })));
        assert!(found
            .iter()
            .any(|v| matches!(v, DefinitionViolation::KindMismatch { declared: "basic", .. })));
    }
}
