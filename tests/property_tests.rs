//! Property-based tests for the statechart runtime.
//!
//! These tests use proptest to check that the active-path and timer
//! invariants hold across many randomly generated event sequences.

use proptest::prelude::*;
use statechart::builder::{
    simple_transition, timed_transition, Bindings, BranchDef, ChartDefinition, StateDef,
    TransitionBuilder,
};
use statechart::core::{time, StateKind};
use statechart::event_enum;
use statechart::runtime::{Chart, Machine};
use std::sync::Arc;

event_enum! {
    enum Input {
        Go { ready: bool },
        Kill,
        Tick,
        Dive,
        Surface,
    }
}

fn nested_chart() -> Arc<Chart<Input>> {
    let go = TransitionBuilder::on("Go")
        .choice(vec![
            BranchDef::when("ready", "Running"),
            BranchDef::otherwise("Idle"),
        ])
        .build()
        .unwrap();
    let surface = TransitionBuilder::on("Surface").exit("Deep").to("Idle").build().unwrap();

    let definition = ChartDefinition::new(
        "nested",
        StateDef::new("root")
            .child(
                StateDef::new("Idle")
                    .transition(go)
                    .transition(simple_transition("Dive", "Bottom")),
            )
            .child(
                StateDef::new("Running")
                    .transition(simple_transition("Kill", "Idle"))
                    .transition(timed_transition("Tick", 50, "Idle")),
            )
            .child(
                StateDef::new("Deep")
                    .transition(simple_transition("Kill", "Running"))
                    .child(
                        StateDef::new("Middle")
                            .child(StateDef::new("Upper").transition(timed_transition("Tick", 10, "Bottom")))
                            .child(StateDef::new("Bottom").transition(surface)),
                    )
                    .child(StateDef::new("Side").transition(simple_transition("Dive", "Upper"))),
            ),
    );
    let bindings = Bindings::new().guard("ready", |e: &Input| matches!(e, Input::Go { ready: true }));
    Arc::new(Chart::compile(&definition, &bindings).unwrap())
}

prop_compose! {
    fn arbitrary_input()(variant in 0..6u8) -> Input {
        match variant {
            0 => Input::Go { ready: true },
            1 => Input::Go { ready: false },
            2 => Input::Kill,
            3 => Input::Tick,
            4 => Input::Dive,
            _ => Input::Surface,
        }
    }
}

prop_compose! {
    fn arbitrary_script()(steps in prop::collection::vec((arbitrary_input(), 0..40u32), 0..64)) -> Vec<(Input, u32)> {
        steps
    }
}

fn assert_single_active_leaf(machine: &Machine<Input>) -> Result<(), TestCaseError> {
    let tree = machine.chart().tree();
    let path = machine.active_path().unwrap();

    prop_assert!(!path.is_empty());
    let leaf = *path.last().unwrap();
    prop_assert_eq!(tree.kind(leaf), StateKind::Basic);

    let active: Vec<_> = tree.ids().filter(|&id| machine.is_active(id)).collect();
    let mut expected = path.clone();
    expected.sort_by_key(|id| id.index());
    prop_assert_eq!(active, expected);

    let active_leaves = tree
        .ids()
        .filter(|&id| machine.is_active(id) && tree.kind(id) == StateKind::Basic)
        .count();
    prop_assert_eq!(active_leaves, 1);
    Ok(())
}

proptest! {
    #[test]
    fn exactly_one_active_leaf_after_every_dispatch(script in arbitrary_script()) {
        let mut machine = Machine::new(nested_chart());
        machine.init(0).unwrap();
        assert_single_active_leaf(&machine)?;

        let mut now = 0u32;
        for (input, delta) in &script {
            now = now.wrapping_add(*delta);
            machine.dispatch(input, now).unwrap();
            assert_single_active_leaf(&machine)?;
        }
    }

    #[test]
    fn history_never_exceeds_its_limit(script in arbitrary_script()) {
        let mut machine = Machine::new(nested_chart());
        machine.init(0).unwrap();

        let mut fired = 0usize;
        for (input, delta) in &script {
            if machine.dispatch(input, *delta).unwrap() {
                fired += 1;
            }
        }

        prop_assert_eq!(machine.history().len(), fired.min(machine.history().limit()));
    }

    #[test]
    fn timed_transition_fires_iff_duration_elapsed(
        entered in any::<u32>(),
        elapsed in 0..200u32,
    ) {
        let mut machine = Machine::new(nested_chart());
        machine.init(0).unwrap();
        machine.dispatch(&Input::Go { ready: true }, entered).unwrap();

        let fired = machine
            .dispatch(&Input::Tick, entered.wrapping_add(elapsed))
            .unwrap();

        prop_assert_eq!(fired, elapsed >= 50);
        prop_assert_eq!(machine.is_in("Idle"), fired);
    }

    #[test]
    fn is_after_matches_wrapping_elapsed(
        duration in any::<u32>(),
        entered in any::<u32>(),
        now in any::<u32>(),
    ) {
        prop_assert_eq!(
            time::is_after(duration, entered, now),
            now.wrapping_sub(entered) >= duration
        );
    }

    #[test]
    fn machines_on_one_chart_are_independent(script in arbitrary_script()) {
        let chart = nested_chart();
        let mut driven = Machine::new(Arc::clone(&chart));
        let mut idle = Machine::new(chart);
        driven.init(0).unwrap();
        idle.init(0).unwrap();

        for (input, delta) in &script {
            driven.dispatch(input, *delta).unwrap();
        }

        prop_assert_eq!(idle.active_leaf_name(), Some("Idle"));
        prop_assert!(idle.history().is_empty());
    }
}
