//! First Example
//!
//! A two-state machine: IDLE waits for `Go`,
//! a choice checks the guard after leaving IDLE, and RUNNING falls back to
//! IDLE on `Kill` or after a minute of `Tick`s.
//!
//! Key concepts:
//! - Choice pseudostate with an else branch
//! - Timed transition measured from the source state's entry
//! - Wall-clock timestamps converted with `WallClock`
//!
//! Run with: RUST_LOG=debug cargo run --example first_example

use statechart::builder::{Bindings, BranchDef, ChartDefinition, StateDef, TransitionBuilder};
use statechart::core::{Status, WallClock};
use statechart::event_enum;
use statechart::runtime::{Chart, Machine};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

event_enum! {
    enum FirstEvent {
        Go { a: i32, b: char },
        Kill { d: i16 },
        Tick,
    }
}

fn definition() -> Result<ChartDefinition, statechart::BuildError> {
    let go = TransitionBuilder::on("Go")
        .choice(vec![
            BranchDef::when("ready_query", "RUNNING").then("start"),
            BranchDef::otherwise("IDLE"),
        ])
        .build()?;
    let kill = TransitionBuilder::on("Kill").then("stop").to("IDLE").build()?;
    let timeout = TransitionBuilder::on("Tick").after(60_000).then("stop").to("IDLE").build()?;

    Ok(ChartDefinition::new(
        "firstExample",
        StateDef::new("root")
            .child(StateDef::new("IDLE").transition(go))
            .child(StateDef::new("RUNNING").transition(kill).transition(timeout)),
    ))
}

fn bindings() -> Bindings<FirstEvent> {
    Bindings::new()
        .guard("ready_query", |event: &FirstEvent| matches!(event, FirstEvent::Go { a, .. } if *a > 0))
        .action("start", |event: &FirstEvent, status: Status| {
            println!("  start({event:?})");
            status
        })
        .action("stop", |event: &FirstEvent, status: Status| {
            println!("  stop({event:?})");
            status
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== First Example ===\n");

    let chart = Arc::new(Chart::compile(&definition()?, &bindings())?);
    let clock = WallClock::new();
    let mut machine = Machine::new(chart);
    machine.init(clock.now())?;
    println!("Initial state: {:?}", machine.active_leaf_name());

    // Scripted timestamps stand in for a real minute passing.
    let base = clock.now();
    let script = [
        (FirstEvent::Go { a: -1, b: 'n' }, 0),
        (FirstEvent::Go { a: 7, b: 'y' }, 10),
        (FirstEvent::Tick, 30_000),
        (FirstEvent::Tick, 60_010),
        (FirstEvent::Go { a: 1, b: 'y' }, 61_000),
        (FirstEvent::Kill { d: 3 }, 62_000),
    ];

    for (event, offset) in &script {
        let handled = machine.dispatch(event, base.wrapping_add(*offset))?;
        println!(
            "{event:?} at +{offset}ms -> handled: {handled}, state: {:?}",
            machine.active_leaf_name()
        );
    }

    println!("\nTransition path: {:?}", machine.history().get_path());
    println!("\n=== Example Complete ===");
    Ok(())
}
