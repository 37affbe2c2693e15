//! Traffic Light
//!
//! A cyclic junction controller loaded from a JSON table. Lights change on
//! `Tick` once their phase has lasted long enough; an approaching emergency
//! vehicle forces all lights red until it has cleared.
//!
//! Key concepts:
//! - Chart definitions as plain JSON data
//! - Named actions and hooks bound at compile time
//! - Timed transitions driven by a periodic tick
//! - Versioned binary encoding of the same table
//!
//! Run with: RUST_LOG=debug cargo run --example traffic_light

use statechart::builder::Bindings;
use statechart::codec;
use statechart::event_enum;
use statechart::runtime::{Chart, Machine};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

event_enum! {
    enum Traffic {
        Tick,
        EvRecApproaches,
        EvRecClear,
    }
}

const TABLE: &str = include_str!("traffic_light.json");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Traffic Light ===\n");

    let definition = codec::from_json(TABLE)?;
    let bytes = codec::to_bytes(&definition)?;
    println!("Table: {} bytes of JSON, {} bytes encoded", TABLE.len(), bytes.len());

    let bindings = Bindings::new()
        .action("announce", |_: &Traffic, status| {
            println!("  controller online");
            status
        })
        .hook("lamps", |status| {
            println!("  lamps switched");
            status
        });
    let chart = Arc::new(Chart::compile(&codec::from_bytes(&bytes)?, &bindings)?);

    let mut machine = Machine::new(chart);
    machine.init(0)?;

    // One tick per second for two and a half minutes, with an emergency
    // vehicle passing through at the one minute mark.
    for second in 0..150u32 {
        let now = second * 1_000;
        if second == 60 {
            machine.dispatch(&Traffic::EvRecApproaches, now)?;
        }
        if second == 75 {
            machine.dispatch(&Traffic::EvRecClear, now)?;
        }
        if machine.dispatch(&Traffic::Tick, now)? {
            println!("t={second:>3}s -> {:?}", machine.active_leaf_name());
        }
    }

    println!("\nTransitions recorded: {}", machine.history().len());
    println!("\n=== Example Complete ===");
    Ok(())
}
