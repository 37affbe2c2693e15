//! Statechart: a hierarchical state machine runtime
//!
//! Charts are trees of states. Composite states hold ordered children, the
//! first of which is entered by default; basic states are leaves. At any
//! time exactly one path from the root down to one basic state is active.
//! Events are offered to the active leaf first and bubble up through its
//! ancestors until some transition fires.
//!
//! The engine is a passive library: the host calls `init(now)` once and
//! `dispatch(&event, now)` per event, passing its own `u32` timestamp.
//! Timed transitions compare that timestamp against the entry time of their
//! source state; no timers are ever armed.
//!
//! # Core Concepts
//!
//! - **Definition**: plain serde data describing states and transitions, with
//!   guards, actions and hooks referred to by name
//! - **Bindings**: the named callables a definition refers to
//! - **Chart**: a validated, compiled definition shared between machines
//! - **Machine**: one running instance of a chart
//!
//! # Example
//!
//! ```rust
//! use statechart::builder::{Bindings, BranchDef, ChartDefinition, StateDef, TransitionBuilder};
//! use statechart::event_enum;
//! use statechart::runtime::{Chart, Machine};
//! use std::sync::Arc;
//!
//! event_enum! {
//!     enum Signal {
//!         Go { a: i32 },
//!         Kill,
//!         Tick,
//!     }
//! }
//!
//! let go = TransitionBuilder::on("Go")
//!     .choice(vec![BranchDef::when("positive", "RUNNING"), BranchDef::otherwise("IDLE")])
//!     .build()
//!     .unwrap();
//! let timeout = TransitionBuilder::on("Tick").after(60_000).to("IDLE").build().unwrap();
//! let kill = TransitionBuilder::on("Kill").to("IDLE").build().unwrap();
//!
//! let definition = ChartDefinition::new(
//!     "firstExample",
//!     StateDef::new("root")
//!         .child(StateDef::new("IDLE").transition(go))
//!         .child(StateDef::new("RUNNING").transition(kill).transition(timeout)),
//! );
//! let bindings = Bindings::new().guard("positive", |e: &Signal| matches!(e, Signal::Go { a } if *a > 0));
//! let chart = Arc::new(Chart::compile(&definition, &bindings).unwrap());
//!
//! let mut machine = Machine::new(chart);
//! machine.init(0).unwrap();
//! machine.dispatch(&Signal::Go { a: 1 }, 10).unwrap();
//! assert!(machine.is_in("RUNNING"));
//!
//! assert!(!machine.dispatch(&Signal::Tick, 60_009).unwrap());
//! assert!(machine.dispatch(&Signal::Tick, 60_010).unwrap());
//! assert!(machine.is_in("IDLE"));
//! ```

pub mod builder;
pub mod codec;
pub mod core;
pub mod runtime;
pub mod validation;

// Re-export commonly used types
pub use builder::{Bindings, BuildError, ChartDefinition, StateDef, TransitionBuilder};
pub use core::{Event, StateId, Status, Timestamp};
pub use runtime::{Chart, Machine, MachineConfig, MachineError};
