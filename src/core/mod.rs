//! Core statechart types.
//!
//! This module contains the static pieces every machine is built from:
//! - The state tree (`StateTree`, `StateId`)
//! - Events and the `Status` token
//! - Guard, action and hook callables
//! - Engine time and its wraparound-safe comparison
//! - Transition history records

mod event;
mod guard;
mod history;
mod state;
pub mod time;

pub use event::{Event, Status};
pub use guard::{Action, Guard, StateAction};
pub use history::{TransitionHistory, TransitionRecord};
pub use state::{LocalIndex, StateId, StateKind, StateNode, StateTree, DEFAULT_CHILD};
pub use time::{IsAfterFn, Ticks, Timestamp, WallClock};
