//! Chart construction.
//!
//! Charts are described as plain data (`ChartDefinition`), either loaded
//! through serde or assembled with the fluent helpers here, and bound to
//! callables through `Bindings`. `Chart::compile` turns the pair into the
//! immutable table a machine runs on.

pub mod bindings;
pub mod definition;
pub mod error;
pub mod macros;
pub mod transition;

pub use bindings::Bindings;
pub use definition::{BranchDef, ChartDefinition, DeclaredKind, StateDef, TargetDef, TransitionDef};
pub use error::BuildError;
pub use transition::TransitionBuilder;

use crate::core::Ticks;

/// Create an unguarded, untimed transition to `to`.
///
/// # Example
///
/// ```
/// use statechart::builder::{simple_transition, TargetDef};
///
/// let transition = simple_transition("P", "B");
/// assert_eq!(transition.event, "P");
/// assert_eq!(transition.target, TargetDef::State("B".to_string()));
/// ```
pub fn simple_transition(event: impl Into<String>, to: impl Into<String>) -> TransitionDef {
    TransitionDef {
        event: event.into(),
        guard: None,
        after: None,
        action: None,
        exit: None,
        local: false,
        target: TargetDef::State(to.into()),
    }
}

/// Create a transition that fires on `event` once `after` ticks have passed
/// since the source state was entered.
///
/// # Example
///
/// ```
/// use statechart::builder::timed_transition;
///
/// let transition = timed_transition("Tick", 0, "B__Sub0");
/// assert_eq!(transition.after, Some(0));
/// ```
pub fn timed_transition(
    event: impl Into<String>,
    after: Ticks,
    to: impl Into<String>,
) -> TransitionDef {
    TransitionDef {
        after: Some(after),
        ..simple_transition(event, to)
    }
}
