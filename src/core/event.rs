//! Events delivered to a machine and the status token threaded through actions.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Trait for events delivered to a state machine.
///
/// An event is a tagged value: its class is matched against the event
/// names in the transition table, and the rest of the value is payload that
/// only guards and actions look at.
///
/// # Example
///
/// ```rust
/// use statechart::core::Event;
///
/// #[derive(Debug)]
/// enum Signal {
///     Go { a: i32, b: char },
///     Kill { d: i16 },
///     Tick,
/// }
///
/// impl Event for Signal {
///     fn class(&self) -> &str {
///         match self {
///             Self::Go { .. } => "Go",
///             Self::Kill { .. } => "Kill",
///             Self::Tick => "Tick",
///         }
///     }
/// }
///
/// assert_eq!(Signal::Go { a: 1, b: 'x' }.class(), "Go");
/// assert_eq!(Signal::Kill { d: 9 }.class(), "Kill");
/// ```
pub trait Event: Debug {
    /// Discriminant matched against transition event classes.
    fn class(&self) -> &str;
}

/// Opaque success/failure token passed along the actions of one transition.
///
/// The engine never branches on it. Each transition starts at
/// [`Status::OK`], hands the value to every hook and action it runs, and
/// records the final value in the transition history.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(pub i32);

impl Status {
    pub const OK: Status = Status(0);

    pub fn is_ok(&self) -> bool {
        *self == Self::OK
    }
}

impl Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status({})", self.0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            f.write_str("ok")
        } else {
            write!(f, "error({})", self.0)
        }
    }
}
