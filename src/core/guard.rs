//! User-supplied callables: guard predicates, transition actions and state hooks.
//!
//! The engine treats all of them as opaque. Guards decide whether a
//! transition may fire, actions run between exiting the source and entering
//! the target, and hooks run when a state is entered or exited.

use super::event::Status;
use std::fmt;
use std::sync::Arc;

/// Predicate that determines if a transition can fire for an event.
///
/// # Example
///
/// ```rust
/// use statechart::core::Guard;
///
/// #[derive(Debug)]
/// struct Go {
///     speed: i32,
/// }
///
/// let ready = Guard::new(|event: &Go| event.speed > 0);
///
/// assert!(ready.check(&Go { speed: 3 }));
/// assert!(!ready.check(&Go { speed: 0 }));
/// ```
pub struct Guard<E> {
    predicate: Arc<dyn Fn(&E) -> bool + Send + Sync>,
}

impl<E> Guard<E> {
    /// Create a guard from a predicate over the delivered event.
    ///
    /// The predicate should be deterministic; the engine may evaluate it
    /// on every dispatch that reaches its transition.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Check if the guard allows the transition for this event.
    pub fn check(&self, event: &E) -> bool {
        (self.predicate)(event)
    }
}

impl<E> Clone for Guard<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<E> fmt::Debug for Guard<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

/// Side-effecting callable run while a transition fires.
///
/// Receives the triggering event and the status produced so far, and
/// returns the status handed to the next callable.
pub struct Action<E> {
    body: Arc<dyn Fn(&E, Status) -> Status + Send + Sync>,
}

impl<E> Action<E> {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&E, Status) -> Status + Send + Sync + 'static,
    {
        Action {
            body: Arc::new(body),
        }
    }

    pub fn run(&self, event: &E, status: Status) -> Status {
        (self.body)(event, status)
    }
}

impl<E> Clone for Action<E> {
    fn clone(&self) -> Self {
        Self {
            body: Arc::clone(&self.body),
        }
    }
}

impl<E> fmt::Debug for Action<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Entry or exit hook attached to a state.
///
/// Hooks have no event: `init` enters the initial configuration without one.
#[derive(Clone)]
pub struct StateAction {
    body: Arc<dyn Fn(Status) -> Status + Send + Sync>,
}

impl StateAction {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(Status) -> Status + Send + Sync + 'static,
    {
        StateAction {
            body: Arc::new(body),
        }
    }

    pub fn run(&self, status: Status) -> Status {
        (self.body)(status)
    }
}

impl fmt::Debug for StateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StateAction(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Reading(i32);

    #[test]
    fn guard_allows_matching_events() {
        let guard = Guard::new(|r: &Reading| r.0 >= 10);

        assert!(guard.check(&Reading(10)));
        assert!(!guard.check(&Reading(9)));
    }

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::new(|r: &Reading| r.0 % 2 == 0);
        let event = Reading(4);

        assert_eq!(guard.check(&event), guard.check(&event));
    }

    #[test]
    fn cloned_guard_shares_predicate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let guard = Guard::new(move |_: &Reading| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        let copy = guard.clone();

        guard.check(&Reading(0));
        copy.check(&Reading(0));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn action_threads_status() {
        let fail_on_negative = Action::new(|r: &Reading, status: Status| {
            if r.0 < 0 {
                Status(-1)
            } else {
                status
            }
        });

        assert_eq!(fail_on_negative.run(&Reading(1), Status::OK), Status::OK);
        assert_eq!(fail_on_negative.run(&Reading(-5), Status::OK), Status(-1));
        assert_eq!(fail_on_negative.run(&Reading(1), Status(4)), Status(4));
    }

    #[test]
    fn state_action_receives_previous_status() {
        let bump = StateAction::new(|status: Status| Status(status.0 + 1));

        assert_eq!(bump.run(Status::OK), Status(1));
        assert_eq!(bump.run(Status(1)), Status(2));
    }
}
