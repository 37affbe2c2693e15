//! Named callables referenced by chart definitions.

use crate::core::{Action, Guard, StateAction, Status};
use std::collections::HashMap;
use std::fmt;

/// Registry of guards, actions and state hooks keyed by the names a
/// [`ChartDefinition`](crate::builder::ChartDefinition) uses.
///
/// # Example
///
/// ```rust
/// use statechart::builder::Bindings;
/// use statechart::core::Status;
///
/// #[derive(Debug)]
/// struct Go {
///     a: i32,
/// }
///
/// let bindings = Bindings::new()
///     .guard("ready", |event: &Go| event.a > 0)
///     .action("start", |_: &Go, status: Status| status)
///     .hook("log_entry", |status: Status| status);
///
/// assert!(bindings.has_guard("ready"));
/// assert!(!bindings.has_action("stop"));
/// ```
pub struct Bindings<E> {
    guards: HashMap<String, Guard<E>>,
    actions: HashMap<String, Action<E>>,
    hooks: HashMap<String, StateAction>,
}

impl<E> Bindings<E> {
    pub fn new() -> Self {
        Self {
            guards: HashMap::new(),
            actions: HashMap::new(),
            hooks: HashMap::new(),
        }
    }

    /// Bind a guard predicate. A later binding replaces an earlier one.
    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
        self
    }

    /// Bind a transition action.
    pub fn action<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&E, Status) -> Status + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Action::new(body));
        self
    }

    /// Bind a state entry/exit hook.
    pub fn hook<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(Status) -> Status + Send + Sync + 'static,
    {
        self.hooks.insert(name.into(), StateAction::new(body));
        self
    }

    pub fn has_guard(&self, name: &str) -> bool {
        self.guards.contains_key(name)
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn has_hook(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    pub fn get_guard(&self, name: &str) -> Option<&Guard<E>> {
        self.guards.get(name)
    }

    pub fn get_action(&self, name: &str) -> Option<&Action<E>> {
        self.actions.get(name)
    }

    pub fn get_hook(&self, name: &str) -> Option<&StateAction> {
        self.hooks.get(name)
    }
}

impl<E> Default for Bindings<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Bindings<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut guards: Vec<&String> = self.guards.keys().collect();
        let mut actions: Vec<&String> = self.actions.keys().collect();
        let mut hooks: Vec<&String> = self.hooks.keys().collect();
        guards.sort();
        actions.sort();
        hooks.sort();
        f.debug_struct("Bindings")
            .field("guards", &guards)
            .field("actions", &actions)
            .field("hooks", &hooks)
            .finish()
    }
}
