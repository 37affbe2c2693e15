//! Builder for transition definitions.

use crate::builder::definition::{BranchDef, TargetDef, TransitionDef};
use crate::builder::error::BuildError;
use crate::core::Ticks;

/// Builder for constructing transitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use statechart::builder::{TransitionBuilder, TargetDef};
///
/// let timeout = TransitionBuilder::on("Tick")
///     .after(60_000)
///     .then("stop")
///     .to("IDLE")
///     .build()
///     .unwrap();
///
/// assert_eq!(timeout.after, Some(60_000));
/// assert_eq!(timeout.target, TargetDef::State("IDLE".to_string()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransitionBuilder {
    event: Option<String>,
    guard: Option<String>,
    after: Option<Ticks>,
    action: Option<String>,
    exit: Option<String>,
    local: bool,
    to: Option<String>,
    choice: Option<Vec<BranchDef>>,
}

impl TransitionBuilder {
    /// Create a new, empty transition builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transition triggered by `event`.
    pub fn on(event: impl Into<String>) -> Self {
        Self::new().event(event)
    }

    /// Set the triggering event class (required).
    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Name the guard binding (optional).
    pub fn when(mut self, guard: impl Into<String>) -> Self {
        self.guard = Some(guard.into());
        self
    }

    /// Make the transition timed (optional).
    pub fn after(mut self, duration: Ticks) -> Self {
        self.after = Some(duration);
        self
    }

    /// Name the action binding (optional).
    pub fn then(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Exit this ancestor of the source instead of just the source (optional).
    pub fn exit(mut self, state: impl Into<String>) -> Self {
        self.exit = Some(state.into());
        self
    }

    /// Keep the source active and exit only its active child (optional).
    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }

    /// Target a single state.
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to = Some(state.into());
        self
    }

    /// Target a choice pseudostate.
    pub fn choice(mut self, branches: Vec<BranchDef>) -> Self {
        self.choice = Some(branches);
        self
    }

    /// Build the transition definition.
    pub fn build(self) -> Result<TransitionDef, BuildError> {
        let event = self.event.ok_or(BuildError::MissingEvent)?;
        let target = match (self.to, self.choice) {
            (Some(state), None) => TargetDef::State(state),
            (None, Some(branches)) => TargetDef::Choice(branches),
            (Some(_), Some(_)) => return Err(BuildError::ConflictingTarget),
            (None, None) => return Err(BuildError::MissingTarget),
        };

        Ok(TransitionDef {
            event,
            guard: self.guard,
            after: self.after,
            action: self.action,
            exit: self.exit,
            local: self.local,
            target,
        })
    }
}
