//! Structural problems a chart definition can have.

use thiserror::Error;

/// One violation found while validating a chart definition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefinitionViolation {
    #[error("State name must not be empty")]
    EmptyStateName,

    #[error("State name '{name}' is used more than once")]
    DuplicateState { name: String },

    #[error("The root state must have children")]
    RootNotComposite,

    #[error("State '{name}' is declared {declared} but has {children} child(ren)")]
    KindMismatch {
        name: String,
        declared: &'static str,
        children: usize,
    },

    #[error("State '{name}' is declared AND; orthogonal regions are not supported")]
    OrthogonalRegionsUnsupported { name: String },

    #[error("Transition from '{state}' has an empty event class")]
    EmptyEvent { state: String },

    #[error("Transition from '{state}' refers to unknown state '{name}'")]
    UnknownState { state: String, name: String },

    #[error("No {kind} named '{name}' is bound (used by '{state}')")]
    UnboundName {
        state: String,
        kind: &'static str,
        name: String,
    },

    #[error("Exit scope '{exit}' is not '{state}' or one of its ancestors")]
    ExitScopeNotAncestor { state: String, exit: String },

    #[error("Transition from '{state}' would exit the root")]
    RootExit { state: String },

    #[error("Local transition from '{state}' needs a composite source")]
    LocalOnBasic { state: String },

    #[error("Local transition from '{state}' cannot also name an exit scope")]
    LocalWithExit { state: String },

    #[error("Target '{target}' of a transition from '{state}' is not inside '{scope}'")]
    TargetOutsideScope {
        state: String,
        target: String,
        scope: String,
    },

    #[error("Choice on a transition from '{state}' has no branches")]
    EmptyChoice { state: String },

    #[error("Choice on a transition from '{state}' does not end with an else branch")]
    ChoiceWithoutElse { state: String },

    #[error("Choice on a transition from '{state}' has branches after its else branch")]
    BranchAfterElse { state: String },
}
