//! Runtime errors.

use crate::core::LocalIndex;
use thiserror::Error;

/// Errors that can occur while initializing or driving a machine
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MachineError {
    #[error("Machine is not initialized. Call init(now) before dispatching events")]
    NotInitialized,

    #[error("Machine is already initialized. Call reset() before init(now) again")]
    AlreadyInitialized,

    /// The store names no child, or a child slot that does not exist, for an
    /// active composite. The active path is undefined from here on.
    #[error("Active path is undefined below composite '{state}' (child slot {slot:?})")]
    UndefinedActivePath {
        state: String,
        slot: Option<LocalIndex>,
    },

    #[error("Choice on a transition from '{state}' selected no branch")]
    NoBranchSelected { state: String },

    #[error("Machine faulted on an earlier call and must be reset")]
    Faulted,
}
