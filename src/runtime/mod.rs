//! Compiled charts and the machines that run them.
//!
//! A [`Chart`] is compiled once from a definition and its bindings, then
//! shared through `Arc` by any number of [`Machine`]s. Each machine owns its
//! runtime store and is driven by the host with `init(now)` followed by
//! `dispatch(&event, now)`; it never reads a clock itself.

pub mod chart;
pub mod config;
pub mod error;
pub mod machine;
mod sequencer;
mod store;

pub use chart::{Chart, EntryPath};
pub use config::{MachineConfig, DEFAULT_HISTORY_LIMIT};
pub use error::MachineError;
pub use machine::{Machine, MachineId, Phase};

impl crate::builder::ChartDefinition {
    /// Shorthand for [`Chart::compile`].
    pub fn compile<E>(
        &self,
        bindings: &crate::builder::Bindings<E>,
    ) -> Result<Chart<E>, crate::builder::BuildError> {
        Chart::compile(self, bindings)
    }
}
