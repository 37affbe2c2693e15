//! Per-machine configuration.

use crate::core::time::{self, IsAfterFn};

/// Default number of fired transitions kept in a machine's history.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Configuration applied when a machine is created.
///
/// # Example
///
/// ```rust
/// use statechart::runtime::MachineConfig;
///
/// // Saturating comparison for a host whose counter never wraps.
/// fn saturating(duration: u32, entered: u32, now: u32) -> bool {
///     now.saturating_sub(entered) >= duration
/// }
///
/// let config = MachineConfig::default()
///     .with_time_comparison(saturating)
///     .with_history_limit(0);
///
/// assert!(!(config.is_after)(10, 100, 50));
/// assert_eq!(config.history_limit, 0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MachineConfig {
    /// Decides whether a timed transition's duration has elapsed.
    pub is_after: IsAfterFn,
    /// Fired transitions kept for inspection; zero disables recording.
    pub history_limit: usize,
}

impl MachineConfig {
    pub fn with_time_comparison(mut self, is_after: IsAfterFn) -> Self {
        self.is_after = is_after;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            is_after: time::is_after,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_comparison_is_modular() {
        let config = MachineConfig::default();

        assert!((config.is_after)(10, u32::MAX - 4, 5));
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }
}
