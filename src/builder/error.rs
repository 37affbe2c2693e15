//! Build errors for transition builders and chart compilation.

use crate::validation::DefinitionViolation;
use thiserror::Error;

/// Errors that can occur when building transitions and compiling charts.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Transition event not specified. Start from TransitionBuilder::on(event)")]
    MissingEvent,

    #[error("Transition target not specified. Call .to(state) or .choice(branches)")]
    MissingTarget,

    #[error("Transition has both a state target and a choice. Call only one of .to() and .choice()")]
    ConflictingTarget,

    #[error("Chart definition has {} violation(s): {}", .violations.len(), summarize(.violations))]
    InvalidDefinition { violations: Vec<DefinitionViolation> },

    #[error("State '{name}' is not part of the chart")]
    UnknownState { name: String },

    #[error("No {kind} bound under the name '{name}'")]
    UnboundName { kind: &'static str, name: String },
}

fn summarize(violations: &[DefinitionViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_definition_lists_every_violation() {
        let error = BuildError::InvalidDefinition {
            violations: vec![
                DefinitionViolation::RootNotComposite,
                DefinitionViolation::DuplicateState {
                    name: "A".to_string(),
                },
            ],
        };

        let message = error.to_string();
        assert!(message.starts_with("Chart definition has 2 violation(s)"));
        assert!(message.contains("'A'"));
    }
}
