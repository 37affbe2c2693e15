//! Validation of chart definitions.
//!
//! Definitions are checked with Stillwater's `Validation` type so that every
//! problem in a chart is reported in one pass instead of one per compile
//! attempt.
//!
//! # Example
//!
//! ```rust
//! use statechart::builder::{simple_transition, Bindings, ChartDefinition, StateDef};
//! use statechart::validation::{into_result, validate, DefinitionViolation};
//!
//! #[derive(Debug)]
//! struct Ev;
//!
//! let root = StateDef::new("root")
//!     .child(StateDef::new("A").transition(simple_transition("P", "Missing")))
//!     .child(StateDef::new("A"));
//! let definition = ChartDefinition::new("broken", root);
//!
//! let violations = into_result(validate(&definition, &Bindings::<Ev>::new())).unwrap_err();
//! assert_eq!(violations.len(), 2);
//! assert!(violations.contains(&DefinitionViolation::DuplicateState { name: "A".into() }));
//! ```

pub mod rules;
pub mod violations;

pub use rules::{validate, ValidationResult};
pub use violations::DefinitionViolation;

pub(crate) use rules::{exits_locally, validate_with_tree};

use stillwater::validation::Validation;

/// Convert an accumulated validation into a `Result` listing every violation.
pub fn into_result(validation: ValidationResult) -> Result<(), Vec<DefinitionViolation>> {
    match validation {
        Validation::Success(()) => Ok(()),
        Validation::Failure(violations) => Err(violations.iter().cloned().collect()),
    }
}
