//! Errors raised by state machines and intersections.

use crate::builder::BuildError;
use thiserror::Error;

/// Rejection of an attempted state operation.
///
/// Every variant is a failure of the call that produced it; the value held
/// before the call is left untouched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StateError {
    #[error("Illegal argument: {value}")]
    IllegalArgument { value: String },

    #[error("Illegal transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    #[error("Property {field} does not exist")]
    UnknownField { field: String },

    #[error("Inconsistent initial state: member '{member}' is {found}, expected {expected}")]
    InconsistentInitialState {
        member: String,
        found: String,
        expected: String,
    },

    #[error("No mutual state reachable for {value}")]
    NoMutualState { value: String },

    #[error("Default {value} is rejected by member '{member}': {source}")]
    DefaultInvalid {
        member: String,
        value: String,
        #[source]
        source: Box<StateError>,
    },

    #[error("No member named '{0}'")]
    UnknownMember(String),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// One member's objection to a candidate value.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("member '{member}' rejects the value: {error}")]
pub struct Rejection {
    pub member: String,
    pub error: StateError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = StateError::IllegalTransition {
            from: "loaded".to_string(),
            to: "loading".to_string(),
        };
        assert_eq!(err.to_string(), "Illegal transition: loaded -> loading");

        let err = StateError::UnknownField {
            field: "route".to_string(),
        };
        assert_eq!(err.to_string(), "Property route does not exist");
    }

    #[test]
    fn default_invalid_exposes_its_source() {
        use std::error::Error as _;

        let err = StateError::DefaultInvalid {
            member: "s2".to_string(),
            value: "4".to_string(),
            source: Box::new(StateError::IllegalArgument {
                value: "4".to_string(),
            }),
        };

        assert!(err.source().is_some());
    }
}
