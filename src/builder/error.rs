//! Build errors for declarations and intersections.

use thiserror::Error;

/// Errors that can occur when building machine kinds and intersections.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("No variants declared. Pass at least one variant to declare()")]
    NoVariants,

    #[error("Variant '{0}' is declared more than once")]
    DuplicateVariant(String),

    #[error("Variant '{0}' is used in the transition table but not declared")]
    UndeclaredVariant(String),

    #[error("Default value '{0}' does not belong to any declared variant")]
    UndeclaredDefault(String),

    #[error("No members given. An intersection needs at least one state machine")]
    NoMembers,

    #[error("Member '{0}' appears more than once")]
    DuplicateMember(String),
}
