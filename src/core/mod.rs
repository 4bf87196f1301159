//! Core state-variant engine.
//!
//! This module contains everything a single state machine needs:
//! - Values, scalars and nominal wrapper kinds
//! - Variant descriptors and classification
//! - The transition table that gates moves between variants
//! - The state machine itself, with default rescue and partial updates
//!
//! Nothing here performs I/O; every operation runs to completion
//! synchronously and either commits fully or leaves state untouched.

mod error;
mod machine;
mod transitions;
mod value;
mod variant;
mod wrapper;

pub use error::{Rejection, StateError};
pub use machine::{MachineKind, StateMachine, When};
pub use transitions::TransitionTable;
pub use value::{Kind, Scalar, Value};
pub use variant::{Declaration, Variant};
pub use wrapper::Wrapper;
