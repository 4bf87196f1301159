//! Builder API for declaring machine kinds.
//!
//! Declarations are configured through a fluent builder and validated once
//! by `build()`, which yields an immutable [`MachineKind`].

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::KindBuilder;

use crate::core::{MachineKind, Variant};

/// Start a declaration from an ordered list of variants of one type.
///
/// Use the [`declare!`](crate::declare) macro to mix scalars and kinds.
///
/// # Example
///
/// ```
/// use variantstate::builder::declare;
///
/// let phase = declare(["loading", "loaded", "unloading"]).build().unwrap();
/// let state = phase.init("loading").unwrap();
///
/// assert!(state.is("loading"));
/// ```
pub fn declare<I, V>(variants: I) -> KindBuilder
where
    I: IntoIterator<Item = V>,
    V: Into<Variant>,
{
    KindBuilder::new(variants.into_iter().map(Into::into).collect())
}

/// Declare a kind with no transition table or default.
///
/// # Example
///
/// ```
/// use variantstate::builder::unconstrained;
///
/// let flag = unconstrained([true, false]).unwrap();
/// let mut state = flag.init(true).unwrap();
/// state.set(false).unwrap();
/// ```
pub fn unconstrained<I, V>(variants: I) -> Result<MachineKind, BuildError>
where
    I: IntoIterator<Item = V>,
    V: Into<Variant>,
{
    declare(variants).build()
}
