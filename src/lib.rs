//! Variantstate: finite-state values with typed variants
//!
//! A state value is always exactly one of a fixed, declared set of
//! variants: plain constants, nominal wrapper kinds carrying a payload, or
//! wrappers whose payload nests further state machines. Declarations can
//! add a transition graph, a set of legal initial variants, and a default
//! to fall back to when a requested value is rejected.
//!
//! # Core Concepts
//!
//! - **Declaration**: an ordered, immutable list of variants built through
//!   [`declare!`] and [`KindBuilder`](builder::KindBuilder)
//! - **State machine**: owns one current value and gates every change
//! - **Wrapper kinds**: payload-holding variants matched by identity
//! - **Intersection**: several machines driven to one agreed value
//!
//! # Example
//!
//! ```rust
//! use variantstate::core::{Kind, Value};
//! use variantstate::{declare, record};
//!
//! let logged_in = Kind::new("LoggedIn");
//! let routes = declare!("report", "home").default("home").build().unwrap();
//! let session = declare!("anonymous", &logged_in).build().unwrap();
//!
//! let mut store = session
//!     .init(logged_in.wrap(record! {
//!         "token" => "DEADBEEF",
//!         "route" => routes.init("report").unwrap(),
//!     }))
//!     .unwrap();
//!
//! // "login" is not a route of a logged-in session, so the nested
//! // machine falls back to its default.
//! store.update(record! { "route" => "login" }).unwrap();
//!
//! let route = store
//!     .when(&logged_in, |s| s.field("route").and_then(Value::as_machine).map(|m| m.is("home")))
//!     .collect()
//!     .flatten();
//! assert_eq!(route, Some(true));
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod intersection;

// Re-export commonly used types
pub use crate::builder::{BuildError, KindBuilder};
pub use crate::core::{Kind, MachineKind, StateError, StateMachine, Value, Variant};
pub use crate::intersection::{intersect, Intersection};
