//! Loading scalar declarations from configuration.
//!
//! Only the declaration is configured this way: variants, transition
//! table, initial set and default. Machine state itself never passes
//! through serde.
//!
//! ```json
//! {
//!   "variants": ["loading", "loaded", "unloading"],
//!   "transitions": [
//!     { "from": "loading", "to": ["loaded"] },
//!     { "from": "loaded", "to": ["unloading"] }
//!   ],
//!   "initial": ["loading"],
//!   "default": "loading"
//! }
//! ```

pub mod error;

pub use error::ConfigError;

use crate::builder::KindBuilder;
use crate::core::{MachineKind, Scalar, Variant};
use serde::{Deserialize, Serialize};

/// Serializable declaration of a scalar-only machine kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationConfig {
    pub variants: Vec<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Vec<TransitionConfig>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<Vec<Scalar>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Scalar>,
}

/// Legal moves out of one variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionConfig {
    pub from: Scalar,
    pub to: Vec<Scalar>,
}

impl DeclarationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Turn the configuration into a builder, for further tweaking before `build()`.
    pub fn into_builder(self) -> KindBuilder {
        let mut builder = KindBuilder::new(self.variants.into_iter().map(Variant::from).collect());

        if let Some(transitions) = self.transitions {
            // An explicit empty table still forbids every move.
            builder = builder.strict();
            for TransitionConfig { from, to } in transitions {
                builder = builder.transition(from, to);
            }
        }
        if let Some(initial) = self.initial {
            builder = builder.initial(initial);
        }
        if let Some(default) = self.default {
            builder = builder.default(default);
        }
        builder
    }

    pub fn build(self) -> Result<MachineKind, ConfigError> {
        Ok(self.into_builder().build()?)
    }
}
