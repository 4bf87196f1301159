//! Values held by state machines.
//!
//! A [`Value`] is anything a caller can hand to a machine: a plain
//! [`Scalar`], a record of named fields, a nested [`StateMachine`], or a
//! [`Wrapper`] built through a nominal [`Kind`]. Only scalars and wrappers
//! can ever classify against a declaration.

use super::error::StateError;
use super::machine::StateMachine;
use super::wrapper::Wrapper;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_KIND_ID: AtomicU64 = AtomicU64::new(0);

/// A comparable constant: the variant *is* the value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A named, payload-holding kind matched by identity rather than structure.
///
/// Every call to [`Kind::new`] produces a distinct kind, even when the names
/// collide. Clones share the identity of the original.
///
/// # Example
///
/// ```rust
/// use variantstate::core::Kind;
///
/// let ok = Kind::new("Ok");
/// let other_ok = Kind::new("Ok");
///
/// assert_eq!(ok, ok.clone());
/// assert_ne!(ok, other_ok);
/// ```
#[derive(Clone)]
pub struct Kind {
    id: u64,
    name: Arc<str>,
}

impl Kind {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            id: NEXT_KIND_ID.fetch_add(1, Ordering::Relaxed),
            name: Arc::from(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build an instance of this kind around `payload`. The payload is stored as-is.
    pub fn wrap(&self, payload: impl Into<Value>) -> Value {
        Value::Wrapped(Wrapper::new(self.clone(), payload.into()))
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({}#{})", self.name, self.id)
    }
}

/// Anything a state machine can be asked to hold.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Record(BTreeMap<String, Value>),
    Machine(Box<StateMachine>),
    Wrapped(Wrapper),
}

impl Value {
    /// Build a record from `(field, value)` pairs.
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_machine(&self) -> Option<&StateMachine> {
        match self {
            Self::Machine(m) => Some(&**m),
            _ => None,
        }
    }

    pub fn as_wrapper(&self) -> Option<&Wrapper> {
        match self {
            Self::Wrapped(w) => Some(w),
            _ => None,
        }
    }

    /// Look up a field of a record value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Diagnostic label: the kind name for wrappers, the value itself for scalars.
    pub fn type_name(&self) -> String {
        match self {
            Self::Scalar(s) => s.to_string(),
            Self::Record(_) => "record".to_string(),
            Self::Machine(_) => "state machine".to_string(),
            Self::Wrapped(w) => w.kind().name().to_string(),
        }
    }

    /// Apply an update delta in place.
    ///
    /// Record deltas merge into record values field by field; unknown fields
    /// are rejected. Nested machines receive their delta through
    /// [`StateMachine::update`]. Any other delta replaces the value.
    pub(crate) fn apply(&mut self, delta: Value) -> Result<(), StateError> {
        match (self, delta) {
            (Value::Machine(machine), delta) => {
                machine.update(delta)?;
            }
            (Value::Record(fields), Value::Record(changes)) => {
                if let Some(field) = changes.keys().find(|k| !fields.contains_key(*k)) {
                    return Err(StateError::UnknownField {
                        field: field.clone(),
                    });
                }
                for (key, change) in changes {
                    let Some(slot) = fields.get_mut(&key) else {
                        return Err(StateError::UnknownField { field: key });
                    };
                    match slot {
                        Value::Machine(machine) => {
                            machine.update(change)?;
                        }
                        slot => *slot = change,
                    }
                }
            }
            (_, Value::Record(changes)) => {
                // Scalars and wrappers expose no fields of their own.
                if let Some(field) = changes.into_keys().next() {
                    return Err(StateError::UnknownField { field });
                }
            }
            (slot, replacement) => *slot = replacement,
        }
        Ok(())
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<StateMachine> for Value {
    fn from(value: StateMachine) -> Self {
        Self::Machine(Box::new(value))
    }
}

impl From<Wrapper> for Value {
    fn from(value: Wrapper) -> Self {
        Self::Wrapped(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Record(value)
    }
}
