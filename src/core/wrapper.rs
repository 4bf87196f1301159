//! Payload-holding values built through a [`Kind`].

use super::error::StateError;
use super::value::{Kind, Value};

/// A value of a declared wrapper kind.
///
/// The wrapper owns its payload outright. Updates are merged into a staged
/// copy and only swapped in once every field has been accepted, so a
/// failed update leaves the payload as it was.
#[derive(Clone, Debug, PartialEq)]
pub struct Wrapper {
    kind: Kind,
    payload: Box<Value>,
}

impl Wrapper {
    pub fn new(kind: Kind, payload: Value) -> Self {
        Self {
            kind,
            payload: Box::new(payload),
        }
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn value(&self) -> &Value {
        &self.payload
    }

    pub fn into_value(self) -> Value {
        *self.payload
    }

    pub fn map<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&self.payload)
    }

    /// Update the payload in place.
    ///
    /// - A record delta merges into a record payload key by key. Every key
    ///   must already exist; nested machines receive their field's delta
    ///   through their own `update`.
    /// - Any other delta replaces the payload, or is delegated when the
    ///   payload is itself a machine.
    pub fn update(&mut self, delta: impl Into<Value>) -> Result<&mut Self, StateError> {
        let mut staged = (*self.payload).clone();
        staged.apply(delta.into())?;
        *self.payload = staged;
        Ok(self)
    }
}
