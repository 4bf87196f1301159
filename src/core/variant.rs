//! Variant descriptors and classification.

use super::transitions::TransitionTable;
use super::value::{Kind, Scalar, Value};
use std::fmt;

/// One declared shape a state value may take.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// The variant is the constant itself.
    Scalar(Scalar),
    /// Any wrapper built through this kind.
    Kind(Kind),
}

impl Variant {
    /// Whether `value` is of this variant: equality for scalars, kind identity for wrappers.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Scalar(expected), Value::Scalar(actual)) => expected == actual,
            (Self::Kind(kind), Value::Wrapped(wrapper)) => wrapper.kind() == kind,
            _ => false,
        }
    }

    /// The variant a value would be declared as, if it has one.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Scalar(s) => Some(Self::Scalar(s.clone())),
            Value::Wrapped(w) => Some(Self::Kind(w.kind().clone())),
            Value::Record(_) | Value::Machine(_) => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => s.fmt(f),
            Self::Kind(k) => f.write_str(k.name()),
        }
    }
}

impl From<Scalar> for Variant {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Kind> for Variant {
    fn from(value: Kind) -> Self {
        Self::Kind(value)
    }
}

impl From<&Kind> for Variant {
    fn from(value: &Kind) -> Self {
        Self::Kind(value.clone())
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Self::Scalar(value.into())
    }
}

/// The fixed configuration shared by every machine of one kind.
///
/// Built once through [`KindBuilder`](crate::builder::KindBuilder) and
/// immutable afterwards. Variants are guaranteed distinct, so
/// classification is unambiguous.
#[derive(Debug, PartialEq)]
pub struct Declaration {
    pub(crate) variants: Vec<Variant>,
    pub(crate) transitions: TransitionTable,
    pub(crate) default: Option<Value>,
}

impl Declaration {
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn variant(&self, index: usize) -> Option<&Variant> {
        self.variants.get(index)
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Index of the declared variant `value` belongs to.
    pub fn classify(&self, value: &Value) -> Option<usize> {
        self.variants.iter().position(|v| v.matches(value))
    }

    /// Index of a declared variant descriptor.
    pub fn position(&self, variant: &Variant) -> Option<usize> {
        self.variants.iter().position(|v| v == variant)
    }
}
