//! Builder for machine kinds.

use crate::builder::error::BuildError;
use crate::core::{Declaration, MachineKind, TransitionTable, Value, Variant};
use std::collections::BTreeSet;

/// Builder for declaring a machine kind with a fluent API.
///
/// Configuration happens here, before any machine exists. The resulting
/// [`MachineKind`] is immutable.
#[derive(Debug, Clone)]
pub struct KindBuilder {
    variants: Vec<Variant>,
    edges: Option<Vec<(Variant, Vec<Variant>)>>,
    initial: Option<Vec<Variant>>,
    default: Option<Value>,
}

impl KindBuilder {
    /// Create a builder over an ordered list of variants.
    pub fn new(variants: Vec<Variant>) -> Self {
        Self {
            variants,
            edges: None,
            initial: None,
            default: None,
        }
    }

    /// Allow moves from `from` to each of `to`.
    ///
    /// The first call turns on transition checking: from then on, only
    /// listed moves are legal.
    pub fn transition<F, I, T>(mut self, from: F, to: I) -> Self
    where
        F: Into<Variant>,
        I: IntoIterator<Item = T>,
        T: Into<Variant>,
    {
        self.edges
            .get_or_insert_with(Vec::new)
            .push((from.into(), to.into_iter().map(Into::into).collect()));
        self
    }

    /// Turn on transition checking without allowing any move yet.
    ///
    /// Only moves later added with [`transition`](Self::transition) are legal.
    pub fn strict(mut self) -> Self {
        self.edges.get_or_insert_with(Vec::new);
        self
    }

    /// Restrict which variants a machine may start in.
    pub fn initial<I, T>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Variant>,
    {
        self.initial = Some(variants.into_iter().map(Into::into).collect());
        self
    }

    /// Value to fall back to when a requested value is rejected.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Build the machine kind.
    /// Returns an error if the declaration is ambiguous or refers to undeclared variants.
    pub fn build(self) -> Result<MachineKind, BuildError> {
        if self.variants.is_empty() {
            return Err(BuildError::NoVariants);
        }

        for (i, variant) in self.variants.iter().enumerate() {
            if self.variants[..i].contains(variant) {
                return Err(BuildError::DuplicateVariant(variant.to_string()));
            }
        }

        let position = |variant: &Variant| {
            self.variants
                .iter()
                .position(|v| v == variant)
                .ok_or_else(|| BuildError::UndeclaredVariant(variant.to_string()))
        };

        let mut table = match &self.edges {
            None => TransitionTable::default(),
            Some(edges) => {
                let mut table = TransitionTable::with_graph(self.variants.len());
                for (from, targets) in edges {
                    let from = position(from)?;
                    for to in targets {
                        table.allow(from, position(to)?);
                    }
                }
                table
            }
        };

        if let Some(initial) = &self.initial {
            let allowed = initial
                .iter()
                .map(position)
                .collect::<Result<BTreeSet<_>, _>>()?;
            table.restrict_initial(allowed);
        }

        if let Some(default) = &self.default {
            if !self.variants.iter().any(|v| v.matches(default)) {
                return Err(BuildError::UndeclaredDefault(default.type_name()));
            }
        }

        Ok(MachineKind::new(Declaration {
            variants: self.variants,
            transitions: table,
            default: self.default,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Kind;
    use crate::declare;

    #[test]
    fn builder_requires_variants() {
        let result = KindBuilder::new(Vec::new()).build();

        assert!(matches!(result, Err(BuildError::NoVariants)));
    }

    #[test]
    fn builder_rejects_duplicate_variants() {
        let result = declare!("a", "b", "a").build();

        assert_eq!(result.unwrap_err(), BuildError::DuplicateVariant("a".to_string()));
    }

    #[test]
    fn same_named_kinds_are_not_duplicates() {
        let result = declare!(Kind::new("Ok"), Kind::new("Ok")).build();

        assert!(result.is_ok());
    }

    #[test]
    fn builder_rejects_undeclared_transition_targets() {
        let result = declare!("a", "b").transition("a", ["c"]).build();

        assert_eq!(result.unwrap_err(), BuildError::UndeclaredVariant("c".to_string()));
    }

    #[test]
    fn builder_rejects_undeclared_initial_variants() {
        let result = declare!(1, 2).initial([3]).build();

        assert_eq!(result.unwrap_err(), BuildError::UndeclaredVariant("3".to_string()));
    }

    #[test]
    fn builder_rejects_undeclared_default() {
        let result = declare!("a", "b").default("c").build();

        assert_eq!(result.unwrap_err(), BuildError::UndeclaredDefault("c".to_string()));
    }

    #[test]
    fn builder_resolves_transitions_to_indices() {
        let kind = declare!("loading", "loaded", "unloading")
            .transition("loading", ["loaded"])
            .transition("loaded", ["unloading"])
            .build()
            .unwrap();

        let table = kind.declaration().transitions();
        assert!(table.has_graph());
        assert!(table.transition_allowed(0, 1));
        assert!(table.transition_allowed(1, 2));
        assert!(!table.transition_allowed(2, 0));
        assert!(table.initial_allowed(2));
    }

    #[test]
    fn repeated_sources_accumulate() {
        let kind = declare!(1, 2, 3)
            .transition(1, [2])
            .transition(1, [3])
            .build()
            .unwrap();

        let table = kind.declaration().transitions();
        assert!(table.transition_allowed(0, 1));
        assert!(table.transition_allowed(0, 2));
    }

    #[test]
    fn strict_without_edges_forbids_moves() {
        let kind = declare!("a", "b").strict().build().unwrap();
        let mut state = kind.init("a").unwrap();

        assert!(kind.declaration().transitions().has_graph());
        assert!(state.set("b").is_err());
        assert!(state.set("a").is_err());
    }

    #[test]
    fn default_is_kept_on_declaration() {
        let kind = declare!("a", "b").default("b").build().unwrap();

        assert_eq!(kind.declaration().default_value(), Some(&Value::from("b")));
    }
}
