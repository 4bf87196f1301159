//! Transition legality between declared variants.
//!
//! Variants are referred to by their index in the declaration. The table
//! is resolved once when a kind is built, so checks are plain lookups.

use std::collections::BTreeSet;

/// Optional transition graph plus optional set of legal initial variants.
///
/// An absent graph allows every move between declared variants, and an
/// absent initial set allows every first assignment. When a graph is
/// present, a source variant with no entry has no legal successors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionTable {
    edges: Option<Vec<BTreeSet<usize>>>,
    initial: Option<BTreeSet<usize>>,
}

impl TransitionTable {
    /// A table over `variant_count` variants with no edges yet.
    pub(crate) fn with_graph(variant_count: usize) -> Self {
        Self {
            edges: Some(vec![BTreeSet::new(); variant_count]),
            initial: None,
        }
    }

    pub(crate) fn allow(&mut self, from: usize, to: usize) {
        if let Some(targets) = self.edges.as_mut().and_then(|edges| edges.get_mut(from)) {
            targets.insert(to);
        }
    }

    pub(crate) fn restrict_initial(&mut self, allowed: BTreeSet<usize>) {
        self.initial = Some(allowed);
    }

    pub fn has_graph(&self) -> bool {
        self.edges.is_some()
    }

    pub fn initial_set(&self) -> Option<&BTreeSet<usize>> {
        self.initial.as_ref()
    }

    /// Whether `to` may be the very first value of a machine.
    pub fn initial_allowed(&self, to: usize) -> bool {
        self.initial.as_ref().is_none_or(|allowed| allowed.contains(&to))
    }

    /// Whether a machine holding `from` may move to `to`.
    pub fn transition_allowed(&self, from: usize, to: usize) -> bool {
        match &self.edges {
            None => true,
            Some(edges) => edges.get(from).is_some_and(|targets| targets.contains(&to)),
        }
    }

    /// Successors of `from`, or `None` when every move is legal.
    pub fn successors(&self, from: usize) -> Option<impl Iterator<Item = usize> + '_> {
        self.edges
            .as_ref()
            .map(move |edges| edges.get(from).into_iter().flatten().copied())
    }
}
