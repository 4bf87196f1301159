//! State machines over a declared set of variants.

use super::error::StateError;
use super::variant::{Declaration, Variant};
use super::value::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A constructible kind of state machine, bound to one declaration.
///
/// Produced by [`KindBuilder::build`](crate::builder::KindBuilder::build).
/// Cloning is cheap and every clone shares the same declaration.
#[derive(Clone, Debug)]
pub struct MachineKind {
    decl: Arc<Declaration>,
}

impl MachineKind {
    pub(crate) fn new(decl: Declaration) -> Self {
        Self {
            decl: Arc::new(decl),
        }
    }

    pub fn declaration(&self) -> &Declaration {
        &self.decl
    }

    /// Create a machine without an explicit initial value.
    ///
    /// The machine starts at the declared default when there is one, and
    /// stays unset otherwise.
    pub fn create(&self) -> Result<StateMachine, StateError> {
        let mut machine = StateMachine {
            decl: Arc::clone(&self.decl),
            current: None,
        };
        if let Some(default) = self.decl.default_value() {
            machine.set(default.clone())?;
        }
        Ok(machine)
    }

    /// Create a machine holding `initial`, validated exactly like [`StateMachine::set`].
    pub fn init(&self, initial: impl Into<Value>) -> Result<StateMachine, StateError> {
        let mut machine = StateMachine {
            decl: Arc::clone(&self.decl),
            current: None,
        };
        machine.set(initial)?;
        Ok(machine)
    }
}

/// A value that is always exactly one of its declared variants.
///
/// The machine is either unset or holds a value whose variant is declared.
/// Moving between values is gated by the declaration's transition table;
/// rejected values fall back to the declared default when there is one.
///
/// # Example
///
/// ```rust
/// use variantstate::declare;
///
/// let loading = declare!("loading", "loaded", "unloading")
///     .transition("loading", ["loaded"])
///     .transition("loaded", ["unloading"])
///     .build()
///     .unwrap();
///
/// let mut state = loading.init("loaded").unwrap();
/// state.set("unloading").unwrap();
///
/// assert!(state.is("unloading"));
/// assert!(state.set("loading").is_err());
/// ```
#[derive(Clone)]
pub struct StateMachine {
    decl: Arc<Declaration>,
    current: Option<Value>,
}

impl StateMachine {
    pub fn kind(&self) -> MachineKind {
        MachineKind {
            decl: Arc::clone(&self.decl),
        }
    }

    pub fn declaration(&self) -> &Declaration {
        &self.decl
    }

    /// The value currently held.
    pub fn value(&self) -> Option<&Value> {
        self.current.as_ref()
    }

    /// Declaration index of the current value.
    pub fn index(&self) -> Option<usize> {
        self.current.as_ref().and_then(|v| self.decl.classify(v))
    }

    /// The declared variant the current value belongs to.
    pub fn get(&self) -> Option<&Variant> {
        self.index().and_then(|i| self.decl.variant(i))
    }

    /// Whether the current value is of `variant`.
    pub fn is(&self, variant: impl Into<Variant>) -> bool {
        let variant = variant.into();
        self.current.as_ref().is_some_and(|v| variant.matches(v))
    }

    /// Project the current value through `f`, unwrapping one level of wrapper.
    pub fn map<R>(&self, f: impl FnOnce(&Value) -> R) -> Option<R> {
        match self.current.as_ref()? {
            Value::Wrapped(wrapper) => Some(wrapper.map(f)),
            other => Some(f(other)),
        }
    }

    /// Project the current value only if it is of `variant`.
    pub fn when<R>(&self, variant: impl Into<Variant>, f: impl FnOnce(&Value) -> R) -> When<'_, R> {
        if self.is(variant) {
            if let Some(projected) = self.map(f) {
                return When::Matched(projected);
            }
        }
        When::Unmatched(self)
    }

    /// Start a chain of projections with no branch tried yet.
    pub fn branches<R>(&self) -> When<'_, R> {
        When::Unmatched(self)
    }

    /// Collect without selecting any branch, which always yields `fallback`.
    pub fn collect_or<R>(&self, fallback: R) -> R {
        self.branches().collect_or(fallback)
    }

    /// Classify and validate `candidate` against the current value.
    ///
    /// Returns the declaration index `candidate` would occupy. No default
    /// is consulted.
    pub fn check(&self, candidate: &Value) -> Result<usize, StateError> {
        let to = self
            .decl
            .classify(candidate)
            .ok_or_else(|| StateError::IllegalArgument {
                value: candidate.type_name(),
            })?;

        let legal = match self.index() {
            None => self.decl.transitions().initial_allowed(to),
            Some(from) => self.decl.transitions().transition_allowed(from, to),
        };

        if legal {
            Ok(to)
        } else {
            Err(StateError::IllegalTransition {
                from: self.describe(),
                to: candidate.type_name(),
            })
        }
    }

    /// Whether `set(candidate)` would succeed without falling back to the default.
    pub fn allowed(&self, candidate: impl Into<Value>) -> bool {
        self.check(&candidate.into()).is_ok()
    }

    /// Move to `candidate`.
    ///
    /// A rejected candidate is replaced by the declared default, which is
    /// then validated as a fresh candidate. The machine only changes once a
    /// value has passed validation. When the rejected candidate already is
    /// the default, the original rejection is returned.
    pub fn set(&mut self, candidate: impl Into<Value>) -> Result<&mut Self, StateError> {
        let candidate = candidate.into();
        let next = match self.check(&candidate) {
            Ok(_) => candidate,
            Err(rejection) => self.rescue(&candidate, rejection)?,
        };

        trace!(from = %self.describe(), to = %next.type_name(), "committing state");
        self.current = Some(next);
        Ok(self)
    }

    fn rescue(&self, rejected: &Value, rejection: StateError) -> Result<Value, StateError> {
        let Some(default) = self.decl.default_value() else {
            return Err(rejection);
        };
        if default == rejected {
            return Err(rejection);
        }

        debug!(
            rejected = %rejected.type_name(),
            default = %default.type_name(),
            reason = %rejection,
            "falling back to default"
        );
        self.check(default)?;
        Ok(default.clone())
    }

    /// Partially update the current value.
    ///
    /// Non-record deltas behave like [`set`](Self::set). Record deltas are
    /// merged into the payload of the current wrapper value; a scalar value
    /// has no fields, so any key is unknown.
    pub fn update(&mut self, delta: impl Into<Value>) -> Result<&mut Self, StateError> {
        match delta.into() {
            Value::Record(changes) => match self.current.as_mut() {
                Some(Value::Wrapped(wrapper)) => {
                    wrapper.update(Value::Record(changes))?;
                }
                _ => {
                    if let Some(field) = changes.into_keys().next() {
                        return Err(StateError::UnknownField { field });
                    }
                }
            },
            other => {
                self.set(other)?;
            }
        }
        Ok(self)
    }

    fn describe(&self) -> String {
        self.current
            .as_ref()
            .map_or_else(|| "<unset>".to_string(), Value::type_name)
    }
}

impl PartialEq for StateMachine {
    /// Machines are equal when they share a declaration and hold equal values.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.decl, &other.decl) && self.current == other.current
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("variants", &self.decl.variants())
            .field("current", &self.current)
            .finish()
    }
}

/// Outcome of a chain of [`StateMachine::when`] projections.
#[derive(Debug)]
pub enum When<'a, R> {
    /// No branch has matched yet.
    Unmatched(&'a StateMachine),
    /// A branch matched and produced this value.
    Matched(R),
}

impl<'a, R> When<'a, R> {
    /// Try another branch. A chain that already matched is left alone.
    pub fn when(self, variant: impl Into<Variant>, f: impl FnOnce(&Value) -> R) -> Self {
        match self {
            Self::Unmatched(machine) => machine.when(variant, f),
            matched => matched,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    pub fn collect(self) -> Option<R> {
        match self {
            Self::Matched(value) => Some(value),
            Self::Unmatched(_) => None,
        }
    }

    pub fn collect_or(self, fallback: R) -> R {
        self.collect().unwrap_or(fallback)
    }

    pub fn collect_or_else(self, fallback: impl FnOnce() -> R) -> R {
        self.collect().unwrap_or_else(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Kind;
    use crate::declare;

    #[test]
    fn plain_values_switch_freely() {
        let kind = declare!("loading", "loaded", "unloading").build().unwrap();
        let mut state = kind.init("loading").unwrap();

        state.set("loaded").unwrap();

        assert_eq!(state.get(), Some(&Variant::from("loaded")));
    }

    #[test]
    fn wrapper_values_report_their_kind() {
        let ok = Kind::new("OkState");
        let err = Kind::new("ErrorState");
        let kind = declare!("loading", &ok, &err).build().unwrap();
        let mut state = kind.init("loading").unwrap();

        state.set(ok.wrap("all good")).unwrap();

        assert_eq!(state.get(), Some(&Variant::Kind(ok.clone())));
        assert!(state.is(&ok));
        assert!(!state.is(&err));
        assert!(!state.is(&Kind::new("OkState")));
    }

    #[test]
    fn undeclared_values_are_rejected() {
        let ok = Kind::new("OkState");
        let err = Kind::new("ErrorState");
        let kind = declare!("loading", &ok).build().unwrap();
        let mut state = kind.init("loading").unwrap();

        let result = state.set(err.wrap("loading failed"));
        assert!(matches!(result, Err(StateError::IllegalArgument { value }) if value == "ErrorState"));

        let result = state.set(Value::record([("message", Value::from("boom"))]));
        assert!(matches!(result, Err(StateError::IllegalArgument { .. })));
        assert!(state.is("loading"));
    }

    #[test]
    fn kinds_do_not_share_variants() {
        let first = declare!("loading", "loaded").build().unwrap();
        let second = declare!("loading", "complete").build().unwrap();
        let mut a = first.init("loading").unwrap();
        let mut b = second.init("loading").unwrap();

        a.set("loaded").unwrap();

        assert!(a.is("loaded"));
        assert!(b.set("loaded").is_err());
    }

    #[test]
    fn transitions_reject_illegal_moves() {
        let kind = declare!("loading", "loaded", "unloading")
            .transition("loading", ["loaded"])
            .transition("loaded", ["unloading"])
            .build()
            .unwrap();
        let mut state = kind.init("loaded").unwrap();

        state.set("unloading").unwrap();
        assert!(state.is("unloading"));

        let result = state.set("loading");
        assert!(matches!(
            result,
            Err(StateError::IllegalTransition { from, to }) if from == "unloading" && to == "loading"
        ));
        assert!(state.is("unloading"));
    }

    #[test]
    fn transitions_work_for_wrapper_kinds() {
        let ok = Kind::new("OkState");
        let err = Kind::new("ErrorState");
        let exception = Kind::new("ExceptionState");
        let kind = declare!(&ok, &err, &exception)
            .transition(&ok, [&err, &exception])
            .transition(&err, [&ok, &exception])
            .build()
            .unwrap();
        let mut state = kind.init(ok.wrap(200)).unwrap();

        state.set(exception.wrap("unrecoverable error")).unwrap();
        let message = state
            .when(&exception, |payload| payload.as_str().map(str::to_string))
            .collect()
            .flatten();
        assert_eq!(message.as_deref(), Some("unrecoverable error"));

        assert!(state.set(err.wrap(500)).is_err());
        assert!(state.is(&exception));
    }

    #[test]
    fn transitions_work_for_numbers() {
        let kind = declare!(1, 2, 3)
            .transition(1, [2, 3])
            .transition(2, [1, 3])
            .build()
            .unwrap();
        let mut state = kind.init(1).unwrap();

        state.set(3).unwrap();
        assert_eq!(state.get(), Some(&Variant::from(3)));

        assert!(state.set(2).is_err());
        assert!(state.is(3));
    }

    #[test]
    fn illegal_initial_value_falls_back_to_default() {
        let kind = declare!(1, 2, 3)
            .transition(1, [2, 3])
            .initial([1, 2])
            .default(1)
            .build()
            .unwrap();

        let state = kind.init(3).unwrap();

        assert!(state.is(1));
    }

    #[test]
    fn unreachable_default_fails_construction() {
        let kind = declare!(1, 2, 3)
            .transition(1, [2, 3])
            .initial([2])
            .default(1)
            .build()
            .unwrap();

        let result = kind.init(3);

        assert!(matches!(result, Err(StateError::IllegalTransition { .. })));
    }

    #[test]
    fn rejected_default_returns_original_error() {
        let kind = declare!("a", "b")
            .transition("b", ["a"])
            .default("a")
            .build()
            .unwrap();
        let mut state = kind.init("a").unwrap();

        // Holding "a", the default itself is illegal: no rescue is attempted.
        let result = state.set("a");

        assert!(matches!(
            result,
            Err(StateError::IllegalTransition { from, to }) if from == "a" && to == "a"
        ));
        assert!(state.is("a"));
    }

    #[test]
    fn create_uses_default() {
        let kind = declare!("a", "b", 3).default(3).build().unwrap();

        let state = kind.create().unwrap();

        assert!(state.is(3));
    }

    #[test]
    fn create_without_default_is_unset() {
        let kind = declare!("a", "b").build().unwrap();

        let mut state = kind.create().unwrap();

        assert_eq!(state.get(), None);
        assert_eq!(state.value(), None);
        state.set("b").unwrap();
        assert!(state.is("b"));
    }

    #[test]
    fn default_rescues_undeclared_values() {
        let kind = declare!("logout", "login", "home")
            .default("login")
            .build()
            .unwrap();
        let mut state = kind.init("home").unwrap();

        state.set("report").unwrap();

        assert!(state.is("login"));
    }

    #[test]
    fn allowed_ignores_default() {
        let kind = declare!("a", "b", "c")
            .transition("a", ["b"])
            .default("a")
            .build()
            .unwrap();
        let state = kind.init("a").unwrap();

        assert!(state.allowed("b"));
        assert!(!state.allowed("c"));
        assert!(!state.allowed("zzz"));
    }

    #[test]
    fn update_with_scalar_sets() {
        let kind = declare!("a", "b").build().unwrap();
        let mut state = kind.init("a").unwrap();

        state.update("b").unwrap();

        assert!(state.is("b"));
    }

    #[test]
    fn update_record_on_scalar_is_unknown_field() {
        let kind = declare!("a", "b").build().unwrap();
        let mut state = kind.init("a").unwrap();

        let result = state.update(Value::record([("anything", Value::from(1))]));

        assert!(matches!(result, Err(StateError::UnknownField { field }) if field == "anything"));
        assert!(state.is("a"));
    }

    #[test]
    fn update_merges_into_wrapper() {
        let session = Kind::new("Session");
        let kind = declare!("anonymous", &session).build().unwrap();
        let mut state = kind
            .init(session.wrap(Value::record([
                ("token", Value::from("A")),
                ("visits", Value::from(1)),
            ])))
            .unwrap();

        state.update(Value::record([("visits", Value::from(2))])).unwrap();

        let visits = state.map(|payload| payload.field("visits").cloned()).flatten();
        assert_eq!(visits, Some(Value::from(2)));
        assert!(state.is(&session));
    }

    #[test]
    fn when_collects_selected_branch() {
        let kind = declare!("loading", "loaded", "unloading").build().unwrap();
        let state = kind.init("loaded").unwrap();

        let collected = state
            .when("loading", |_| panic!("loading branch should not run"))
            .when("loaded", |_| "visited")
            .when("unloading", |_| panic!("unloading branch should not run"))
            .collect();

        assert_eq!(collected, Some("visited"));
    }

    #[test]
    fn when_falls_back_when_nothing_matches() {
        let kind = declare!("loading", "loaded", "unloading").build().unwrap();
        let state = kind.init("loaded").unwrap();

        let collected = state
            .when("loading", |_| "loading")
            .when("unloading", |_| "unloading")
            .collect_or("postdef");

        assert_eq!(collected, "postdef");
        assert!(!state.when("loading", |_| ()).is_matched());
    }

    #[test]
    fn collect_without_branches_yields_fallback() {
        let kind = declare!("loading", "loaded", "unloading").build().unwrap();
        let state = kind.init("loaded").unwrap();

        assert_eq!(state.collect_or("predef"), "predef");
        assert_eq!(
            state.branches().when("loaded", |_| "visited").collect(),
            Some("visited")
        );
    }

    #[test]
    fn map_unwraps_one_level() {
        let ok = Kind::new("Ok");
        let kind = declare!("idle", &ok).build().unwrap();
        let mut state = kind.init("idle").unwrap();

        assert_eq!(state.map(Value::type_name), Some("idle".to_string()));

        state.set(ok.wrap(42)).unwrap();
        assert_eq!(state.map(Value::clone), Some(Value::from(42)));
    }

    #[test]
    fn machines_compare_by_declaration_and_value() {
        let kind = declare!("a", "b").build().unwrap();
        let twin = declare!("a", "b").build().unwrap();

        assert_eq!(kind.init("a").unwrap(), kind.init("a").unwrap());
        assert_ne!(kind.init("a").unwrap(), kind.init("b").unwrap());
        assert_ne!(kind.init("a").unwrap(), twin.init("a").unwrap());
    }
}
