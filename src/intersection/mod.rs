//! Intersections of independent state machines.
//!
//! An [`Intersection`] owns several named machines that must always report
//! one mutually agreed value. Every write is proposed to each member in
//! turn; when a member redirects the value to its own default, the redirect
//! becomes the new proposal and the pass restarts. With `k` members the
//! search gives up after `k + 1` rounds and falls back to the
//! intersection's default, if any.
//!
//! All members are staged on copies while the search runs. Nothing is
//! replaced, and no listener fires, unless the whole write succeeds.

mod builder;
mod subscription;

pub use builder::{intersect, IntersectionBuilder};
pub use subscription::SubscriptionId;

use crate::core::{Rejection, StateError, StateMachine, Value, Variant};
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use subscription::Listeners;
use tracing::{debug, trace, warn};

/// A named member of an intersection.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Member {
    pub(crate) name: String,
    pub(crate) machine: StateMachine,
}

/// Several state machines constrained to agree on one value.
pub struct Intersection {
    members: Vec<Member>,
    default: Option<Value>,
    listeners: Listeners,
}

impl Intersection {
    /// Number of member machines.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Look up a member machine by name.
    pub fn member(&self, name: &str) -> Option<&StateMachine> {
        self.members
            .iter()
            .find(|m| m.name == name)
            .map(|m| &m.machine)
    }

    /// Members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &StateMachine)> {
        self.members.iter().map(|m| (m.name.as_str(), &m.machine))
    }

    /// The joint value, read through the first member.
    pub fn value(&self) -> Option<&Value> {
        self.members.first().and_then(|m| m.machine.value())
    }

    /// The first member's declared variant for the joint value.
    pub fn get(&self) -> Option<&Variant> {
        self.members.first().and_then(|m| m.machine.get())
    }

    pub fn is(&self, variant: impl Into<Variant>) -> bool {
        let variant = variant.into();
        self.members
            .first()
            .is_some_and(|m| m.machine.is(variant))
    }

    /// Whether every member would accept `candidate` without a default.
    pub fn allowed(&self, candidate: impl Into<Value>) -> bool {
        let candidate = candidate.into();
        self.members.iter().all(|m| m.machine.check(&candidate).is_ok())
    }

    /// Collect every member's objection to `candidate`.
    ///
    /// Unlike [`allowed`](Self::allowed), this does not stop at the first
    /// rejecting member.
    pub fn check(&self, candidate: &Value) -> Validation<(), NonEmptyVec<Rejection>> {
        let checks: Vec<Validation<(), NonEmptyVec<Rejection>>> = self
            .members
            .iter()
            .map(|m| match m.machine.check(candidate) {
                Ok(_) => Validation::success(()),
                Err(error) => Validation::fail(Rejection {
                    member: m.name.clone(),
                    error,
                }),
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// Drive every member to a mutually accepted value derived from `candidate`.
    ///
    /// Listeners are notified with the committed value, even when it equals
    /// the value already held.
    pub fn set(&mut self, candidate: impl Into<Value>) -> Result<&mut Self, StateError> {
        self.commit(candidate.into())?;
        Ok(self)
    }

    /// Replace the member called `name` and re-run [`set`](Self::set).
    ///
    /// The new joint value is `value` when given, otherwise the joint value
    /// held before the swap, otherwise the new member's own value. If that
    /// write fails, the previous member is put back.
    pub fn reset(
        &mut self,
        name: &str,
        machine: StateMachine,
        value: Option<Value>,
    ) -> Result<&mut Self, StateError> {
        let position = self
            .members
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| StateError::UnknownMember(name.to_string()))?;

        // With no joint value yet, the incoming member's own value becomes the proposal.
        let candidate = value
            .or_else(|| self.value().cloned())
            .or_else(|| machine.value().cloned());
        let previous = std::mem::replace(&mut self.members[position].machine, machine);
        debug!(member = name, "replaced intersection member");

        let Some(candidate) = candidate else {
            return Ok(self);
        };
        if let Err(err) = self.commit(candidate) {
            self.members[position].machine = previous;
            return Err(err);
        }
        Ok(self)
    }

    /// Call `listener` with the committed value after every successful write.
    pub fn subscribe(&mut self, listener: impl FnMut(&Value) + 'static) -> SubscriptionId {
        self.listeners.add(Box::new(listener))
    }

    /// Detach a listener. Returns `false` if it was already detached.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    fn commit(&mut self, candidate: Value) -> Result<Value, StateError> {
        let (staged, value) = self.converge(candidate)?;
        for (member, machine) in self.members.iter_mut().zip(staged) {
            member.machine = machine;
        }

        trace!(value = %value.type_name(), "intersection committed");
        self.listeners.notify(&value);
        Ok(value)
    }

    fn converge(&self, requested: Value) -> Result<(Vec<StateMachine>, Value), StateError> {
        let mut staged = self.snapshot();
        let mut candidate = requested.clone();

        for round in 1..=self.members.len() + 1 {
            match propose(&mut staged, &candidate)? {
                None => return Ok((staged, candidate)),
                Some(redirect) => {
                    debug!(
                        round,
                        from = %candidate.type_name(),
                        to = %redirect.type_name(),
                        "member redirected candidate"
                    );
                    candidate = redirect;
                }
            }
        }

        let Some(default) = &self.default else {
            return Err(StateError::NoMutualState {
                value: requested.type_name(),
            });
        };
        warn!(
            requested = %requested.type_name(),
            default = %default.type_name(),
            "no mutual state, forcing intersection default"
        );

        let mut staged = self.snapshot();
        for (member, machine) in self.members.iter().zip(staged.iter_mut()) {
            let forced = machine
                .check(default)
                .and_then(|_| machine.set(default.clone()).map(|_| ()));
            if let Err(source) = forced {
                return Err(StateError::DefaultInvalid {
                    member: member.name.clone(),
                    value: default.type_name(),
                    source: Box::new(source),
                });
            }
        }
        Ok((staged, default.clone()))
    }

    fn snapshot(&self) -> Vec<StateMachine> {
        self.members.iter().map(|m| m.machine.clone()).collect()
    }
}

/// One consensus round: offer `candidate` to each staged member in order.
///
/// Returns the first redirect, or `None` when every member kept the candidate.
fn propose(staged: &mut [StateMachine], candidate: &Value) -> Result<Option<Value>, StateError> {
    for machine in staged.iter_mut() {
        machine.set(candidate.clone())?;
        if machine.value() != Some(candidate) {
            return Ok(machine.value().cloned());
        }
    }
    Ok(None)
}

impl fmt::Debug for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intersection")
            .field("members", &self.members)
            .field("default", &self.default)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
