//! Builder for intersections.

use super::subscription::Listeners;
use super::{Intersection, Member};
use crate::builder::BuildError;
use crate::core::{StateError, StateMachine, Value};
use tracing::debug;

/// Start an intersection over named member machines.
///
/// # Example
///
/// ```
/// use variantstate::declare;
/// use variantstate::intersection::intersect;
///
/// let even = declare!(2, 4, 6, 8).default(6).build().unwrap();
/// let small = declare!(1, 2, 3, 4).default(3).build().unwrap();
///
/// let mut both = intersect([
///     ("even", even.init(2).unwrap()),
///     ("small", small.init(2).unwrap()),
/// ])
/// .default(4)
/// .create()
/// .unwrap();
///
/// both.set(10).unwrap();
/// assert!(both.is(4));
/// ```
pub fn intersect<I, K>(members: I) -> IntersectionBuilder
where
    I: IntoIterator<Item = (K, StateMachine)>,
    K: Into<String>,
{
    IntersectionBuilder {
        members: members
            .into_iter()
            .map(|(name, machine)| Member {
                name: name.into(),
                machine,
            })
            .collect(),
        default: None,
    }
}

/// Builder for an [`Intersection`].
#[derive(Debug)]
pub struct IntersectionBuilder {
    members: Vec<Member>,
    default: Option<Value>,
}

impl IntersectionBuilder {
    /// Value every member is forced to when no mutual value can be found.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Build the intersection from the members as they are.
    ///
    /// Every member must currently hold the same variant as the first one.
    pub fn create(self) -> Result<Intersection, StateError> {
        let intersection = self.assemble()?;

        let mut members = intersection.members.iter();
        if let Some(first) = members.next() {
            let expected = first.machine.get();
            for member in members {
                let found = member.machine.get();
                if found != expected {
                    return Err(StateError::InconsistentInitialState {
                        member: member.name.clone(),
                        found: describe(found),
                        expected: describe(expected),
                    });
                }
            }
        }

        debug!(members = intersection.len(), "created intersection");
        Ok(intersection)
    }

    /// Build the intersection and drive every member to `initial`.
    pub fn init(self, initial: impl Into<Value>) -> Result<Intersection, StateError> {
        let mut intersection = self.assemble()?;
        intersection.set(initial)?;
        debug!(members = intersection.len(), "created intersection");
        Ok(intersection)
    }

    fn assemble(self) -> Result<Intersection, StateError> {
        if self.members.is_empty() {
            return Err(BuildError::NoMembers.into());
        }
        for (i, member) in self.members.iter().enumerate() {
            if self.members[..i].iter().any(|m| m.name == member.name) {
                return Err(BuildError::DuplicateMember(member.name.clone()).into());
            }
        }

        Ok(Intersection {
            members: self.members,
            default: self.default,
            listeners: Listeners::default(),
        })
    }
}

fn describe(variant: Option<&crate::core::Variant>) -> String {
    variant.map_or_else(|| "<unset>".to_string(), ToString::to_string)
}
