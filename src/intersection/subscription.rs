//! Change listeners for intersections.

use crate::core::Value;

/// Handle returned by [`Intersection::subscribe`](super::Intersection::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Value)>;

/// Ordered listener registry. Listeners fire in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, value: &Value) {
        for (_, listener) in &mut self.entries {
            listener(value);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
