// EventDispatcher - synchronous fan-out of history notifications

use crate::command::action::EditorAction;
use crate::command::event::{ActionOrigin, Notification, TransitionKind};
use crate::command::tag::ActionTag;
use log::{debug, trace};
use std::collections::HashMap;

/// Callback invoked with every matching notification
pub type Handler = Box<dyn FnMut(&Notification)>;

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    handler: Handler,
}

/// Routes notifications to subscribers registered per tag or for every tag
///
/// Delivery happens on the calling thread before `dispatch` returns. Tag
/// subscribers run first, in registration order, then wildcard subscribers.
#[derive(Default)]
pub struct EventDispatcher {
    by_tag: HashMap<ActionTag, Vec<Subscriber>>,
    wildcard: Vec<Subscriber>,
    next_id: u64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    /// Register a handler for one tag
    pub fn subscribe(&mut self, tag: ActionTag, handler: Handler) -> SubscriptionId {
        let id = self.allocate_id();
        self.by_tag
            .entry(tag)
            .or_default()
            .push(Subscriber { id, handler });
        debug!("Subscribed {:?} to {}", id, tag);
        id
    }

    /// Register a handler for every tag
    pub fn subscribe_all(&mut self, handler: Handler) -> SubscriptionId {
        let id = self.allocate_id();
        self.wildcard.push(Subscriber { id, handler });
        debug!("Subscribed {:?} to all tags", id);
        id
    }

    /// Drop a subscription. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriber_count();
        for subscribers in self.by_tag.values_mut() {
            subscribers.retain(|subscriber| subscriber.id != id);
        }
        self.by_tag.retain(|_, subscribers| !subscribers.is_empty());
        self.wildcard.retain(|subscriber| subscriber.id != id);

        let removed = self.subscriber_count() < before;
        if removed {
            debug!("Unsubscribed {:?}", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.by_tag.values().map(Vec::len).sum::<usize>() + self.wildcard.len()
    }

    pub fn has_subscribers(&self, tag: ActionTag) -> bool {
        !self.wildcard.is_empty() || self.by_tag.get(&tag).is_some_and(|list| !list.is_empty())
    }

    /// Notify subscribers that `action` went through `kind`
    pub fn dispatch(&mut self, action: &EditorAction, kind: TransitionKind, origin: ActionOrigin) {
        let tag = action.tag();
        if !self.has_subscribers(tag) {
            return;
        }

        let notification = Notification {
            kind,
            origin,
            event: action.event(),
        };

        let tagged = self.by_tag.get_mut(&tag).map(Vec::as_mut_slice).unwrap_or_default();
        trace!(
            "Dispatching {} ({:?}, {:?}) to {} tag and {} wildcard subscribers",
            tag,
            kind,
            origin,
            tagged.len(),
            self.wildcard.len()
        );
        for subscriber in tagged.iter_mut() {
            (subscriber.handler)(&notification);
        }
        for subscriber in self.wildcard.iter_mut() {
            (subscriber.handler)(&notification);
        }
    }

    /// Drop every subscriber
    pub fn clear(&mut self) {
        self.by_tag.clear();
        self.wildcard.clear();
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("tags", &self.by_tag.len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
