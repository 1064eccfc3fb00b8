//! Change notifications published by [`EntryCollection`].
//!
//! Listeners are plain callbacks registered on the collection. They run
//! synchronously, in registration order, once a mutation has been persisted.
//!
//! [`EntryCollection`]: crate::EntryCollection
use crate::{EntryChange, EntryCollection, EntryId};

/// Handle returned by every subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn first() -> Self {
        Self(0)
    }

    pub(crate) fn bump(&mut self) -> Self {
        let current = *self;
        self.0 += 1;
        current
    }
}

/// What happened to the collection.
#[derive(Clone, Debug, PartialEq)]
pub enum CollectionEvent {
    /// Contents replaced wholesale by a load.
    Reset,
    /// One entry appended at the end.
    Add(EntryId),
    /// One entry updated in place.
    Change { id: EntryId, change: EntryChange },
    /// One entry deleted.
    Remove(EntryId),
}

impl CollectionEvent {
    /// The entry the event is about, if it is about a single one.
    pub fn entry_id(&self) -> Option<EntryId> {
        match self {
            Self::Reset => None,
            Self::Add(id) | Self::Remove(id) => Some(*id),
            Self::Change { id, .. } => Some(*id),
        }
    }
}

/// Callback notified of every collection event.
pub type CollectionListener = dyn FnMut(&CollectionEvent, &EntryCollection);

pub(crate) struct Subscribed<L: ?Sized> {
    pub(crate) id: SubscriptionId,
    pub(crate) listener: Box<L>,
}
