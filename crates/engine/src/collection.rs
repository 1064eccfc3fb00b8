//! The ordered collection of entries and its running total.
//!
//! Every mutation is written to the backing [`Store`] first; only then does
//! the in-memory state change and listeners get notified. A failing store
//! leaves the collection untouched.
use core::fmt;

use crate::{
    Entry, EntryChange, EntryDate, EntryId, EngineError, ResultEngine, Store,
    events::{CollectionEvent, CollectionListener, Subscribed, SubscriptionId},
    money::rounded_sum,
};

/// Attributes for a new entry.
#[derive(Clone, Debug, PartialEq)]
pub struct NewEntry {
    pub description: String,
    pub amount: f64,
    pub date: EntryDate,
}

impl NewEntry {
    /// Attributes dated now.
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        Self {
            description: description.into(),
            amount,
            date: EntryDate::now(),
        }
    }

    pub fn dated(mut self, date: EntryDate) -> Self {
        self.date = date;
        self
    }
}

/// Insertion-ordered entries backed by a [`Store`].
pub struct EntryCollection {
    store: Box<dyn Store>,
    entries: Vec<Entry>,
    next_subscription: SubscriptionId,
    listeners: Vec<Subscribed<CollectionListener>>,
}

impl EntryCollection {
    /// Creates an empty collection. Call [`load`](Self::load) to read the store.
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Box::new(store),
            entries: Vec::new(),
            next_subscription: SubscriptionId::first(),
            listeners: Vec::new(),
        }
    }

    /// Replaces the contents with what the store holds and emits one
    /// [`CollectionEvent::Reset`].
    pub fn load(&mut self) -> ResultEngine<()> {
        self.entries = self.store.load()?;

        tracing::info!(entries = self.entries.len(), "collection loaded");
        self.emit(CollectionEvent::Reset);
        Ok(())
    }

    /// Creates an entry, persists it and appends it at the end.
    pub fn create(&mut self, attributes: NewEntry) -> ResultEngine<EntryId> {
        let entry = Entry::new(attributes.description, attributes.amount, attributes.date)?;
        if entry.amount().is_nan() {
            tracing::warn!(id = %entry.id(), "entry created with a non-numeric amount");
        }

        self.store.insert(&entry)?;
        let id = entry.id();
        self.entries.push(entry);

        tracing::debug!(%id, "entry created");
        self.emit(CollectionEvent::Add(id));
        Ok(id)
    }

    /// Updates the amount of one entry.
    ///
    /// Returns `Ok(None)` without touching the store when the amount is
    /// unchanged.
    pub fn set_amount(&mut self, id: EntryId, amount: f64) -> ResultEngine<Option<EntryChange>> {
        if !amount.is_finite() {
            tracing::warn!(%id, "entry amount set to a non-numeric value");
        }
        self.update_entry(id, |entry| entry.set_amount(amount))
    }

    /// Updates the description of one entry.
    ///
    /// Returns `Ok(None)` without touching the store when the text is
    /// unchanged.
    pub fn set_description(
        &mut self,
        id: EntryId,
        description: impl Into<String>,
    ) -> ResultEngine<Option<EntryChange>> {
        let description = description.into();
        self.update_entry(id, |entry| entry.set_description(description))
    }

    /// Deletes an entry from the store and the collection.
    pub fn remove(&mut self, id: EntryId) -> ResultEngine<Entry> {
        let position = self.position(id).ok_or(EngineError::EntryNotFound(id))?;

        self.store.remove(id)?;
        let removed = self.entries.remove(position);

        tracing::debug!(%id, "entry removed");
        self.emit(CollectionEvent::Remove(id));
        Ok(removed)
    }

    /// Sum of all amounts rounded to cents. Recomputed on every call.
    pub fn total(&self) -> f64 {
        rounded_sum(self.entries.iter().map(Entry::amount))
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers a listener for every collection event.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CollectionEvent, &EntryCollection) + 'static,
    {
        let id = self.next_subscription.bump();
        self.listeners.push(Subscribed {
            id,
            listener: Box::new(listener),
        });
        id
    }

    /// Removes a listener. Returns `false` when it was already gone.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|sub| sub.id != subscription);
        before != self.listeners.len()
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    fn update_entry<F>(&mut self, id: EntryId, apply: F) -> ResultEngine<Option<EntryChange>>
    where
        F: FnOnce(&mut Entry) -> Option<EntryChange>,
    {
        let position = self.position(id).ok_or(EngineError::EntryNotFound(id))?;

        let mut updated = self.entries[position].clone();
        let Some(change) = apply(&mut updated) else {
            return Ok(None);
        };

        self.store.update(&updated)?;
        self.entries[position] = updated;

        tracing::debug!(%id, ?change, "entry updated");
        self.emit(CollectionEvent::Change {
            id,
            change: change.clone(),
        });
        Ok(Some(change))
    }

    fn emit(&mut self, event: CollectionEvent) {
        // Listeners get read access to the whole collection, so they are
        // moved out for the duration of the dispatch.
        let mut listeners = std::mem::take(&mut self.listeners);
        for sub in &mut listeners {
            (sub.listener)(&event, self);
        }
        self.listeners = listeners;
    }
}

impl fmt::Debug for EntryCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryCollection")
            .field("entries", &self.entries)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::MemoryStore;

    fn collection_with(amounts: &[f64]) -> EntryCollection {
        let mut collection = EntryCollection::new(MemoryStore::new());
        for (i, amount) in amounts.iter().enumerate() {
            collection
                .create(NewEntry::new(format!("entry {i}"), *amount))
                .unwrap();
        }
        collection
    }

    #[test]
    fn total_is_rounded_sum_of_amounts() {
        let collection = collection_with(&[0.1, 0.2, 10.0, 2.5]);
        assert_eq!(collection.total(), 12.8);
        assert_eq!(collection_with(&[]).total(), 0.0);
    }

    #[test]
    fn total_propagates_nan() {
        let collection = collection_with(&[1.0, f64::NAN]);
        assert!(collection.total().is_nan());
    }

    #[test]
    fn create_keeps_insertion_order() {
        let collection = collection_with(&[1.0, 2.0, 3.0]);
        let descriptions = collection
            .iter()
            .map(|entry| entry.description().to_string())
            .collect::<Vec<_>>();
        assert_eq!(descriptions, ["entry 0", "entry 1", "entry 2"]);
    }

    #[test]
    fn remove_unknown_entry_fails() {
        let mut collection = collection_with(&[1.0]);
        let id = uuid::Uuid::new_v4();
        assert_eq!(
            collection.remove(id).unwrap_err(),
            EngineError::EntryNotFound(id)
        );
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn listeners_see_events_in_order() {
        let mut collection = EntryCollection::new(MemoryStore::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        collection.subscribe(move |event, collection| {
            sink.borrow_mut().push((event.clone(), collection.len()));
        });

        collection.load().unwrap();
        let id = collection.create(NewEntry::new("Coffee", 2.0)).unwrap();
        collection.set_amount(id, 2.0).unwrap();
        collection.set_amount(id, 3.0).unwrap();
        collection.remove(id).unwrap();

        let seen = seen.borrow();
        assert_eq!(
            *seen,
            vec![
                (CollectionEvent::Reset, 0),
                (CollectionEvent::Add(id), 1),
                (
                    CollectionEvent::Change {
                        id,
                        change: EntryChange::Amount { previous: 2.0 }
                    },
                    1
                ),
                (CollectionEvent::Remove(id), 0),
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut collection = EntryCollection::new(MemoryStore::new());
        let count = Rc::new(RefCell::new(0));

        let sink = Rc::clone(&count);
        let subscription = collection.subscribe(move |_, _| *sink.borrow_mut() += 1);
        collection.create(NewEntry::new("a", 1.0)).unwrap();

        assert!(collection.unsubscribe(subscription));
        collection.create(NewEntry::new("b", 1.0)).unwrap();

        assert_eq!(*count.borrow(), 1);
    }
}
