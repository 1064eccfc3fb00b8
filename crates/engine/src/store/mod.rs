//! Backing stores for [`EntryCollection`].
//!
//! - [`LocalStore`] keeps entries in a namespaced key/value file on disk.
//! - [`MemoryStore`] keeps entries in process; it is also the landing place
//!   for entries fetched from the legacy remote endpoint.
//!
//! [`EntryCollection`]: crate::EntryCollection
use crate::{Entry, EntryId, ResultEngine};

pub use local::{DEFAULT_STORE_KEY, LocalStore};
pub use memory::MemoryStore;

mod local;
mod memory;

/// Persistence behind a collection.
///
/// Each call is synchronous and must be durable when it returns `Ok`.
pub trait Store {
    /// Every stored entry, in display order.
    fn load(&mut self) -> ResultEngine<Vec<Entry>>;
    /// Appends a new entry.
    fn insert(&mut self, entry: &Entry) -> ResultEngine<()>;
    /// Replaces the stored entry with the same id, appending it if missing.
    fn update(&mut self, entry: &Entry) -> ResultEngine<()>;
    /// Deletes the entry with `id`. Deleting a missing entry is not an error.
    fn remove(&mut self, id: EntryId) -> ResultEngine<()>;
}
