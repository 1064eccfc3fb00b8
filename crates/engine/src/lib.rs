//! Ledger engine: entries, the ordered collection that owns them, and the
//! backing stores the collection persists to.
pub use collection::{EntryCollection, NewEntry};
pub use entry::{Entry, EntryChange, EntryDate, EntryId, human_date};
pub use error::EngineError;
pub use events::{CollectionEvent, CollectionListener, SubscriptionId};
pub use money::{finite_or_nan, format_amount, parse_amount, round_cents};
pub use store::{DEFAULT_STORE_KEY, LocalStore, MemoryStore, Store};

mod collection;
mod entry;
mod error;
mod events;
mod money;
mod store;

pub type ResultEngine<T> = Result<T, EngineError>;
