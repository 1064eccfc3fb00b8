use crate::{Entry, EntryId, ResultEngine, store::Store};

/// Store that lives as long as the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Vec<Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts with `entries`.
    pub fn seeded(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

impl Store for MemoryStore {
    fn load(&mut self) -> ResultEngine<Vec<Entry>> {
        Ok(self.entries.clone())
    }

    fn insert(&mut self, entry: &Entry) -> ResultEngine<()> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn update(&mut self, entry: &Entry) -> ResultEngine<()> {
        match self.entries.iter_mut().find(|stored| stored.id() == entry.id()) {
            Some(stored) => *stored = entry.clone(),
            None => self.entries.push(entry.clone()),
        }
        Ok(())
    }

    fn remove(&mut self, id: EntryId) -> ResultEngine<()> {
        self.entries.retain(|stored| stored.id() != id);
        Ok(())
    }
}
