use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{EngineError, Entry, EntryId, ResultEngine, store::Store};

/// Key the collection is stored under.
pub const DEFAULT_STORE_KEY: &str = "finances";

/// Namespaced key/value file on disk.
///
/// The file is a JSON object mapping keys to string values, the same shape
/// as browser local storage. The collection lives under one key as a JSON
/// encoded array of entries; other keys are preserved on write.
#[derive(Clone, Debug)]
pub struct LocalStore {
    path: PathBuf,
    key: String,
}

type Namespace = BTreeMap<String, String>;

impl LocalStore {
    /// Store under [`DEFAULT_STORE_KEY`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, DEFAULT_STORE_KEY)
    }

    pub fn with_key(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_namespace(&self) -> ResultEngine<Namespace> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Namespace::new());
            }
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(Namespace::new());
        }
        serde_json::from_str(&content).map_err(|err| {
            EngineError::CorruptStore(format!("{}: {err}", self.path.display()))
        })
    }

    fn write_namespace(&self, namespace: &Namespace) -> ResultEngine<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(namespace)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }

    fn read_entries(&self) -> ResultEngine<(Namespace, Vec<Entry>)> {
        let namespace = self.read_namespace()?;
        let entries = match namespace.get(&self.key) {
            Some(raw) => serde_json::from_str(raw).map_err(|err| {
                EngineError::CorruptStore(format!("key `{}`: {err}", self.key))
            })?,
            None => Vec::new(),
        };
        Ok((namespace, entries))
    }

    fn write_entries(&self, mut namespace: Namespace, entries: &[Entry]) -> ResultEngine<()> {
        namespace.insert(self.key.clone(), serde_json::to_string(entries)?);
        self.write_namespace(&namespace)?;
        tracing::debug!(
            path = %self.path.display(),
            key = %self.key,
            entries = entries.len(),
            "store written"
        );
        Ok(())
    }
}

impl Store for LocalStore {
    fn load(&mut self) -> ResultEngine<Vec<Entry>> {
        let (_, entries) = self.read_entries()?;
        Ok(entries)
    }

    fn insert(&mut self, entry: &Entry) -> ResultEngine<()> {
        let (namespace, mut entries) = self.read_entries()?;
        entries.push(entry.clone());
        self.write_entries(namespace, &entries)
    }

    fn update(&mut self, entry: &Entry) -> ResultEngine<()> {
        let (namespace, mut entries) = self.read_entries()?;
        match entries.iter_mut().find(|stored| stored.id() == entry.id()) {
            Some(stored) => *stored = entry.clone(),
            None => entries.push(entry.clone()),
        }
        self.write_entries(namespace, &entries)
    }

    fn remove(&mut self, id: EntryId) -> ResultEngine<()> {
        let (namespace, mut entries) = self.read_entries()?;
        entries.retain(|stored| stored.id() != id);
        self.write_entries(namespace, &entries)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::EntryDate;

    fn store_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_stores")
            .join(format!("local_{}.json", Uuid::new_v4()))
    }

    #[test]
    fn missing_file_loads_empty() {
        let mut store = LocalStore::new(store_path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn entries_live_under_the_key_as_json_text() {
        let path = store_path();
        let mut store = LocalStore::new(&path);
        let entry = Entry::new("Coffee", 2.99, EntryDate::now()).unwrap();
        store.insert(&entry).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let namespace: Namespace = serde_json::from_str(&raw).unwrap();
        let value: serde_json::Value = serde_json::from_str(&namespace["finances"]).unwrap();
        assert_eq!(value[0]["description"], "Coffee");
        assert_eq!(value[0]["id"], entry.id().to_string());
    }

    #[test]
    fn other_keys_survive_writes() {
        let path = store_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let mut store = LocalStore::new(&path);
        let entry = Entry::new("Tea", 1.5, EntryDate::now()).unwrap();
        store.insert(&entry).unwrap();
        store.remove(entry.id()).unwrap();

        let namespace: Namespace = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(namespace["theme"], "dark");
        assert_eq!(namespace["finances"], "[]");
    }

    #[test]
    fn update_replaces_in_place() {
        let mut store = LocalStore::new(store_path());
        let mut first = Entry::new("a", 1.0, EntryDate::now()).unwrap();
        let second = Entry::new("b", 2.0, EntryDate::now()).unwrap();
        store.insert(&first).unwrap();
        store.insert(&second).unwrap();

        first.set_amount(5.0);
        store.update(&first).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].amount(), 5.0);
        assert_eq!(loaded[1].description(), "b");
    }

    #[test]
    fn garbage_file_is_reported_as_corrupt() {
        let path = store_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let err = LocalStore::new(&path).load().unwrap_err();
        assert!(matches!(err, EngineError::CorruptStore(_)));
    }

    #[test]
    fn separate_keys_are_separate_collections() {
        let path = store_path();
        let mut finances = LocalStore::new(&path);
        let mut archive = LocalStore::with_key(&path, "finances-archive");

        finances
            .insert(&Entry::new("now", 1.0, EntryDate::now()).unwrap())
            .unwrap();
        assert!(archive.load().unwrap().is_empty());
        assert_eq!(finances.load().unwrap().len(), 1);
    }
}
