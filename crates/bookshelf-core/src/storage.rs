//! Key-value persistence.
//!
//! Every piece of application state is one JSON document under a fixed key
//! (see [`keys`]). A store only moves raw strings; [`save_json`] and
//! [`load_json`] add serialization and swallow failures after logging them,
//! so a broken or missing store degrades to default state.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Storage keys for each persisted document.
pub mod keys {
    pub const BOOKS: &str = "library_books";
    pub const THEME: &str = "library_theme";
    pub const FILTER: &str = "library_filter";
    pub const SEARCH_QUERY: &str = "library_search_query";
    pub const SEARCH_OPTIONS: &str = "library_search_options";
}

/// A string-to-string store, one document per key.
pub trait KeyValueStore {
    /// Fetch the document stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete the document under `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// A store backed by a directory, with `<dir>/<key>.json` per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (or create) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// An in-process store that forgets everything when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidKey(key.to_string()))
    }
}

/// Serialize `value` and store it under `key`.
///
/// Returns `false` (after logging) if serialization or the write failed.
pub fn save_json<S, T>(store: &mut S, key: &str, value: &T) -> bool
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(Error::from)
        .and_then(|json| store.set(key, &json));
    match result {
        Ok(()) => true,
        Err(e) => {
            log::error!("Failed to save `{}`: {}", key, e);
            false
        }
    }
}

/// Load and deserialize the document under `key`.
///
/// Missing keys, read errors and malformed JSON all yield `None`; the
/// latter two are logged.
pub fn load_json<S, T>(store: &S, key: &str) -> Option<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::error!("Failed to read `{}`: {}", key, e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("Ignoring malformed `{}`: {}", key, e);
            None
        }
    }
}
