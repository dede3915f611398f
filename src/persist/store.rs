use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::PersistError;

/// A place the serialized document is kept between runs.
///
/// Values are opaque strings; the store never looks inside them.
pub trait ContentStore {
    /// The stored value, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>, PersistError>;

    fn save(&mut self, value: &str) -> Result<(), PersistError>;

    /// Forget the stored value. Clearing an empty store is not an error.
    fn clear(&mut self) -> Result<(), PersistError>;

    /// Short human-readable location, shown in the status bar.
    fn describe(&self) -> String;
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    key: String,
}

/// A key must name a single plain file inside the store directory.
fn validate_key(key: &str) -> Result<(), PersistError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && !key
            .chars()
            .any(|ch| ch == '/' || ch == '\\' || ch.is_whitespace() || ch.is_control());
    if valid {
        Ok(())
    } else {
        Err(PersistError::InvalidKey(key.to_string()))
    }
}

impl FileStore {
    /// Fails with [`PersistError::InvalidKey`] when `key` is empty, starts
    /// with a dot, or contains a path separator or whitespace.
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Result<Self, PersistError> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self {
            dir: dir.into(),
            key,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", self.key))
    }
}

fn write_err(path: &Path) -> impl FnOnce(io::Error) -> PersistError + '_ {
    move |source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    }
}

impl ContentStore for FileStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Read { path, source }),
        }
    }

    fn save(&mut self, value: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(write_err(&self.dir))?;
        let temp = self.temp_path();
        let path = self.path();
        fs::write(&temp, value).map_err(write_err(&temp))?;
        fs::rename(&temp, &path).map_err(write_err(&path))
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistError::Remove { path, source }),
        }
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}

/// In-memory store for tests and `--reset` dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    value: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            writes: 0,
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Number of successful `save` calls.
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl ContentStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, value: &str) -> Result<(), PersistError> {
        self.value = Some(value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        self.value = None;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"), "notes").unwrap();
        assert_eq!(store.load().unwrap(), None);

        store.save("{\"a\":1}").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(store.path().ends_with("nested/notes.json"));
        assert!(!store.temp_path().exists());

        store.save("second").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("second"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_keys_are_independent() {
        let dir = tempdir().unwrap();
        let mut a = FileStore::new(dir.path(), "a").unwrap();
        let b = FileStore::new(dir.path(), "b").unwrap();
        a.save("only a").unwrap();
        assert_eq!(b.load().unwrap(), None);
    }

    #[test]
    fn test_unreadable_path_is_a_read_error() {
        let dir = tempdir().unwrap();
        // A directory where the file should be.
        fs::create_dir_all(dir.path().join("content.json")).unwrap();
        let store = FileStore::new(dir.path(), "content").unwrap();
        assert!(matches!(store.load(), Err(PersistError::Read { .. })));
    }

    #[test]
    fn test_keys_that_leave_the_directory_are_rejected() {
        let dir = tempdir().unwrap();
        for key in ["", "../x", "a/b", "a\\b", "..", ".hidden", "my notes", "tab\tkey"] {
            assert!(
                matches!(FileStore::new(dir.path(), key), Err(PersistError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
        let store = FileStore::new(dir.path(), "journal-2024_v1.2").unwrap();
        assert_eq!(store.path().parent(), Some(dir.path()));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::new();
        store.save("x").unwrap();
        store.save("y").unwrap();
        assert_eq!(store.writes(), 2);
        assert_eq!(store.content(), Some("y"));
        store.clear().unwrap();
        assert_eq!(store.content(), None);
    }
}
