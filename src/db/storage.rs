use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::prelude::*;

/// String-keyed store of JSON values.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&mut self, key: &str, value: Value) -> Result;
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage(BTreeMap<String, Value>);

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.0.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result {
        self.0.insert(key.to_string(), value);
        Ok(())
    }
}

/// Keeps every key in a single JSON document on disk, rewritten on each change.
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl FileStorage {
    /// Load the storage file, a missing file is an empty storage.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.is_file() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("`{}` is not a valid storage file", path.display()))?
        } else {
            info!("storage file does not exist yet, starting empty");
            BTreeMap::new()
        };
        Ok(Self { path: path.to_path_buf(), entries })
    }

    fn flush(&self) -> Result {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write `{}`", self.path.display()))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    #[instrument(skip_all, fields(key = key))]
    fn set(&mut self, key: &str, value: Value) -> Result {
        debug!("saving…");
        self.entries.insert(key.to_string(), value);
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn memory_storage_ok() -> Result {
        let mut storage = MemoryStorage::default();
        assert_eq!(storage.get("key")?, None);
        storage.set("key", json!([1, 2]))?;
        assert_eq!(storage.get("key")?, Some(json!([1, 2])));
        Ok(())
    }

    #[test]
    fn file_storage_persists() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("nested").join("frota.json");

        let mut storage = FileStorage::open(&path)?;
        assert_eq!(storage.get("key")?, None);
        storage.set("key", json!({"answer": 42}))?;

        let reopened = FileStorage::open(&path)?;
        assert_eq!(reopened.get("key")?, Some(json!({"answer": 42})));
        Ok(())
    }

    #[test]
    fn corrupt_file_fails() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("frota.json");
        fs::write(&path, "not json")?;
        assert!(FileStorage::open(&path).is_err());
        Ok(())
    }
}
