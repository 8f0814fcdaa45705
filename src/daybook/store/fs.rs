use super::LocalStorage;
use crate::error::{DaybookError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const STORAGE_FILENAME: &str = "local_storage.json";

/// File-backed local storage. The whole map is read on every access and
/// rewritten atomically (tmp file + rename) on every change.
pub struct FsLocalStorage {
    root: PathBuf,
}

impl FsLocalStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_path(&self) -> PathBuf {
        self.root.join(STORAGE_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(DaybookError::Io)?;
        }
        Ok(())
    }

    fn load_map(&self) -> Result<BTreeMap<String, String>> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&path).map_err(DaybookError::Io)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let map: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(DaybookError::Serialization)?;
        Ok(map)
    }

    fn save_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(map).map_err(DaybookError::Serialization)?;

        let tmp_file = self.root.join(format!(".local_storage-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(DaybookError::Io)?;
        fs::rename(&tmp_file, self.file_path()).map_err(DaybookError::Io)?;
        Ok(())
    }
}

impl LocalStorage for FsLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_map()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load_map()?;
        map.insert(key.to_string(), value.to_string());
        self.save_map(&map)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut map = self.load_map()?;
        if map.remove(key).is_some() {
            self.save_map(&map)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.load_map()?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let local = FsLocalStorage::new(dir.path().join("nested"));
        assert_eq!(local.get_item("records").unwrap(), None);
        assert!(local.keys().unwrap().is_empty());
    }

    #[test]
    fn set_get_remove() {
        let dir = TempDir::new().unwrap();
        let local = FsLocalStorage::new(dir.path().join("nested"));

        local.set_item("a", "1").unwrap();
        local.set_item("b", "two").unwrap();
        assert_eq!(local.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(local.keys().unwrap(), vec!["a", "b"]);

        local.remove_item("a").unwrap();
        assert_eq!(local.get_item("a").unwrap(), None);

        // A fresh handle sees the same data.
        let again = FsLocalStorage::new(dir.path().join("nested"));
        assert_eq!(again.get_item("b").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn leaves_no_tmp_files() {
        let dir = TempDir::new().unwrap();
        let local = FsLocalStorage::new(dir.path().to_path_buf());
        local.set_item("k", "v").unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }
}
