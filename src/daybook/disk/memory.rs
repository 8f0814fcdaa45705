use super::DiskSink;
use crate::error::{DaybookError, Result};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Folder,
    Download,
}

#[derive(Debug, Clone)]
pub struct DiskWriteRecord {
    pub target: WriteTarget,
    pub path: PathBuf,
    pub content: String,
}

/// Disk sink that keeps every write in memory, for tests.
#[derive(Default)]
pub struct MemDiskSink {
    writes: RefCell<Vec<DiskWriteRecord>>,
    deny_folder: RefCell<bool>,
    fail_download: RefCell<bool>,
}

impl MemDiskSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every folder write fail, as if permission had been revoked.
    pub fn set_deny_folder(&self, deny: bool) {
        *self.deny_folder.borrow_mut() = deny;
    }

    pub fn set_fail_download(&self, fail: bool) {
        *self.fail_download.borrow_mut() = fail;
    }

    pub fn writes(&self) -> Vec<DiskWriteRecord> {
        self.writes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    pub fn last_write(&self) -> Option<DiskWriteRecord> {
        self.writes.borrow().last().cloned()
    }
}

impl DiskSink for MemDiskSink {
    fn write_in_folder(&self, folder: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
        if *self.deny_folder.borrow() {
            return Err(DaybookError::Store("Simulated folder permission denied".into()));
        }
        let path = folder.join(file_name);
        self.writes.borrow_mut().push(DiskWriteRecord {
            target: WriteTarget::Folder,
            path: path.clone(),
            content: content.to_string(),
        });
        Ok(path)
    }

    fn download(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        if *self.fail_download.borrow() {
            return Err(DaybookError::Store("Simulated download failure".into()));
        }
        let path = PathBuf::from("/downloads").join(file_name);
        self.writes.borrow_mut().push(DiskWriteRecord {
            target: WriteTarget::Download,
            path: path.clone(),
            content: content.to_string(),
        });
        Ok(path)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        Ok(self
            .writes
            .borrow()
            .iter()
            .rev()
            .find(|w| w.path == path)
            .map(|w| w.content.clone()))
    }
}
