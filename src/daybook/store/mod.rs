//! # Local Storage
//!
//! A small string key/value store standing in for a browser's `localStorage`.
//! It holds the record collection and every bit of state that must survive
//! between sessions (storage preference, backup bookkeeping, chosen folder).
//!
//! ## Implementations
//!
//! - [`fs::FsLocalStorage`]: production store, one JSON map on disk.
//! - [`memory::MemLocalStorage`]: in-memory store for tests.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── local_storage.json   # key -> string value
//! ├── config.json          # DaybookConfig
//! └── session.json         # cached remote session (RestRemote)
//! ```
//!
//! The trait takes `&self` everywhere; implementations that need to mutate use
//! interior mutability, since daybook is single-threaded.

use crate::error::Result;
use crate::model::Record;

pub mod fs;
pub mod memory;

/// Well-known keys.
pub mod keys {
    pub const RECORDS: &str = "records";
    pub const STORAGE_PREFERENCE: &str = "storage_preference";
    pub const AUTO_BACKUP_ENABLED: &str = "auto_backup_enabled";
    pub const BACKUP_FREQUENCY: &str = "backup_frequency";
    pub const LAST_AUTO_BACKUP: &str = "last_auto_backup";
    pub const SAVE_FOLDER: &str = "save_folder";
    pub const LAST_DISK_EXPORT: &str = "last_disk_export";
}

pub trait LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&self, key: &str) -> Result<()>;

    fn keys(&self) -> Result<Vec<String>>;
}

/// Loads the collection stored under [`keys::RECORDS`]. Empty when absent.
pub fn load_records<L: LocalStorage>(local: &L) -> Result<Vec<Record>> {
    match local.get_item(keys::RECORDS)? {
        Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
        _ => Ok(Vec::new()),
    }
}

pub fn save_records<L: LocalStorage>(local: &L, records: &[Record]) -> Result<()> {
    let raw = serde_json::to_string(records)?;
    local.set_item(keys::RECORDS, &raw)
}
