use crate::commands::{CmdMessage, CmdResult};
use crate::disk::DiskSink;
use crate::error::Result;
use crate::persist::{save_to_disk, SavedTo};
use crate::records::RecordStore;
use crate::session::Session;
use crate::store::LocalStorage;
use chrono::{DateTime, Utc};
use tracing::warn;

/// Writes the collection to disk right now, whatever the storage mode.
pub fn run<L: LocalStorage, D: DiskSink>(
    store: &RecordStore,
    local: &L,
    disk: &D,
    session: &Session,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match save_to_disk(store.records(), local, disk, session, now) {
        Ok(saved) => {
            let message = match saved.saved_to {
                SavedTo::Folder => format!(
                    "Data saved to folder successfully (CSV): {}",
                    saved.path.display()
                ),
                SavedTo::Downloads => format!(
                    "Data saved to Downloads folder (CSV): {}",
                    saved.path.display()
                ),
            };
            result.add_message(CmdMessage::success(message));
        }
        Err(e) => {
            warn!("Manual save failed: {}", e);
            result.add_message(CmdMessage::error(format!("Error saving to disk: {}", e)));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::now;
    use crate::disk::memory::{MemDiskSink, WriteTarget};
    use crate::session::FolderHandle;
    use crate::store::memory::{fixtures, MemLocalStorage};
    use std::path::PathBuf;

    #[test]
    fn saves_into_chosen_folder() {
        let local = MemLocalStorage::new();
        let disk = MemDiskSink::new();
        let session = Session::new(None, Some(FolderHandle::from_path(PathBuf::from("/r"))));
        let store = RecordStore::from_records(fixtures::records(1));

        let result = run(&store, &local, &disk, &session, now()).unwrap();
        assert!(!result.has_errors());
        assert_eq!(disk.last_write().unwrap().target, WriteTarget::Folder);
    }

    #[test]
    fn failure_is_reported_not_raised() {
        let local = MemLocalStorage::new();
        let disk = MemDiskSink::new();
        disk.set_fail_download(true);
        let store = RecordStore::from_records(fixtures::records(1));

        let result = run(&store, &local, &disk, &Session::default(), now()).unwrap();
        assert!(result.has_errors());
    }
}
