use crate::commands::CmdResult;
use crate::error::Result;
use crate::policy::{BackupCadence, StorageMode, StoragePolicy};
use crate::records::RecordStore;
use crate::session::{FolderHandle, Session};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of where the collection lives and how big it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageStatus {
    pub mode: StorageMode,
    pub record_count: usize,
    /// Size of the serialized collection in bytes.
    pub size_bytes: usize,
    pub auto_backup: bool,
    pub cadence: BackupCadence,
    pub last_backup: Option<DateTime<Utc>>,
    pub folder: Option<FolderHandle>,
    pub user_email: Option<String>,
}

impl StorageStatus {
    pub fn local_active(&self) -> bool {
        self.mode.writes_local()
    }

    pub fn disk_active(&self) -> bool {
        self.mode.writes_disk()
    }

    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }

    /// `Local + Disk | 3 records (0.52 KB) | Auto Backup: on`
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} records ({:.2} KB) | Auto Backup: {}",
            self.mode.label(),
            self.record_count,
            self.size_kb(),
            if self.auto_backup { "on" } else { "off" }
        )
    }
}

pub fn compute(
    store: &RecordStore,
    policy: &StoragePolicy,
    session: &Session,
    last_backup: Option<DateTime<Utc>>,
) -> Result<StorageStatus> {
    let size_bytes = serde_json::to_string(store.records())?.len();
    Ok(StorageStatus {
        mode: policy.mode,
        record_count: store.len(),
        size_bytes,
        auto_backup: policy.auto_backup,
        cadence: policy.cadence,
        last_backup,
        folder: session.folder.clone(),
        user_email: session.user.as_ref().map(|u| u.email.clone()),
    })
}

pub fn run(
    store: &RecordStore,
    policy: &StoragePolicy,
    session: &Session,
    last_backup: Option<DateTime<Utc>>,
) -> Result<CmdResult> {
    let status = compute(store, policy, session, last_backup)?;
    Ok(CmdResult::default().with_status(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures;

    #[test]
    fn empty_collection() {
        let status = compute(
            &RecordStore::new(),
            &StoragePolicy::default(),
            &Session::default(),
            None,
        )
        .unwrap();
        assert_eq!(status.record_count, 0);
        assert_eq!(status.size_bytes, 2);
        assert_eq!(
            status.summary_line(),
            "Local + Disk | 0 records (0.00 KB) | Auto Backup: on"
        );
    }

    #[test]
    fn reflects_mode() {
        let policy = StoragePolicy {
            mode: StorageMode::LocalOnly,
            auto_backup: false,
            ..Default::default()
        };
        let store = RecordStore::from_records(fixtures::records(3));
        let status = compute(&store, &policy, &Session::default(), None).unwrap();
        assert!(status.local_active());
        assert!(!status.disk_active());
        assert_eq!(status.record_count, 3);
        assert!(status.size_bytes > 100);
        assert!(status.summary_line().starts_with("Local Only | 3 records"));
        assert!(status.summary_line().ends_with("Auto Backup: off"));
    }
}
