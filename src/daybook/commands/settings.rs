use crate::commands::{status, CmdMessage, CmdResult};
use crate::disk::DiskSink;
use crate::error::Result;
use crate::persist::{self, backup_if_due};
use crate::policy::{load_last_backup, BackupCadence, StorageMode, StoragePolicy};
use crate::records::RecordStore;
use crate::session::Session;
use crate::store::LocalStorage;
use chrono::{DateTime, Utc};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsChange {
    pub mode: Option<StorageMode>,
    pub auto_backup: Option<bool>,
    pub cadence: Option<BackupCadence>,
}

impl SettingsChange {
    pub fn is_empty(&self) -> bool {
        self.mode.is_none() && self.auto_backup.is_none() && self.cadence.is_none()
    }
}

/// Shows the storage settings, or changes them and saves them straight away.
///
/// A mode change fires a persist-trigger under the new mode, so the sink that
/// mode loads from at startup holds the current collection. Switching
/// auto-backup on runs a backup check immediately when there is something to
/// back up.
pub fn run<L: LocalStorage, D: DiskSink>(
    store: &RecordStore,
    local: &L,
    disk: &D,
    session: &Session,
    policy: &mut StoragePolicy,
    change: SettingsChange,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if !change.is_empty() {
        let was_backing_up = policy.auto_backup;
        let previous_mode = policy.mode;
        if let Some(mode) = change.mode {
            policy.mode = mode;
        }
        if let Some(auto_backup) = change.auto_backup {
            policy.auto_backup = auto_backup;
        }
        if let Some(cadence) = change.cadence {
            policy.cadence = cadence;
        }
        policy.save(local)?;
        result.add_message(CmdMessage::success("Storage settings saved!"));

        if policy.mode != previous_mode {
            let report = persist::run(store.records(), local, disk, session, policy, now)?;
            for warning in &report.warnings {
                result.add_message(CmdMessage::warning(warning.clone()));
            }
        }

        match (was_backing_up, policy.auto_backup) {
            (false, true) => {
                result.add_message(CmdMessage::success(
                    "Auto backup enabled! Data will be saved to disk automatically.",
                ));
                match backup_if_due(store.records(), local, disk, session, policy, now) {
                    Ok(Some(saved)) => result.add_message(CmdMessage::info(format!(
                        "Backup written to {}",
                        saved.path.display()
                    ))),
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Immediate backup failed: {}", e);
                        result.add_message(CmdMessage::warning(format!(
                            "Auto backup failed: {}",
                            e
                        )));
                    }
                }
            }
            (true, false) => result.add_message(CmdMessage::success("Auto backup disabled.")),
            _ => {}
        }
    }

    let last_backup = load_last_backup(local).unwrap_or(None);
    let snapshot = status::compute(store, policy, session, last_backup)?;
    Ok(result.with_status(snapshot))
}
