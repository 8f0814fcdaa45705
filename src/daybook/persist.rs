//! # Persistence
//!
//! Carries out a [`PersistPlan`] against the real sinks. Every sink receives
//! the whole collection.
//!
//! Local storage errors propagate: if the collection cannot be written there,
//! the operation failed. Disk errors never do. A folder write that fails falls
//! back to the downloads location, and a failed download becomes a warning in
//! the [`PersistReport`].

use crate::codec::csv;
use crate::disk::DiskSink;
use crate::error::Result;
use crate::model::Record;
use crate::policy::{load_last_backup, save_last_backup, DiskWrite, StorageMode, StoragePolicy};
use crate::session::{FolderHandle, Session};
use crate::store::{keys, load_records, save_records, LocalStorage};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const FILE_PREFIX: &str = "daily-records";
/// `last_disk_export` value meaning the disk copy was emptied.
const EMPTY_EXPORT: &str = "";

/// `daily-records-YYYY-MM-DD.csv`
pub fn daily_file_name(now: DateTime<Utc>) -> String {
    format!("{}-{}.csv", FILE_PREFIX, now.format("%Y-%m-%d"))
}

/// `daily-records-backup-YYYY-MM-DD-HH-MM-SS.csv`, used for auto-backups
/// that land in the downloads location.
pub fn backup_file_name(now: DateTime<Utc>) -> String {
    format!("{}-backup-{}.csv", FILE_PREFIX, now.format("%Y-%m-%d-%H-%M-%S"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedTo {
    Folder,
    Downloads,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskSave {
    pub saved_to: SavedTo,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub wrote_local: bool,
    pub disk: Option<(DiskWrite, DiskSave)>,
    pub warnings: Vec<String>,
}

/// Writes `content` into the chosen folder, falling back to the downloads
/// location when there is no folder or the folder write fails.
pub fn write_csv<D: DiskSink>(
    disk: &D,
    folder: Option<&FolderHandle>,
    folder_file: &str,
    download_file: &str,
    content: &str,
) -> Result<DiskSave> {
    if let Some(folder) = folder {
        match disk.write_in_folder(&folder.path, folder_file, content) {
            Ok(path) => {
                return Ok(DiskSave {
                    saved_to: SavedTo::Folder,
                    path,
                })
            }
            Err(e) => warn!(
                "Could not write to folder {}, falling back to downloads: {}",
                folder.path.display(),
                e
            ),
        }
    }
    let path = disk.download(download_file, content)?;
    Ok(DiskSave {
        saved_to: SavedTo::Downloads,
        path,
    })
}

/// Writes the collection as a dated CSV and remembers where it went.
pub fn save_to_disk<L: LocalStorage, D: DiskSink>(
    records: &[Record],
    local: &L,
    disk: &D,
    session: &Session,
    now: DateTime<Utc>,
) -> Result<DiskSave> {
    let content = csv::build_csv(records, now);
    let name = daily_file_name(now);
    let saved = write_csv(disk, session.folder.as_ref(), &name, &name, &content)?;
    remember_export(local, &saved.path);
    info!(path = %saved.path.display(), records = records.len(), "saved to disk");
    Ok(saved)
}

fn backup<L: LocalStorage, D: DiskSink>(
    records: &[Record],
    local: &L,
    disk: &D,
    session: &Session,
    now: DateTime<Utc>,
) -> Result<DiskSave> {
    let content = csv::build_csv(records, now);
    let saved = write_csv(
        disk,
        session.folder.as_ref(),
        &daily_file_name(now),
        &backup_file_name(now),
        &content,
    )?;
    save_last_backup(local, now)?;
    info!(path = %saved.path.display(), records = records.len(), "auto-backup written");
    Ok(saved)
}

fn remember_export<L: LocalStorage>(local: &L, path: &Path) {
    if let Err(e) = local.set_item(keys::LAST_DISK_EXPORT, &path.to_string_lossy()) {
        warn!("Could not record last export path: {}", e);
    }
}

/// An empty collection is never written to disk, so in disk-only mode the
/// previous export would come back at the next startup. The export pointer is
/// set to the empty sentinel instead, which [`load_collection`] reads as "no
/// records". The `records` key is left alone.
fn mark_disk_copy_empty<L: LocalStorage>(local: &L) -> Result<()> {
    debug!("collection emptied in disk-only mode");
    local.set_item(keys::LAST_DISK_EXPORT, EMPTY_EXPORT)
}

/// Once the `records` key is newer than the last export, the export must not
/// be read back at startup.
fn forget_last_export<L: LocalStorage>(local: &L) -> Result<()> {
    if local.get_item(keys::LAST_DISK_EXPORT)?.is_some() {
        debug!("local records written, dropping last export pointer");
        local.remove_item(keys::LAST_DISK_EXPORT)?;
    }
    Ok(())
}

/// Runs one persist-trigger.
pub fn run<L: LocalStorage, D: DiskSink>(
    records: &[Record],
    local: &L,
    disk: &D,
    session: &Session,
    policy: &StoragePolicy,
    now: DateTime<Utc>,
) -> Result<PersistReport> {
    let last_backup = load_last_backup(local).unwrap_or_else(|e| {
        warn!("{}", e);
        None
    });
    let plan = policy.plan(records.len(), last_backup, now);
    debug!(mode = %policy.mode, ?plan, records = records.len(), "persisting");

    let mut report = PersistReport::default();
    if plan.write_local {
        save_records(local, records)?;
        forget_last_export(local)?;
        report.wrote_local = true;
    }

    if policy.mode == StorageMode::DiskOnly && records.is_empty() {
        mark_disk_copy_empty(local)?;
    }

    let Some(kind) = plan.disk else {
        return Ok(report);
    };
    let written = match kind {
        DiskWrite::Primary => save_to_disk(records, local, disk, session, now),
        DiskWrite::Backup => backup(records, local, disk, session, now),
    };
    match written {
        Ok(saved) => report.disk = Some((kind, saved)),
        Err(e) => {
            warn!("Disk write failed: {}", e);
            report.warnings.push(format!("Error saving to disk: {}", e));
        }
    }
    Ok(report)
}

/// Runs an auto-backup if one is due, regardless of the storage mode's
/// normal trigger. Used right after auto-backup is switched on.
pub fn backup_if_due<L: LocalStorage, D: DiskSink>(
    records: &[Record],
    local: &L,
    disk: &D,
    session: &Session,
    policy: &StoragePolicy,
    now: DateTime<Utc>,
) -> Result<Option<DiskSave>> {
    if records.is_empty() || !policy.auto_backup {
        return Ok(None);
    }
    let last_backup = load_last_backup(local).unwrap_or(None);
    if !policy.backup_due(last_backup, now) {
        debug!("auto-backup not due yet");
        return Ok(None);
    }
    backup(records, local, disk, session, now).map(Some)
}

/// Loads the collection at startup.
///
/// In disk-only mode the local key is never written, so the last CSV the disk
/// sink produced is the freshest copy. It is used when still readable;
/// otherwise the local key is. Auto-backups never set the pointer, and any
/// write of the local key drops it, so a pointer is only present while the
/// export is at least as new as the local key.
pub fn load_collection<L: LocalStorage, D: DiskSink>(
    local: &L,
    disk: &D,
    policy: &StoragePolicy,
) -> Result<Vec<Record>> {
    if policy.mode == StorageMode::DiskOnly {
        if let Some(raw) = local.get_item(keys::LAST_DISK_EXPORT)? {
            if raw == EMPTY_EXPORT {
                return Ok(Vec::new());
            }
            let path = PathBuf::from(raw);
            match disk.read_file(&path) {
                Ok(Some(content)) => match csv::parse_records(&content) {
                    Ok(records) => {
                        debug!(path = %path.display(), "loaded records from last export");
                        return Ok(records);
                    }
                    Err(e) => warn!("Ignoring unreadable export {}: {}", path.display(), e),
                },
                Ok(None) => debug!(path = %path.display(), "last export is gone"),
                Err(e) => warn!("Could not read {}: {}", path.display(), e),
            }
        }
    }
    load_records(local)
}
