//! # Storage Policy
//!
//! Decides which sinks receive the collection on a persist-trigger.
//!
//! | mode | local storage | disk |
//! |------|---------------|------|
//! | `LocalOnly` | always | never |
//! | `DiskOnly` | never | every trigger (non-empty collection) |
//! | `Both` | always | auto-backup, when enabled and the cadence has elapsed |
//!
//! The policy is loaded from local storage at startup and only changes through
//! the settings command, which saves it back straight away. Planning is pure:
//! [`StoragePolicy::plan`] takes the current time and last-backup time as
//! arguments and returns a [`PersistPlan`] that [`crate::persist`] carries out.

use crate::error::{DaybookError, Result};
use crate::store::{keys, LocalStorage};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageMode {
    /// Local storage only ("browser").
    LocalOnly,
    /// On-disk CSV only ("pc").
    DiskOnly,
    #[default]
    Both,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::LocalOnly => "browser",
            StorageMode::DiskOnly => "pc",
            StorageMode::Both => "both",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StorageMode::LocalOnly => "Local Only",
            StorageMode::DiskOnly => "Disk Only",
            StorageMode::Both => "Local + Disk",
        }
    }

    pub fn writes_local(&self) -> bool {
        matches!(self, StorageMode::LocalOnly | StorageMode::Both)
    }

    pub fn writes_disk(&self) -> bool {
        matches!(self, StorageMode::DiskOnly | StorageMode::Both)
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "browser" | "local" => Ok(StorageMode::LocalOnly),
            "pc" | "disk" => Ok(StorageMode::DiskOnly),
            "both" => Ok(StorageMode::Both),
            other => Err(format!(
                "Unknown storage mode '{}' (expected: local, disk, both)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackupCadence {
    Immediate,
    #[default]
    Hourly,
    Daily,
    Weekly,
}

impl BackupCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupCadence::Immediate => "immediate",
            BackupCadence::Hourly => "hourly",
            BackupCadence::Daily => "daily",
            BackupCadence::Weekly => "weekly",
        }
    }

    /// Minimum time between two automatic backups.
    pub fn threshold(&self) -> Duration {
        match self {
            BackupCadence::Immediate => Duration::zero(),
            BackupCadence::Hourly => Duration::hours(1),
            BackupCadence::Daily => Duration::hours(24),
            BackupCadence::Weekly => Duration::days(7),
        }
    }
}

impl fmt::Display for BackupCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackupCadence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(BackupCadence::Immediate),
            "hourly" => Ok(BackupCadence::Hourly),
            "daily" => Ok(BackupCadence::Daily),
            "weekly" => Ok(BackupCadence::Weekly),
            other => Err(format!(
                "Unknown backup frequency '{}' (expected: immediate, hourly, daily, weekly)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoragePolicy {
    pub mode: StorageMode,
    pub auto_backup: bool,
    pub cadence: BackupCadence,
}

impl Default for StoragePolicy {
    fn default() -> Self {
        Self {
            mode: StorageMode::Both,
            auto_backup: true,
            cadence: BackupCadence::Hourly,
        }
    }
}

/// What the disk sink should do on this trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskWrite {
    /// Disk is the primary sink: write every time.
    Primary,
    /// Scheduled auto-backup alongside local storage.
    Backup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistPlan {
    pub write_local: bool,
    pub disk: Option<DiskWrite>,
}

impl StoragePolicy {
    /// Reads the policy from local storage. Missing or unreadable values fall
    /// back to the defaults.
    pub fn load<L: LocalStorage>(local: &L) -> Result<Self> {
        let defaults = Self::default();

        let mode = match local.get_item(keys::STORAGE_PREFERENCE)? {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!("{}; using {}", e, defaults.mode);
                defaults.mode
            }),
            None => defaults.mode,
        };
        let auto_backup = match local.get_item(keys::AUTO_BACKUP_ENABLED)? {
            Some(raw) => raw.trim() == "true",
            None => defaults.auto_backup,
        };
        let cadence = match local.get_item(keys::BACKUP_FREQUENCY)? {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!("{}; using {}", e, defaults.cadence);
                defaults.cadence
            }),
            None => defaults.cadence,
        };

        Ok(Self {
            mode,
            auto_backup,
            cadence,
        })
    }

    pub fn save<L: LocalStorage>(&self, local: &L) -> Result<()> {
        local.set_item(keys::STORAGE_PREFERENCE, self.mode.as_str())?;
        local.set_item(keys::AUTO_BACKUP_ENABLED, &self.auto_backup.to_string())?;
        local.set_item(keys::BACKUP_FREQUENCY, self.cadence.as_str())?;
        Ok(())
    }

    /// Whether an automatic backup is due. No previous backup means due.
    pub fn backup_due(&self, last_backup: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_backup {
            None => true,
            Some(last) => now.signed_duration_since(last) >= self.cadence.threshold(),
        }
    }

    pub fn plan(
        &self,
        record_count: usize,
        last_backup: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> PersistPlan {
        let has_records = record_count > 0;
        let disk = match self.mode {
            StorageMode::LocalOnly => None,
            StorageMode::DiskOnly if has_records => Some(DiskWrite::Primary),
            StorageMode::DiskOnly => None,
            StorageMode::Both
                if has_records && self.auto_backup && self.backup_due(last_backup, now) =>
            {
                Some(DiskWrite::Backup)
            }
            StorageMode::Both => None,
        };

        PersistPlan {
            write_local: self.mode.writes_local(),
            disk,
        }
    }
}

/// Last auto-backup time, stored as epoch milliseconds.
pub fn load_last_backup<L: LocalStorage>(local: &L) -> Result<Option<DateTime<Utc>>> {
    let Some(raw) = local.get_item(keys::LAST_AUTO_BACKUP)? else {
        return Ok(None);
    };
    let millis: i64 = raw.trim().parse().map_err(|_| {
        DaybookError::Store(format!("Invalid last backup timestamp: {}", raw))
    })?;
    Ok(DateTime::<Utc>::from_timestamp_millis(millis))
}

pub fn save_last_backup<L: LocalStorage>(local: &L, at: DateTime<Utc>) -> Result<()> {
    local.set_item(keys::LAST_AUTO_BACKUP, &at.timestamp_millis().to_string())
}
