use crate::config::DaybookConfig;
use crate::disk::DiskSink;
use crate::error::Result;
use crate::model::Record;
use crate::persist::{self, PersistReport};
use crate::policy::StoragePolicy;
use crate::reconcile::ReconcileSummary;
use crate::records::RecordStore;
use crate::session::Session;
use crate::store::LocalStorage;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub mod auth;
pub mod clear;
pub mod config;
pub mod create;
pub mod delete;
pub mod export;
pub mod folder;
pub mod import;
pub mod init;
pub mod list;
pub mod save;
pub mod settings;
pub mod status;
pub mod sync;
pub mod update;
pub mod view;

#[derive(Debug, Clone)]
pub struct DaybookPaths {
    pub data_dir: PathBuf,
}

/// Everything a persist-trigger writes to, borrowed for one command.
pub struct Sinks<'a, L: LocalStorage, D: DiskSink> {
    pub local: &'a L,
    pub disk: &'a D,
    pub session: &'a Session,
    pub policy: &'a StoragePolicy,
}

impl<'a, L: LocalStorage, D: DiskSink> Sinks<'a, L, D> {
    /// Persists the whole collection and folds any disk warnings into
    /// `result`.
    pub fn persist(
        &self,
        store: &RecordStore,
        now: DateTime<Utc>,
        result: &mut CmdResult,
    ) -> Result<()> {
        let report = persist::run(
            store.records(),
            self.local,
            self.disk,
            self.session,
            self.policy,
            now,
        )?;
        for warning in &report.warnings {
            result.add_message(CmdMessage::warning(warning.clone()));
        }
        result.persisted = Some(report);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<Record>,
    pub listed_records: Vec<Record>,
    pub config: Option<DaybookConfig>,
    pub status: Option<status::StorageStatus>,
    pub reconciled: Option<ReconcileSummary>,
    /// Set when the command fired a persist-trigger.
    pub persisted: Option<PersistReport>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected_records(mut self, records: Vec<Record>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<Record>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_config(mut self, config: DaybookConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_status(mut self, status: status::StorageStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level == MessageLevel::Error)
    }
}
