//! # API Facade
//!
//! Single entry point for daybook operations, whatever the UI. It owns the
//! session's state (record store, storage policy, session, config) and the
//! three collaborators, and hands the right pieces to each command.
//!
//! The facade adds two things commands don't do themselves:
//! - **Auto-sync**: when `auto-sync` is on and someone is signed in, every
//!   command that persisted also upserts the collection remotely. Failures
//!   become warnings; the local write already happened.
//! - **Auth events**: the facade subscribes to the remote backend and folds
//!   sign-in / sign-out events into the [`Session`].
//!
//! No stdout, no exit codes: everything comes back as a [`CmdResult`].
//!
//! `DaybookApi<L, D, R>` is generic over all three collaborators, so tests
//! run it against [`crate::store::memory`], [`crate::disk::memory`] and
//! [`crate::remote::memory`].

use crate::commands::{self, Sinks};
use crate::config::DaybookConfig;
use crate::disk::DiskSink;
use crate::error::Result;
use crate::model::{NewRecord, RecordPatch};
use crate::persist;
use crate::policy::{load_last_backup, StoragePolicy};
use crate::reconcile::ReconcileMode;
use crate::records::{RecordFilter, RecordStore};
use crate::remote::{AuthEvent, RemoteBackend};
use crate::session::{load_folder, Session};
use crate::store::LocalStorage;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, warn};

pub type Clock = fn() -> DateTime<Utc>;

pub struct DaybookApi<L: LocalStorage, D: DiskSink, R: RemoteBackend> {
    store: RecordStore,
    local: L,
    disk: D,
    remote: R,
    session: Session,
    policy: StoragePolicy,
    config: DaybookConfig,
    paths: commands::DaybookPaths,
    auth_events: Rc<RefCell<Vec<AuthEvent>>>,
    clock: Clock,
}

impl<L: LocalStorage, D: DiskSink, R: RemoteBackend> DaybookApi<L, D, R> {
    /// Restores the policy, the collection, the chosen folder and the signed-in
    /// user from the collaborators.
    pub fn open(
        local: L,
        disk: D,
        mut remote: R,
        config: DaybookConfig,
        paths: commands::DaybookPaths,
    ) -> Result<Self> {
        let policy = StoragePolicy::load(&local)?;
        let records = persist::load_collection(&local, &disk, &policy)?;
        let folder = load_folder(&local)?;
        let user = remote.session_user().unwrap_or_else(|e| {
            warn!("Could not restore remote session: {}", e);
            None
        });
        debug!(records = records.len(), mode = %policy.mode, signed_in = user.is_some(), "opened");

        let auth_events = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&auth_events);
        remote.subscribe(Box::new(move |event: &AuthEvent| {
            queue.borrow_mut().push(event.clone());
        }));

        Ok(Self {
            store: RecordStore::from_records(records),
            local,
            disk,
            remote,
            session: Session::new(user, folder),
            policy,
            config,
            paths,
            auth_events,
            clock: Utc::now,
        })
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// The store mutably, plus everything a persist-trigger writes to.
    fn split(&mut self) -> (&mut RecordStore, Sinks<'_, L, D>) {
        (
            &mut self.store,
            Sinks {
                local: &self.local,
                disk: &self.disk,
                session: &self.session,
                policy: &self.policy,
            },
        )
    }

    fn sinks(&self) -> Sinks<'_, L, D> {
        Sinks {
            local: &self.local,
            disk: &self.disk,
            session: &self.session,
            policy: &self.policy,
        }
    }

    pub fn create_record(&mut self, draft: NewRecord) -> Result<commands::CmdResult> {
        let now = self.now();
        let (store, sinks) = self.split();
        let result = commands::create::run(store, &sinks, draft, now)?;
        Ok(self.after_mutation(result))
    }

    pub fn list_records(&self, filter: &RecordFilter) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, filter)
    }

    pub fn view_records<I: AsRef<str>>(&self, ids: &[I]) -> Result<commands::CmdResult> {
        commands::view::run(&self.store, ids)
    }

    pub fn update_record(&mut self, id: &str, patch: &RecordPatch) -> Result<commands::CmdResult> {
        let now = self.now();
        let (store, sinks) = self.split();
        let result = commands::update::run(store, &sinks, id, patch, now)?;
        Ok(self.after_mutation(result))
    }

    pub fn delete_records<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<commands::CmdResult> {
        let now = self.now();
        let (store, sinks) = self.split();
        let result = commands::delete::run(store, &sinks, ids, now)?;
        Ok(self.after_mutation(result))
    }

    pub fn clear_records(&mut self, confirmed: bool) -> Result<commands::CmdResult> {
        let now = self.now();
        let (store, sinks) = self.split();
        let result = commands::clear::run(store, &sinks, confirmed, now)?;
        Ok(self.after_mutation(result))
    }

    pub fn import_file(&mut self, path: &Path, mode: ReconcileMode) -> Result<commands::CmdResult> {
        let now = self.now();
        let (store, sinks) = self.split();
        let result = commands::import::run(store, &sinks, path, mode, now)?;
        Ok(self.after_mutation(result))
    }

    pub fn export_csv(&self, output: Option<&Path>) -> Result<commands::CmdResult> {
        commands::export::run(&self.store, &self.disk, output, self.now())
    }

    pub fn save_to_disk(&self) -> Result<commands::CmdResult> {
        commands::save::run(&self.store, &self.local, &self.disk, &self.session, self.now())
    }

    pub fn settings(&mut self, change: SettingsChange) -> Result<commands::CmdResult> {
        let now = self.now();
        commands::settings::run(
            &self.store,
            &self.local,
            &self.disk,
            &self.session,
            &mut self.policy,
            change,
            now,
        )
    }

    pub fn folder(&mut self, action: FolderAction) -> Result<commands::CmdResult> {
        commands::folder::run(&self.local, &mut self.session, action)
    }

    pub fn status(&self) -> Result<commands::CmdResult> {
        let last_backup = load_last_backup(&self.local).unwrap_or(None);
        commands::status::run(&self.store, &self.policy, &self.session, last_backup)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<commands::CmdResult> {
        let result = commands::auth::login(&mut self.remote, email, password)?;
        self.apply_auth_events();
        Ok(result)
    }

    pub fn logout(&mut self) -> Result<commands::CmdResult> {
        let result = commands::auth::logout(&mut self.remote, &self.session)?;
        self.apply_auth_events();
        Ok(result)
    }

    pub fn whoami(&self) -> Result<commands::CmdResult> {
        commands::auth::whoami(&self.session)
    }

    pub fn sync_push(&self) -> Result<commands::CmdResult> {
        commands::sync::push(&self.store, &self.remote, &self.sinks())
    }

    pub fn sync_pull(&mut self, mode: ReconcileMode) -> Result<commands::CmdResult> {
        let now = self.now();
        let sinks = Sinks {
            local: &self.local,
            disk: &self.disk,
            session: &self.session,
            policy: &self.policy,
        };
        commands::sync::pull(&mut self.store, &self.remote, &sinks, mode, now)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn init(&self) -> Result<commands::CmdResult> {
        commands::init::run(&self.paths)
    }

    pub fn paths(&self) -> &commands::DaybookPaths {
        &self.paths
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn policy(&self) -> &StoragePolicy {
        &self.policy
    }

    pub fn records(&self) -> &RecordStore {
        &self.store
    }

    fn apply_auth_events(&mut self) {
        let events: Vec<AuthEvent> = self.auth_events.borrow_mut().drain(..).collect();
        for event in &events {
            debug!(kind = ?event.kind, "auth event");
            self.session.apply(event);
        }
    }

    /// Mirrors the collection to the remote after a persist, when enabled.
    fn after_mutation(&self, mut result: commands::CmdResult) -> commands::CmdResult {
        if result.persisted.is_none() || !self.config.auto_sync {
            return result;
        }
        let Some(user) = self.session.user.as_ref() else {
            return result;
        };
        match self.remote.upsert_records(user, self.store.records()) {
            Ok(sent) => debug!(sent, "auto-synced"),
            Err(e) => {
                warn!("Auto-sync failed: {}", e);
                result.add_message(CmdMessage::warning(format!("Cloud sync failed: {}", e)));
            }
        }
        result
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::folder::FolderAction;
pub use crate::commands::settings::SettingsChange;
pub use commands::{CmdMessage, CmdResult, DaybookPaths, MessageLevel};
