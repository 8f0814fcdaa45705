//! # Remote Backend
//!
//! The hosted auth + database service used for cross-device sync. Daybook
//! needs only a handful of capabilities from it, captured by
//! [`RemoteBackend`]:
//!
//! - look up the signed-in user (if any)
//! - be told when the user signs in or out
//! - upsert rows keyed by record id, tagged with the owner's user id
//! - select every row belonging to a user
//!
//! Transport and query language stay inside the implementations:
//!
//! - [`rest::RestRemote`]: Supabase-compatible REST endpoints.
//! - [`memory::MemRemote`]: in-process tables for tests.
//!
//! Remote failures never touch the local collection. Callers log them and
//! move on; nothing is retried.

use crate::error::Result;
use crate::model::{Category, Record, Status};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use uuid::Uuid;

pub mod memory;
pub mod rest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub user: Option<RemoteUser>,
}

impl AuthEvent {
    pub fn signed_in(user: RemoteUser) -> Self {
        Self {
            kind: AuthEventKind::SignedIn,
            user: Some(user),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            kind: AuthEventKind::SignedOut,
            user: None,
        }
    }
}

pub type AuthListener = Box<dyn FnMut(&AuthEvent)>;

/// Registered auth listeners, shared by the implementations.
#[derive(Default)]
pub struct AuthListeners {
    listeners: Vec<AuthListener>,
}

impl AuthListeners {
    pub fn push(&mut self, listener: AuthListener) {
        self.listeners.push(listener);
    }

    pub fn notify(&mut self, event: &AuthEvent) {
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

pub trait RemoteBackend {
    /// The currently authenticated user, if any.
    fn session_user(&self) -> Result<Option<RemoteUser>>;

    /// Register a callback for sign-in / sign-out.
    fn subscribe(&mut self, listener: AuthListener);

    fn sign_in(&mut self, email: &str, password: &str) -> Result<AuthEvent>;

    fn sign_out(&mut self) -> Result<AuthEvent>;

    /// Insert or overwrite rows by record id. Returns the number of rows sent.
    fn upsert_records(&self, user: &RemoteUser, records: &[Record]) -> Result<usize>;

    /// Every row owned by `user`, newest first.
    fn select_records(&self, user: &RemoteUser) -> Result<Vec<Record>>;
}

/// Row shape of the remote table. Extra record fields have no column and are
/// not sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRow {
    pub id: String,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteRow {
    pub fn from_record(record: &Record, user_id: Uuid) -> Self {
        Self {
            id: record.id.clone(),
            user_id,
            date: record.date,
            title: record.title.clone(),
            category: record.category,
            description: record.description.clone(),
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    pub fn into_record(self) -> Record {
        Record {
            id: self.id,
            date: self.date,
            title: self.title,
            category: self.category,
            description: self.description,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            extra: Map::new(),
        }
    }
}
