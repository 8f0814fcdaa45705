use super::{AuthEvent, AuthListener, AuthListeners, RemoteBackend, RemoteRow, RemoteUser};
use crate::error::{DaybookError, Result};
use crate::model::Record;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use uuid::Uuid;

type Table = Rc<RefCell<HashMap<String, RemoteRow>>>;

/// In-process remote for tests.
///
/// Two instances built with [`MemRemote::sharing_table`] see the same rows,
/// which is how tests model two devices syncing through one account.
#[derive(Default)]
pub struct MemRemote {
    accounts: HashMap<String, (String, RemoteUser)>,
    current: Option<RemoteUser>,
    table: Table,
    listeners: AuthListeners,
    fail_requests: RefCell<bool>,
}

impl MemRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sharing_table(other: &MemRemote) -> Self {
        Self {
            accounts: other.accounts.clone(),
            table: Rc::clone(&other.table),
            ..Default::default()
        }
    }

    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        let user = RemoteUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
        };
        self.accounts
            .insert(email.to_string(), (password.to_string(), user));
        self
    }

    /// Start out signed in as `email` (which must have an account).
    pub fn signed_in_as(mut self, email: &str) -> Self {
        self.current = self.accounts.get(email).map(|(_, user)| user.clone());
        self
    }

    pub fn set_fail_requests(&self, fail: bool) {
        *self.fail_requests.borrow_mut() = fail;
    }

    pub fn row_count(&self) -> usize {
        self.table.borrow().len()
    }

    pub fn rows(&self) -> Vec<RemoteRow> {
        self.table.borrow().values().cloned().collect()
    }

    fn check_available(&self) -> Result<()> {
        if *self.fail_requests.borrow() {
            return Err(DaybookError::Remote("Simulated network failure".into()));
        }
        Ok(())
    }
}

impl RemoteBackend for MemRemote {
    fn session_user(&self) -> Result<Option<RemoteUser>> {
        Ok(self.current.clone())
    }

    fn subscribe(&mut self, listener: AuthListener) {
        self.listeners.push(listener);
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<AuthEvent> {
        self.check_available()?;
        let user = match self.accounts.get(email) {
            Some((expected, user)) if expected == password => user.clone(),
            _ => return Err(DaybookError::Remote("Invalid login credentials".into())),
        };
        self.current = Some(user.clone());
        let event = AuthEvent::signed_in(user);
        self.listeners.notify(&event);
        Ok(event)
    }

    fn sign_out(&mut self) -> Result<AuthEvent> {
        self.current = None;
        let event = AuthEvent::signed_out();
        self.listeners.notify(&event);
        Ok(event)
    }

    fn upsert_records(&self, user: &RemoteUser, records: &[Record]) -> Result<usize> {
        self.check_available()?;
        let mut table = self.table.borrow_mut();
        for record in records {
            table.insert(record.id.clone(), RemoteRow::from_record(record, user.id));
        }
        Ok(records.len())
    }

    fn select_records(&self, user: &RemoteUser) -> Result<Vec<Record>> {
        self.check_available()?;
        let mut rows: Vec<RemoteRow> = self
            .table
            .borrow()
            .values()
            .filter(|row| row.user_id == user.id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rows.into_iter().map(RemoteRow::into_record).collect())
    }
}
