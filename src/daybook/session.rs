//! Per-invocation session state: who is signed in and which folder receives
//! disk writes. Built once at startup and passed to the operations that need
//! it.

use crate::error::Result;
use crate::remote::{AuthEvent, AuthEventKind, RemoteUser};
use crate::store::{keys, LocalStorage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// A folder the user picked for disk writes. Stored as JSON under
/// [`keys::SAVE_FOLDER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderHandle {
    pub name: String,
    pub path: PathBuf,
}

impl FolderHandle {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<RemoteUser>,
    pub folder: Option<FolderHandle>,
}

impl Session {
    pub fn new(user: Option<RemoteUser>, folder: Option<FolderHandle>) -> Self {
        Self { user, folder }
    }

    pub fn apply(&mut self, event: &AuthEvent) {
        match event.kind {
            AuthEventKind::SignedIn => self.user = event.user.clone(),
            AuthEventKind::SignedOut => self.user = None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Restores the chosen folder. An unreadable descriptor is dropped with a
/// warning; the user can pick the folder again.
pub fn load_folder<L: LocalStorage>(local: &L) -> Result<Option<FolderHandle>> {
    let Some(raw) = local.get_item(keys::SAVE_FOLDER)? else {
        return Ok(None);
    };
    match serde_json::from_str::<FolderHandle>(&raw) {
        Ok(folder) => Ok(Some(folder)),
        Err(e) => {
            warn!("Ignoring unreadable folder descriptor: {}", e);
            Ok(None)
        }
    }
}

pub fn save_folder<L: LocalStorage>(local: &L, folder: Option<&FolderHandle>) -> Result<()> {
    match folder {
        Some(folder) => local.set_item(keys::SAVE_FOLDER, &serde_json::to_string(folder)?),
        None => local.remove_item(keys::SAVE_FOLDER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemLocalStorage;
    use uuid::Uuid;

    #[test]
    fn folder_descriptor_roundtrip() {
        let local = MemLocalStorage::new();
        assert_eq!(load_folder(&local).unwrap(), None);

        let folder = FolderHandle::from_path(PathBuf::from("/home/me/records"));
        assert_eq!(folder.name, "records");
        save_folder(&local, Some(&folder)).unwrap();
        assert_eq!(load_folder(&local).unwrap(), Some(folder));

        save_folder(&local, None).unwrap();
        assert_eq!(load_folder(&local).unwrap(), None);
    }

    #[test]
    fn corrupt_descriptor_is_ignored() {
        let local = MemLocalStorage::new();
        local.set_item(keys::SAVE_FOLDER, "not json").unwrap();
        assert_eq!(load_folder(&local).unwrap(), None);
    }

    #[test]
    fn auth_events_update_user() {
        let mut session = Session::default();
        let user = RemoteUser {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
        };
        session.apply(&AuthEvent::signed_in(user.clone()));
        assert_eq!(session.user, Some(user));
        session.apply(&AuthEvent::signed_out());
        assert!(!session.is_signed_in());
    }
}
