use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::session::{save_folder, FolderHandle, Session};
use crate::store::LocalStorage;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum FolderAction {
    Show,
    Choose(PathBuf),
    Clear,
}

pub fn run<L: LocalStorage>(
    local: &L,
    session: &mut Session,
    action: FolderAction,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match action {
        FolderAction::Show => match &session.folder {
            Some(folder) => result.add_message(CmdMessage::info(format!(
                "Selected: {} ({})",
                folder.name,
                folder.path.display()
            ))),
            None => result.add_message(CmdMessage::info(
                "No folder selected. Disk saves go to the Downloads folder.",
            )),
        },
        FolderAction::Choose(path) => {
            if !path.is_dir() {
                result.add_message(CmdMessage::error(format!(
                    "Could not select folder: {} is not a directory. Using Downloads folder.",
                    path.display()
                )));
                return Ok(result);
            }
            let path = fs::canonicalize(&path)?;
            let folder = FolderHandle::from_path(path);
            save_folder(local, Some(&folder))?;
            result.add_message(CmdMessage::success(format!(
                "Folder selected successfully! ({})",
                folder.path.display()
            )));
            session.folder = Some(folder);
        }
        FolderAction::Clear => {
            save_folder(local, None)?;
            session.folder = None;
            result.add_message(CmdMessage::success(
                "Folder cleared. Disk saves go to the Downloads folder.",
            ));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::load_folder;
    use crate::store::memory::MemLocalStorage;
    use tempfile::TempDir;

    #[test]
    fn choose_then_clear() {
        let dir = TempDir::new().unwrap();
        let local = MemLocalStorage::new();
        let mut session = Session::default();

        run(&local, &mut session, FolderAction::Choose(dir.path().to_path_buf())).unwrap();
        let chosen = session.folder.clone().unwrap();
        assert_eq!(chosen.path, fs::canonicalize(dir.path()).unwrap());
        assert_eq!(load_folder(&local).unwrap(), Some(chosen));

        run(&local, &mut session, FolderAction::Clear).unwrap();
        assert!(session.folder.is_none());
        assert_eq!(load_folder(&local).unwrap(), None);
    }

    #[test]
    fn non_directory_is_refused() {
        let dir = TempDir::new().unwrap();
        let local = MemLocalStorage::new();
        let mut session = Session::default();
        let result = run(
            &local,
            &mut session,
            FolderAction::Choose(dir.path().join("missing")),
        )
        .unwrap();
        assert!(result.has_errors());
        assert!(session.folder.is_none());
        assert!(local.writes().is_empty());
    }
}
