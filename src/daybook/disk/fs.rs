use super::DiskSink;
use crate::error::{DaybookError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct FsDiskSink {
    downloads_dir: PathBuf,
}

impl FsDiskSink {
    pub fn new(downloads_dir: PathBuf) -> Self {
        Self { downloads_dir }
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }
}

impl DiskSink for FsDiskSink {
    fn write_in_folder(&self, folder: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
        // A chosen folder is never recreated.
        if !folder.is_dir() {
            return Err(DaybookError::Store(format!(
                "Folder is not available: {}",
                folder.display()
            )));
        }
        let path = folder.join(file_name);
        fs::write(&path, content).map_err(DaybookError::Io)?;
        Ok(path)
    }

    fn download(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        if !self.downloads_dir.exists() {
            fs::create_dir_all(&self.downloads_dir).map_err(DaybookError::Io)?;
        }
        let path = self.downloads_dir.join(file_name);
        fs::write(&path, content).map_err(DaybookError::Io)?;
        Ok(path)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_into_existing_folder() {
        let dir = TempDir::new().unwrap();
        let sink = FsDiskSink::new(dir.path().join("downloads"));
        let path = sink.write_in_folder(dir.path(), "a.csv", "x").unwrap();
        assert_eq!(path, dir.path().join("a.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "x");
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = TempDir::new().unwrap();
        let sink = FsDiskSink::new(dir.path().join("downloads"));
        let gone = dir.path().join("gone");
        assert!(sink.write_in_folder(&gone, "a.csv", "x").is_err());
        assert!(!gone.exists());
    }

    #[test]
    fn download_creates_directory() {
        let dir = TempDir::new().unwrap();
        let sink = FsDiskSink::new(dir.path().join("downloads"));
        let path = sink.download("b.csv", "y").unwrap();
        assert_eq!(path, dir.path().join("downloads").join("b.csv"));
        assert_eq!(sink.read_file(&path).unwrap().as_deref(), Some("y"));
        assert_eq!(sink.read_file(&dir.path().join("nope.csv")).unwrap(), None);
    }
}
