//! # Disk Sink
//!
//! Where CSV copies of the collection land. There are two targets:
//!
//! 1. **Folder**: a directory the user chose with `daybook folder`. The file
//!    is created (or overwritten) inside it.
//! 2. **Download**: the downloads directory. Always available; used whenever
//!    there is no chosen folder or writing into it fails.
//!
//! [`crate::persist::write_csv`] owns the fallback order; implementations just
//! perform the writes.

use crate::error::Result;
use std::path::{Path, PathBuf};

pub mod fs;
pub mod memory;

pub trait DiskSink {
    /// Create or overwrite `file_name` inside `folder` and write `content`.
    fn write_in_folder(&self, folder: &Path, file_name: &str, content: &str) -> Result<PathBuf>;

    /// Write `content` as `file_name` in the downloads location.
    fn download(&self, file_name: &str, content: &str) -> Result<PathBuf>;

    /// Contents of a file written earlier, or `None` if it is gone.
    fn read_file(&self, path: &Path) -> Result<Option<String>>;
}
