use crate::codec::csv::build_csv;
use crate::commands::{CmdMessage, CmdResult};
use crate::disk::DiskSink;
use crate::error::Result;
use crate::persist::daily_file_name;
use crate::records::RecordStore;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Exports the collection as CSV. Without `output` the file goes to the
/// downloads location as `daily-records-YYYY-MM-DD.csv`.
pub fn run<D: DiskSink>(
    store: &RecordStore,
    disk: &D,
    output: Option<&Path>,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if store.is_empty() {
        result.add_message(CmdMessage::error("No records to export!"));
        return Ok(result);
    }

    let content = build_csv(store.records(), now);
    let written = match output {
        Some(path) => {
            let folder = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| daily_file_name(now));
            disk.write_in_folder(folder, &file_name, &content)?
        }
        None => disk.download(&daily_file_name(now), &content)?,
    };

    result.add_message(CmdMessage::success(format!(
        "Exported {} records to CSV successfully! ({})",
        store.len(),
        written.display()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::now;
    use crate::disk::memory::{MemDiskSink, WriteTarget};
    use crate::store::memory::fixtures;
    use std::path::PathBuf;

    #[test]
    fn empty_collection_is_refused() {
        let disk = MemDiskSink::new();
        let result = run(&RecordStore::new(), &disk, None, now()).unwrap();
        assert_eq!(result.messages[0].content, "No records to export!");
        assert!(result.has_errors());
        assert_eq!(disk.write_count(), 0);
    }

    #[test]
    fn downloads_dated_file() {
        let disk = MemDiskSink::new();
        let store = RecordStore::from_records(fixtures::records(2));
        run(&store, &disk, None, now()).unwrap();

        let write = disk.last_write().unwrap();
        assert_eq!(write.target, WriteTarget::Download);
        assert_eq!(write.path, PathBuf::from("/downloads/daily-records-2024-09-01.csv"));
        assert_eq!(write.content.split("\r\n").count(), 3);
        assert!(write.content.ends_with("\"2024-09-01T10:00:00Z\""));
    }

    #[test]
    fn explicit_output_path() {
        let disk = MemDiskSink::new();
        let store = RecordStore::from_records(fixtures::records(1));
        run(&store, &disk, Some(Path::new("/tmp/out/mine.csv")), now()).unwrap();

        let write = disk.last_write().unwrap();
        assert_eq!(write.target, WriteTarget::Folder);
        assert_eq!(write.path, PathBuf::from("/tmp/out/mine.csv"));
    }
}
