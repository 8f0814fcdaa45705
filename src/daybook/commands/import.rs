use crate::codec::{self, ImportFormat};
use crate::commands::{CmdMessage, CmdResult, Sinks};
use crate::disk::DiskSink;
use crate::error::{DaybookError, Result};
use crate::reconcile::{reconcile, ReconcileMode};
use crate::records::RecordStore;
use crate::store::LocalStorage;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use tracing::info;

/// Reads a JSON or CSV file and folds it into the collection.
///
/// A malformed file fails the whole import. An empty one is reported and
/// leaves the collection alone.
pub fn run<L: LocalStorage, D: DiskSink>(
    store: &mut RecordStore,
    sinks: &Sinks<'_, L, D>,
    path: &Path,
    mode: ReconcileMode,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let content = fs::read_to_string(path).map_err(|e| {
        DaybookError::InvalidImport(format!("could not read {}: {}", path.display(), e))
    })?;
    let incoming = codec::parse_import(ImportFormat::from_path(path), &content)?;

    let mut result = CmdResult::default();
    if incoming.is_empty() {
        result.add_message(CmdMessage::error("No records found in file!"));
        return Ok(result);
    }

    let found = incoming.len();
    let outcome = reconcile(store.records(), incoming, mode);
    let summary = outcome.summary();
    store.replace_all(outcome.records);
    info!(%mode, found, added = summary.added, skipped = summary.skipped, "imported");

    sinks.persist(store, now, &mut result)?;
    result.add_message(CmdMessage::success(match mode {
        ReconcileMode::Merge => format!(
            "Merged {} new records. {} duplicates skipped.",
            summary.added, summary.skipped
        ),
        ReconcileMode::Replace => format!("Imported {} records (replaced existing)!", summary.added),
    }));
    result.reconciled = Some(summary);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::csv::build_csv;
    use crate::commands::testing::{now, Fixture};
    use crate::model::{Category, Status};
    use crate::store::load_records;
    use crate::store::memory::fixtures::record;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn merge_keeps_local_copy() {
        let dir = TempDir::new().unwrap();
        let incoming = vec![
            record("1", Category::Work, Status::Completed),
            record("2", Category::Work, Status::Pending),
        ];
        let path = write(&dir, "in.json", &serde_json::to_string(&incoming).unwrap());

        let fx = Fixture::new();
        let mut store = RecordStore::from_records(vec![record("1", Category::Work, Status::Pending)]);
        let result = run(&mut store, &fx.sinks(), &path, ReconcileMode::Merge, now()).unwrap();

        assert_eq!(
            result.messages.last().unwrap().content,
            "Merged 1 new records. 1 duplicates skipped."
        );
        let saved = load_records(&fx.local).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].status, Status::Pending);
        assert_eq!(saved[1].id, "2");
    }

    #[test]
    fn replace_from_wrapped_json() {
        let dir = TempDir::new().unwrap();
        let incoming = vec![record("9", Category::Health, Status::Pending)];
        let body = serde_json::json!({ "records": incoming, "exportDate": "2024-01-01" });
        let path = write(&dir, "backup.json", &body.to_string());

        let fx = Fixture::new();
        let mut store = RecordStore::from_records(vec![record("1", Category::Work, Status::Pending)]);
        let result = run(&mut store, &fx.sinks(), &path, ReconcileMode::Replace, now()).unwrap();

        assert_eq!(store.records(), incoming.as_slice());
        assert_eq!(
            result.messages.last().unwrap().content,
            "Imported 1 records (replaced existing)!"
        );
    }

    #[test]
    fn imports_exported_csv() {
        let dir = TempDir::new().unwrap();
        let incoming = vec![record("5", Category::Learning, Status::InProgress)];
        let path = write(&dir, "daily-records-2024-09-01.csv", &build_csv(&incoming, now()));

        let fx = Fixture::new();
        let mut store = RecordStore::new();
        run(&mut store, &fx.sinks(), &path, ReconcileMode::Merge, now()).unwrap();
        assert_eq!(store.records(), incoming.as_slice());
    }

    #[test]
    fn empty_file_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty.json", "[]");

        let fx = Fixture::new();
        let mut store = RecordStore::from_records(vec![record("1", Category::Work, Status::Pending)]);
        let result = run(&mut store, &fx.sinks(), &path, ReconcileMode::Replace, now()).unwrap();

        assert!(result.has_errors());
        assert_eq!(result.messages[0].content, "No records found in file!");
        assert_eq!(store.len(), 1);
        assert!(fx.local.writes().is_empty());
    }

    #[test]
    fn malformed_file_is_rejected_whole() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.json", r#"{"items": []}"#);

        let fx = Fixture::new();
        let mut store = RecordStore::new();
        let err = run(&mut store, &fx.sinks(), &path, ReconcileMode::Merge, now()).unwrap_err();
        assert!(matches!(err, DaybookError::InvalidImport(_)));
        assert!(fx.local.writes().is_empty());
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let fx = Fixture::new();
        let mut store = RecordStore::new();
        let err = run(
            &mut store,
            &fx.sinks(),
            Path::new("/definitely/not/here.json"),
            ReconcileMode::Merge,
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, DaybookError::InvalidImport(_)));
    }
}
