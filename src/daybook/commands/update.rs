use crate::commands::{CmdMessage, CmdResult, Sinks};
use crate::disk::DiskSink;
use crate::error::Result;
use crate::model::RecordPatch;
use crate::records::RecordStore;
use crate::store::LocalStorage;
use chrono::{DateTime, Utc};

/// Applies `patch` to the record with `id`. An unknown id changes nothing
/// and persists nothing.
pub fn run<L: LocalStorage, D: DiskSink>(
    store: &mut RecordStore,
    sinks: &Sinks<'_, L, D>,
    id: &str,
    patch: &RecordPatch,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if patch.is_empty() {
        result.add_message(CmdMessage::warning("Nothing to update."));
        return Ok(result);
    }
    if matches!(&patch.title, Some(t) if t.trim().is_empty()) {
        result.add_message(CmdMessage::error("Title cannot be empty"));
        return Ok(result);
    }

    let Some(updated) = store.update(id, patch, now).cloned() else {
        result.add_message(CmdMessage::info(format!("No record with id {}", id)));
        return Ok(result);
    };

    sinks.persist(store, now, &mut result)?;
    result.add_message(CmdMessage::success(format!("Record updated: {}", updated.title)));
    Ok(result.with_affected_records(vec![updated]))
}
