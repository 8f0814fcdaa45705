use crate::commands::{CmdMessage, CmdResult, Sinks};
use crate::disk::DiskSink;
use crate::error::Result;
use crate::records::RecordStore;
use crate::store::LocalStorage;
use chrono::{DateTime, Utc};

pub fn run<L: LocalStorage, D: DiskSink, I: AsRef<str>>(
    store: &mut RecordStore,
    sinks: &Sinks<'_, L, D>,
    ids: &[I],
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut removed = Vec::new();

    for id in ids {
        let id = id.as_ref();
        match store.remove(id) {
            Some(record) => {
                result.add_message(CmdMessage::success(format!(
                    "Record deleted: {}",
                    record.title
                )));
                removed.push(record);
            }
            None => result.add_message(CmdMessage::info(format!("No record with id {}", id))),
        }
    }

    if !removed.is_empty() {
        sinks.persist(store, now, &mut result)?;
    }
    Ok(result.with_affected_records(removed))
}
