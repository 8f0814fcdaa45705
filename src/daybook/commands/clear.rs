use crate::commands::{CmdMessage, CmdResult, Sinks};
use crate::disk::DiskSink;
use crate::error::Result;
use crate::records::RecordStore;
use crate::store::LocalStorage;
use chrono::{DateTime, Utc};

/// Deletes every record. `confirmed` must be true; the caller is responsible
/// for asking.
pub fn run<L: LocalStorage, D: DiskSink>(
    store: &mut RecordStore,
    sinks: &Sinks<'_, L, D>,
    confirmed: bool,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if store.is_empty() {
        result.add_message(CmdMessage::info("No records to clear."));
        return Ok(result);
    }
    if !confirmed {
        result.add_message(CmdMessage::info("Operation cancelled."));
        return Ok(result);
    }

    let count = store.len();
    store.replace_all(Vec::new());
    sinks.persist(store, now, &mut result)?;
    result.add_message(CmdMessage::success(format!(
        "All records cleared! ({} removed)",
        count
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{now, Fixture};
    use crate::store::load_records;
    use crate::store::memory::fixtures;

    #[test]
    fn requires_confirmation() {
        let fx = Fixture::new();
        let mut store = RecordStore::from_records(fixtures::records(2));
        let result = run(&mut store, &fx.sinks(), false, now()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(result.persisted.is_none());
    }

    #[test]
    fn clears_and_persists_empty_collection() {
        let fx = Fixture::new();
        let mut store = RecordStore::from_records(fixtures::records(2));
        run(&mut store, &fx.sinks(), true, now()).unwrap();
        assert!(store.is_empty());
        assert!(load_records(&fx.local).unwrap().is_empty());
    }
}
