use crate::commands::{CmdMessage, CmdResult, Sinks};
use crate::disk::DiskSink;
use crate::error::{DaybookError, Result};
use crate::model::{NewRecord, Record};
use crate::records::RecordStore;
use crate::store::LocalStorage;
use chrono::{DateTime, Utc};

pub fn run<L: LocalStorage, D: DiskSink>(
    store: &mut RecordStore,
    sinks: &Sinks<'_, L, D>,
    draft: NewRecord,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    if draft.title.trim().is_empty() {
        return Err(DaybookError::Api("Title cannot be empty".into()));
    }

    let id = store.next_id(now);
    let record = Record::new(id, draft, now);
    store.add(record.clone());

    let mut result = CmdResult::default();
    sinks.persist(store, now, &mut result)?;
    result.add_message(CmdMessage::success(format!(
        "Record added: {} ({})",
        record.title, record.id
    )));
    Ok(result.with_affected_records(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{now, Fixture};
    use crate::model::{Category, Status};
    use crate::store::{keys, load_records};
    use chrono::NaiveDate;

    fn draft(title: &str) -> NewRecord {
        NewRecord {
            date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            title: title.into(),
            category: Category::Health,
            description: "5k".into(),
            status: Status::Completed,
        }
    }

    #[test]
    fn adds_and_persists() {
        let fx = Fixture::new();
        let mut store = RecordStore::new();
        let result = run(&mut store, &fx.sinks(), draft("Run"), now()).unwrap();

        assert_eq!(store.len(), 1);
        let record = &result.affected_records[0];
        assert_eq!(record.id, now().timestamp_millis().to_string());
        assert_eq!(record.created_at, now());
        assert!(result.persisted.is_some());
        assert_eq!(load_records(&fx.local).unwrap(), store.records());
        assert_eq!(fx.local.writes(), vec![keys::RECORDS]);
    }

    #[test]
    fn same_millisecond_gets_distinct_ids() {
        let fx = Fixture::new();
        let mut store = RecordStore::new();
        run(&mut store, &fx.sinks(), draft("a"), now()).unwrap();
        run(&mut store, &fx.sinks(), draft("b"), now()).unwrap();
        assert_ne!(store.records()[0].id, store.records()[1].id);
        assert_eq!(store.records()[0].title, "b");
    }

    #[test]
    fn rejects_blank_title() {
        let fx = Fixture::new();
        let mut store = RecordStore::new();
        assert!(run(&mut store, &fx.sinks(), draft("  "), now()).is_err());
        assert!(store.is_empty());
        assert!(fx.local.writes().is_empty());
    }
}
