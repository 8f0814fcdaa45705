//! # Record Store
//!
//! The in-memory collection of records for one session. This is the source of
//! truth while the program runs: local storage, disk exports and the remote
//! table are mirrors written from here (see [`crate::persist`]).
//!
//! The store itself never persists anything. Mutations report whether the
//! collection changed so the command layer knows when to fire a
//! persist-trigger. Lookups by an unknown id are quiet no-ops.
//!
//! New records go to the front of the list, so the natural order is
//! most-recent-first. Nothing else about the order is meaningful.

use crate::model::{Category, Record, RecordPatch, Status};
use chrono::{DateTime, Utc};

/// Category and/or status selection for listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub category: Option<Category>,
    pub status: Option<Status>,
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        self.category.map_or(true, |c| record.category == c)
            && self.status.map_or(true, |s| record.status == s)
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.status.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Millisecond timestamp of `now` as an id, bumped until it is free.
    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut candidate = now.timestamp_millis();
        while self.contains(&candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    pub fn add(&mut self, record: Record) {
        self.records.insert(0, record);
    }

    /// Applies `patch` to the record with `id`. Returns the updated record, or
    /// `None` when there is no such record.
    pub fn update(&mut self, id: &str, patch: &RecordPatch, now: DateTime<Utc>) -> Option<&Record> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        patch.apply(record, now);
        Some(record)
    }

    /// Removes the record with `id`, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Record> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(pos))
    }

    pub fn replace_all(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn filter(&self, filter: &RecordFilter) -> Vec<&Record> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewRecord;
    use chrono::{NaiveDate, TimeZone};

    fn record(id: &str, category: Category, status: Status) -> Record {
        Record::new(
            id.into(),
            NewRecord {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                title: format!("Record {}", id),
                category,
                description: String::new(),
                status,
            },
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn add_prepends() {
        let mut store = RecordStore::new();
        store.add(record("1", Category::Work, Status::Pending));
        store.add(record("2", Category::Work, Status::Pending));
        let ids: Vec<_> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn update_missing_id_is_noop() {
        let mut store = RecordStore::from_records(vec![record("1", Category::Work, Status::Pending)]);
        let patch = RecordPatch {
            title: Some("changed".into()),
            ..Default::default()
        };
        assert!(store.update("404", &patch, Utc::now()).is_none());
        assert_eq!(store.records()[0].title, "Record 1");
        assert!(store.records()[0].updated_at.is_none());
    }

    #[test]
    fn update_stamps_updated_at() {
        let mut store = RecordStore::from_records(vec![record("1", Category::Work, Status::Pending)]);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let patch = RecordPatch {
            status: Some(Status::Completed),
            ..Default::default()
        };
        let updated = store.update("1", &patch, now).unwrap();
        assert_eq!(updated.status, Status::Completed);
        assert_eq!(updated.updated_at, Some(now));
        assert_eq!(updated.id, "1");
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut store = RecordStore::from_records(vec![record("1", Category::Work, Status::Pending)]);
        assert!(store.remove("2").is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove("1").map(|r| r.id), Some("1".to_string()));
        assert!(store.is_empty());
    }

    #[test]
    fn filter_by_category_and_status() {
        let store = RecordStore::from_records(vec![
            record("1", Category::Work, Status::Pending),
            record("2", Category::Health, Status::Pending),
            record("3", Category::Work, Status::Completed),
        ]);

        let work = store.filter(&RecordFilter {
            category: Some(Category::Work),
            status: None,
        });
        assert_eq!(work.len(), 2);

        let done_work = store.filter(&RecordFilter {
            category: Some(Category::Work),
            status: Some(Status::Completed),
        });
        assert_eq!(done_work.len(), 1);
        assert_eq!(done_work[0].id, "3");

        assert_eq!(store.filter(&RecordFilter::default()).len(), 3);
    }

    #[test]
    fn next_id_skips_taken_ids() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let store = RecordStore::from_records(vec![
            record("1700000000000", Category::Work, Status::Pending),
            record("1700000000001", Category::Work, Status::Pending),
        ]);
        assert_eq!(store.next_id(now), "1700000000002");
    }
}
