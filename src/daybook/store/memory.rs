use super::LocalStorage;
use crate::error::{DaybookError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory local storage for tests.
///
/// Uses `RefCell` for interior mutability since daybook is single-threaded.
#[derive(Default)]
pub struct MemLocalStorage {
    items: RefCell<BTreeMap<String, String>>,
    simulate_write_error: RefCell<bool>,
    writes: RefCell<Vec<String>>,
}

impl MemLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Keys written or removed so far, in order, including repeats.
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl LocalStorage for MemLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(DaybookError::Store("Simulated write error".to_string()));
        }
        self.writes.borrow_mut().push(key.to_string());
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(DaybookError::Store("Simulated write error".to_string()));
        }
        self.writes.borrow_mut().push(key.to_string());
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.items.borrow().keys().cloned().collect())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::model::{Category, NewRecord, Record, Status};
    use chrono::{NaiveDate, TimeZone, Utc};

    /// A record with a fixed date and creation time.
    pub fn record(id: &str, category: Category, status: Status) -> Record {
        Record::new(
            id.to_string(),
            NewRecord {
                date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
                title: format!("Record {}", id),
                category,
                description: format!("Notes for {}", id),
                status,
            },
            Utc.with_ymd_and_hms(2024, 4, 2, 8, 30, 0).unwrap(),
        )
    }

    pub fn records(count: usize) -> Vec<Record> {
        (1..=count)
            .map(|i| record(&i.to_string(), Category::Work, Status::Pending))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{keys, load_records, save_records};

    #[test]
    fn records_roundtrip() {
        let local = MemLocalStorage::new();
        assert!(load_records(&local).unwrap().is_empty());

        let records = fixtures::records(3);
        save_records(&local, &records).unwrap();
        assert_eq!(load_records(&local).unwrap(), records);
        assert_eq!(local.writes(), vec![keys::RECORDS]);
    }

    #[test]
    fn removals_are_logged() {
        let local = MemLocalStorage::new();
        local.set_item("k", "v").unwrap();
        local.clear_writes();
        local.remove_item("k").unwrap();
        assert_eq!(local.writes(), vec!["k"]);
        assert_eq!(local.get_item("k").unwrap(), None);
    }

    #[test]
    fn simulated_write_error() {
        let local = MemLocalStorage::new();
        local.set_simulate_write_error(true);
        assert!(local.set_item("k", "v").is_err());
        assert_eq!(local.get_item("k").unwrap(), None);
    }
}
