use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::records::RecordStore;

pub fn run<I: AsRef<str>>(store: &RecordStore, ids: &[I]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for id in ids {
        let id = id.as_ref();
        match store.get(id) {
            Some(record) => result.listed_records.push(record.clone()),
            None => result.add_message(CmdMessage::info(format!("No record with id {}", id))),
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Status};
    use crate::store::memory::fixtures::record;

    #[test]
    fn unknown_ids_are_reported_not_fatal() {
        let store = RecordStore::from_records(vec![record("1", Category::Other, Status::Pending)]);
        let result = run(&store, &["1", "9"]).unwrap();
        assert_eq!(result.listed_records.len(), 1);
        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].content.contains('9'));
    }
}
