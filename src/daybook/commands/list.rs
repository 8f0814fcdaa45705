use crate::commands::CmdResult;
use crate::error::Result;
use crate::records::{RecordFilter, RecordStore};

pub fn run(store: &RecordStore, filter: &RecordFilter) -> Result<CmdResult> {
    let listed = store.filter(filter).into_iter().cloned().collect();
    Ok(CmdResult::default().with_listed_records(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Status};
    use crate::store::memory::fixtures::record;

    #[test]
    fn keeps_store_order_and_filters() {
        let store = RecordStore::from_records(vec![
            record("3", Category::Work, Status::Completed),
            record("2", Category::Personal, Status::Pending),
            record("1", Category::Work, Status::Pending),
        ]);

        let all = run(&store, &RecordFilter::default()).unwrap();
        let ids: Vec<_> = all.listed_records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);

        let pending_work = run(
            &store,
            &RecordFilter {
                category: Some(Category::Work),
                status: Some(Status::Pending),
            },
        )
        .unwrap();
        assert_eq!(pending_work.listed_records.len(), 1);
        assert_eq!(pending_work.listed_records[0].id, "1");
    }
}
