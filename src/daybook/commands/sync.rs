//! Push and pull against the remote table.
//!
//! Both need a signed-in user. The local collection stays authoritative:
//! a failed push changes nothing locally, and a pull goes through the same
//! reconciliation as a file import.

use crate::commands::{CmdMessage, CmdResult, Sinks};
use crate::disk::DiskSink;
use crate::error::{DaybookError, Result};
use crate::reconcile::{reconcile, ReconcileMode};
use crate::records::RecordStore;
use crate::remote::RemoteBackend;
use crate::store::LocalStorage;
use chrono::{DateTime, Utc};
use tracing::info;

pub fn push<R: RemoteBackend, L: LocalStorage, D: DiskSink>(
    store: &RecordStore,
    remote: &R,
    sinks: &Sinks<'_, L, D>,
) -> Result<CmdResult> {
    let user = sinks.session.user.as_ref().ok_or(DaybookError::NotSignedIn)?;
    let mut result = CmdResult::default();
    if store.is_empty() {
        result.add_message(CmdMessage::info("No records to push."));
        return Ok(result);
    }

    let sent = remote.upsert_records(user, store.records())?;
    info!(sent, user = %user.email, "pushed records");
    result.add_message(CmdMessage::success(format!(
        "Pushed {} records to the cloud.",
        sent
    )));
    Ok(result)
}

pub fn pull<R: RemoteBackend, L: LocalStorage, D: DiskSink>(
    store: &mut RecordStore,
    remote: &R,
    sinks: &Sinks<'_, L, D>,
    mode: ReconcileMode,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let user = sinks.session.user.as_ref().ok_or(DaybookError::NotSignedIn)?;
    let incoming = remote.select_records(user)?;

    let mut result = CmdResult::default();
    if incoming.is_empty() {
        result.add_message(CmdMessage::info("No records found in the cloud."));
        return Ok(result);
    }

    let outcome = reconcile(store.records(), incoming, mode);
    let summary = outcome.summary();
    store.replace_all(outcome.records);
    info!(%mode, added = summary.added, skipped = summary.skipped, "pulled records");

    sinks.persist(store, now, &mut result)?;
    result.add_message(CmdMessage::success(match mode {
        ReconcileMode::Merge => format!(
            "Pulled {} new records. {} already present.",
            summary.added, summary.skipped
        ),
        ReconcileMode::Replace => format!(
            "Pulled {} records (replaced existing)!",
            summary.added
        ),
    }));
    result.reconciled = Some(summary);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{now, Fixture};
    use crate::model::{Category, Status};
    use crate::remote::memory::MemRemote;
    use crate::store::load_records;
    use crate::store::memory::fixtures::{self, record};

    fn signed_in(fx: &mut Fixture, remote: &MemRemote) {
        fx.session.user = remote.session_user().unwrap();
    }

    #[test]
    fn requires_sign_in() {
        let fx = Fixture::new();
        let remote = MemRemote::new();
        let store = RecordStore::from_records(fixtures::records(1));
        assert!(matches!(
            push(&store, &remote, &fx.sinks()),
            Err(DaybookError::NotSignedIn)
        ));
    }

    #[test]
    fn second_device_merges_from_cloud() {
        let laptop = MemRemote::new()
            .with_account("me@example.com", "pw")
            .signed_in_as("me@example.com");
        let phone = MemRemote::sharing_table(&laptop).signed_in_as("me@example.com");

        let mut laptop_fx = Fixture::new();
        signed_in(&mut laptop_fx, &laptop);
        let laptop_store = RecordStore::from_records(vec![
            record("1", Category::Work, Status::Completed),
            record("2", Category::Work, Status::Pending),
        ]);
        push(&laptop_store, &laptop, &laptop_fx.sinks()).unwrap();

        let mut phone_fx = Fixture::new();
        signed_in(&mut phone_fx, &phone);
        let mut phone_store =
            RecordStore::from_records(vec![record("1", Category::Work, Status::Pending)]);
        let result = pull(
            &mut phone_store,
            &phone,
            &phone_fx.sinks(),
            ReconcileMode::Merge,
            now(),
        )
        .unwrap();

        let summary = result.reconciled.unwrap();
        assert_eq!((summary.added, summary.skipped), (1, 1));
        assert_eq!(phone_store.get("1").unwrap().status, Status::Pending);
        assert_eq!(load_records(&phone_fx.local).unwrap().len(), 2);
    }

    #[test]
    fn failed_pull_leaves_local_untouched() {
        let remote = MemRemote::new()
            .with_account("me@example.com", "pw")
            .signed_in_as("me@example.com");
        remote.set_fail_requests(true);
        let mut fx = Fixture::new();
        signed_in(&mut fx, &remote);

        let mut store = RecordStore::from_records(fixtures::records(2));
        assert!(pull(&mut store, &remote, &fx.sinks(), ReconcileMode::Replace, now()).is_err());
        assert_eq!(store.len(), 2);
        assert!(fx.local.writes().is_empty());
    }

    #[test]
    fn empty_cloud_is_reported() {
        let remote = MemRemote::new()
            .with_account("me@example.com", "pw")
            .signed_in_as("me@example.com");
        let mut fx = Fixture::new();
        signed_in(&mut fx, &remote);
        let mut store = RecordStore::from_records(fixtures::records(1));
        let result = pull(&mut store, &remote, &fx.sinks(), ReconcileMode::Replace, now()).unwrap();
        assert!(result.persisted.is_none());
        assert_eq!(store.len(), 1);
    }
}
