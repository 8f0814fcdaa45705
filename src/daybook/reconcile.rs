//! # Reconciliation
//!
//! Combines the local collection with a list that came from somewhere else
//! (an import file or the remote table). The caller picks the mode; nothing
//! here looks at timestamps or field contents.
//!
//! - [`ReconcileMode::Merge`] runs [`merge_local_wins`]: identity is the record
//!   id and the local copy always wins. Incoming records with a new id are
//!   appended after the existing ones, in incoming order.
//! - Neither mode dedupes within the incoming list itself.
//! - [`ReconcileMode::Replace`] throws the local list away and takes the
//!   incoming one verbatim.
//!
//! Callers reject an empty incoming list before getting here.

use crate::model::Record;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcileMode {
    #[default]
    Merge,
    Replace,
}

impl fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileMode::Merge => f.write_str("merge"),
            ReconcileMode::Replace => f.write_str("replace"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    pub records: Vec<Record>,
    pub added: usize,
    pub skipped: usize,
}

/// Counts only, for reporting once the records have moved into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub added: usize,
    pub skipped: usize,
}

impl ReconcileOutcome {
    pub fn summary(&self) -> ReconcileSummary {
        ReconcileSummary {
            added: self.added,
            skipped: self.skipped,
        }
    }
}

pub fn reconcile(local: &[Record], incoming: Vec<Record>, mode: ReconcileMode) -> ReconcileOutcome {
    match mode {
        ReconcileMode::Merge => merge_local_wins(local, incoming),
        ReconcileMode::Replace => replace(incoming),
    }
}

/// Identifier-keyed merge where the local copy of a record always wins.
///
/// A record already present locally is skipped even if every other field
/// differs. Only ids from `local` are checked: like [`ReconcileMode::Replace`],
/// merge does not dedupe within `incoming`, so repeated incoming ids that are
/// new locally are all appended.
pub fn merge_local_wins(local: &[Record], incoming: Vec<Record>) -> ReconcileOutcome {
    let existing: HashSet<&str> = local.iter().map(|r| r.id.as_str()).collect();
    let mut records = local.to_vec();
    let mut added = 0;
    let mut skipped = 0;

    for record in incoming {
        if !existing.contains(record.id.as_str()) {
            records.push(record);
            added += 1;
        } else {
            skipped += 1;
        }
    }

    ReconcileOutcome {
        records,
        added,
        skipped,
    }
}

fn replace(incoming: Vec<Record>) -> ReconcileOutcome {
    let added = incoming.len();
    ReconcileOutcome {
        records: incoming,
        added,
        skipped: 0,
    }
}
