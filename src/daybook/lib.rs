//! # Daybook Architecture
//!
//! Daybook keeps dated daily records: things done, planned or in progress,
//! each with a category and a status. It is a library with a CLI client; the
//! core never assumes a terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders CmdResult, picks exit codes    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - DaybookApi facade, owns session state                    │
//! │  - Auto-sync after persisted changes                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per operation, returns CmdResult              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core: records, reconcile, policy, persist, codec           │
//! │  Collaborators: store/ (local KV), disk/ (CSV files),       │
//! │                 remote/ (auth + database)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Where records live
//!
//! The in-memory [`records::RecordStore`] is the source of truth for one
//! invocation. Every change fires a persist-trigger, and the
//! [`policy::StoragePolicy`] decides which mirrors get the full collection:
//! local storage, a CSV on disk, or both (with time-based auto-backups).
//! The remote table is a third mirror, written on `sync push` or
//! automatically when `auto-sync` is on.
//!
//! Lists coming back from elsewhere (an import file, a `sync pull`) go
//! through [`reconcile`]: merge keeps the local copy of any record whose id
//! is already present, replace takes the incoming list as-is.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade
//! - [`commands`]: business logic per operation
//! - [`records`]: the record store
//! - [`reconcile`]: merge / replace
//! - [`policy`]: storage modes and backup cadence
//! - [`persist`]: carries out a persist plan
//! - [`codec`]: CSV export/import, JSON import
//! - [`store`], [`disk`], [`remote`]: collaborators, each with an in-memory
//!   implementation for tests
//! - [`session`]: signed-in user and chosen folder
//! - [`config`], [`logging`], [`error`]
//! - `cli`: argument parsing and rendering for the binary (not part of the lib API)

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod disk;
pub mod error;
pub mod init;
pub mod logging;
pub mod model;
pub mod persist;
pub mod policy;
pub mod reconcile;
pub mod records;
pub mod remote;
pub mod session;
pub mod store;
