//! # CLI Handlers
//!
//! The only place that touches stdout, stderr, stdin and exit codes.
//!
//! - `run()`: parse, set up logging and the API, dispatch
//! - `handle_*()`: call the API and print the data part of the result
//!
//! Messages are printed once, after the handler returns. Any error-level
//! message turns into exit code 1.

use super::render::{
    print_messages, render_config, render_full_records, render_record_list, render_status,
    render_status_line,
};
use super::setup::{Cli, Commands, SyncAction, Toggle};
use chrono::{Local, NaiveDate, Utc};
use clap::Parser;
use daybook::api::{CmdResult, ConfigAction, FolderAction, SettingsChange};
use daybook::error::{DaybookError, Result};
use daybook::init::{initialize, FsApi};
use daybook::logging;
use daybook::model::{Category, NewRecord, RecordPatch, Status};
use daybook::policy::{BackupCadence, StorageMode};
use daybook::reconcile::ReconcileMode;
use daybook::records::RecordFilter;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut ctx = initialize()?;
    let api = &mut ctx.api;

    let result = match cli.command {
        Some(Commands::Add {
            title,
            date,
            category,
            status,
            description,
        }) => handle_add(api, title, date, category, status, description),
        Some(Commands::List { category, status }) => handle_list(api, category, status),
        Some(Commands::View { ids }) => handle_view(api, &ids),
        Some(Commands::Edit {
            id,
            title,
            date,
            category,
            status,
            description,
        }) => handle_edit(
            api,
            &id,
            RecordPatch {
                date,
                title,
                category,
                description,
                status,
            },
        ),
        Some(Commands::Delete { ids }) => api.delete_records(&ids),
        Some(Commands::Clear { yes }) => handle_clear(api, yes),
        Some(Commands::Import { file, replace }) => api.import_file(&file, reconcile_mode(replace)),
        Some(Commands::Export { output }) => api.export_csv(output.as_deref()),
        Some(Commands::Save) => api.save_to_disk(),
        Some(Commands::Settings {
            mode,
            auto_backup,
            frequency,
        }) => handle_settings(api, mode, auto_backup, frequency),
        Some(Commands::Folder { path, clear }) => handle_folder(api, path, clear),
        Some(Commands::Status) => handle_status(api),
        Some(Commands::Login { email, password }) => handle_login(api, &email, password),
        Some(Commands::Logout) => api.logout(),
        Some(Commands::Whoami) => api.whoami(),
        Some(Commands::Sync { action }) => match action {
            SyncAction::Push => api.sync_push(),
            SyncAction::Pull { replace } => api.sync_pull(reconcile_mode(replace)),
        },
        Some(Commands::Config { key, value }) => handle_config(api, key, value),
        Some(Commands::Init) => api.init(),
        None => handle_list(api, None, None),
    }?;

    print_messages(&result.messages);
    Ok(if result.has_errors() { 1 } else { 0 })
}

fn reconcile_mode(replace: bool) -> ReconcileMode {
    if replace {
        ReconcileMode::Replace
    } else {
        ReconcileMode::Merge
    }
}

fn handle_add(
    api: &mut FsApi,
    title: String,
    date: Option<NaiveDate>,
    category: Category,
    status: Status,
    description: String,
) -> Result<CmdResult> {
    let draft = NewRecord {
        date: date.unwrap_or_else(|| Local::now().date_naive()),
        title,
        category,
        description,
        status,
    };
    api.create_record(draft)
}

fn handle_list(
    api: &mut FsApi,
    category: Option<Category>,
    status: Option<Status>,
) -> Result<CmdResult> {
    let result = api.list_records(&RecordFilter { category, status })?;
    print!("{}", render_record_list(&result.listed_records, Utc::now()));

    if let Some(status) = api.status()?.status {
        println!();
        println!("{}", render_status_line(&status));
    }
    Ok(result)
}

fn handle_view(api: &mut FsApi, ids: &[String]) -> Result<CmdResult> {
    let result = api.view_records(ids)?;
    print!("{}", render_full_records(&result.listed_records));
    Ok(result)
}

fn handle_edit(api: &mut FsApi, id: &str, patch: RecordPatch) -> Result<CmdResult> {
    let result = api.update_record(id, &patch)?;
    if !result.affected_records.is_empty() {
        print!("{}", render_full_records(&result.affected_records));
    }
    Ok(result)
}

fn handle_clear(api: &mut FsApi, yes: bool) -> Result<CmdResult> {
    let count = api.records().len();
    let confirmed = yes || (count > 0 && confirm_clear(count)?);
    api.clear_records(confirmed)
}

fn confirm_clear(count: usize) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }
    print!(
        "Are you sure you want to delete ALL {} records? This action cannot be undone. [y/N]: ",
        count
    );
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim(), "y" | "Y" | "yes"))
}

fn handle_settings(
    api: &mut FsApi,
    mode: Option<StorageMode>,
    auto_backup: Option<Toggle>,
    frequency: Option<BackupCadence>,
) -> Result<CmdResult> {
    let change = SettingsChange {
        mode,
        auto_backup: auto_backup.map(Toggle::enabled),
        cadence: frequency,
    };
    let result = api.settings(change)?;
    if let Some(status) = &result.status {
        print!("{}", render_status(status, Utc::now()));
    }
    Ok(result)
}

fn handle_folder(api: &mut FsApi, path: Option<PathBuf>, clear: bool) -> Result<CmdResult> {
    let action = match (path, clear) {
        (_, true) => FolderAction::Clear,
        (Some(path), false) => FolderAction::Choose(path),
        (None, false) => FolderAction::Show,
    };
    api.folder(action)
}

fn handle_status(api: &mut FsApi) -> Result<CmdResult> {
    let result = api.status()?;
    if let Some(status) = &result.status {
        print!("{}", render_status(status, Utc::now()));
    }
    Ok(result)
}

fn handle_login(api: &mut FsApi, email: &str, password: Option<String>) -> Result<CmdResult> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };
    api.login(email, &password)
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(DaybookError::Api("Password cannot be empty".into()));
    }
    Ok(password)
}

fn handle_config(api: &mut FsApi, key: Option<String>, value: Option<String>) -> Result<CmdResult> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let result = api.config(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print!("{}", render_config(config));
        }
    }
    Ok(result)
}
