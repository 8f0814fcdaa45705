use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use daybook::model::{Category, Status};
use daybook::policy::{BackupCadence, StorageMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "daybook", bin_name = "daybook", version)]
#[command(about = "Keep dated daily records from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        matches!(self, Toggle::On)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new record
    #[command(alias = "n")]
    Add {
        /// Title of the record
        title: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// work, personal, health, learning, project or other
        #[arg(short, long, default_value = "other")]
        category: Category,

        /// pending, in-progress or completed
        #[arg(short, long, default_value = "pending")]
        status: Status,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List records, newest first
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        category: Option<Category>,

        #[arg(short, long)]
        status: Option<Status>,
    },

    /// Show records in full
    View {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Change fields of a record
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        category: Option<Category>,

        #[arg(short, long)]
        status: Option<Status>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete records by id
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete ALL records
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Import records from a JSON or CSV file (merges by default)
    Import {
        file: PathBuf,

        /// Replace the current records instead of merging
        #[arg(long)]
        replace: bool,
    },

    /// Export all records as CSV
    Export {
        /// Write here instead of the downloads folder
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Save records to disk now
    Save,

    /// Show or change storage settings
    Settings {
        /// local, disk or both
        #[arg(long)]
        mode: Option<StorageMode>,

        #[arg(long, value_enum)]
        auto_backup: Option<Toggle>,

        /// immediate, hourly, daily or weekly
        #[arg(long)]
        frequency: Option<BackupCadence>,
    },

    /// Show or choose the folder for disk saves
    Folder {
        path: Option<PathBuf>,

        /// Forget the chosen folder
        #[arg(long, conflicts_with = "path")]
        clear: bool,
    },

    /// Storage status
    Status,

    /// Sign in to the cloud backend
    Login {
        #[arg(short, long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out of the cloud backend
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Push to or pull from the cloud backend
    Sync {
        #[command(subcommand)]
        action: SyncAction,
    },

    /// Get or set configuration values
    Config {
        key: Option<String>,
        value: Option<String>,
    },

    /// Create the data directory and a default config
    Init,
}

#[derive(Subcommand, Debug)]
pub enum SyncAction {
    /// Upload every local record
    Push,
    /// Download records and merge them in
    Pull {
        /// Replace the local records instead of merging
        #[arg(long)]
        replace: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_defaults() {
        let cli = Cli::try_parse_from(["daybook", "add", "Morning run"]).unwrap();
        match cli.command {
            Some(Commands::Add {
                title,
                category,
                status,
                date,
                ..
            }) => {
                assert_eq!(title, "Morning run");
                assert_eq!(category, Category::Other);
                assert_eq!(status, Status::Pending);
                assert!(date.is_none());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn parses_aliases_and_values() {
        let cli = Cli::try_parse_from(["daybook", "ls", "-c", "work", "-s", "in-progress"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::List {
                category: Some(Category::Work),
                status: Some(Status::InProgress)
            })
        ));

        let cli = Cli::try_parse_from(["daybook", "settings", "--mode", "disk", "--auto-backup", "off"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Settings {
                mode: Some(StorageMode::DiskOnly),
                auto_backup: Some(Toggle::Off),
                frequency: None
            })
        ));
    }

    #[test]
    fn rejects_bad_category() {
        assert!(Cli::try_parse_from(["daybook", "add", "x", "-c", "chores"]).is_err());
    }

    #[test]
    fn folder_clear_conflicts_with_path() {
        assert!(Cli::try_parse_from(["daybook", "folder", "/tmp", "--clear"]).is_err());
    }
}
