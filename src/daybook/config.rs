use crate::error::{DaybookError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_REMOTE_TABLE: &str = "daily_records";

/// Configuration for daybook, stored as config.json in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DaybookConfig {
    /// Base URL of the hosted backend (e.g. `https://xyz.supabase.co`)
    #[serde(default)]
    pub remote_url: String,

    /// Public API key sent with every remote request
    #[serde(default)]
    pub remote_key: String,

    #[serde(default = "default_remote_table")]
    pub remote_table: String,

    /// Where "downloads" land. Defaults to the user's Downloads directory.
    #[serde(default)]
    pub downloads_dir: Option<PathBuf>,

    /// Push the collection to the remote after every change while signed in
    #[serde(default)]
    pub auto_sync: bool,
}

fn default_remote_table() -> String {
    DEFAULT_REMOTE_TABLE.to_string()
}

impl Default for DaybookConfig {
    fn default() -> Self {
        Self {
            remote_url: String::new(),
            remote_key: String::new(),
            remote_table: default_remote_table(),
            downloads_dir: None,
            auto_sync: false,
        }
    }
}

pub const CONFIG_KEYS: [&str; 5] = [
    "remote-url",
    "remote-key",
    "remote-table",
    "downloads-dir",
    "auto-sync",
];

impl DaybookConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: DaybookConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn remote_configured(&self) -> bool {
        !self.remote_url.trim().is_empty() && !self.remote_key.trim().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "remote-url" => Some(self.remote_url.clone()),
            "remote-key" => Some(mask(&self.remote_key)),
            "remote-table" => Some(self.remote_table.clone()),
            "downloads-dir" => Some(
                self.downloads_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            "auto-sync" => Some(self.auto_sync.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match key {
            "remote-url" => self.remote_url = value.trim_end_matches('/').to_string(),
            "remote-key" => self.remote_key = value.to_string(),
            "remote-table" => {
                if value.is_empty() {
                    return Err("remote-table cannot be empty".to_string());
                }
                self.remote_table = value.to_string();
            }
            "downloads-dir" => {
                self.downloads_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            "auto-sync" => self.auto_sync = parse_bool(value)?,
            other => return Err(format!("Unknown config key: {}", other)),
        }
        Ok(())
    }

    pub fn list_all(&self) -> Vec<(String, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|v| (k.to_string(), v)))
            .collect()
    }
}

fn parse_bool(value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(format!("Expected on/off, got '{}'", other)),
    }
}

/// Shows only the tail of a secret.
fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

impl std::str::FromStr for DaybookConfig {
    type Err = DaybookError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| DaybookError::Config(e.to_string()))
    }
}
