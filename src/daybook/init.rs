use crate::api::{DaybookApi, DaybookPaths};
use crate::config::DaybookConfig;
use crate::disk::fs::FsDiskSink;
use crate::error::{DaybookError, Result};
use crate::remote::rest::RestRemote;
use crate::store::fs::FsLocalStorage;
use directories::{ProjectDirs, UserDirs};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const HOME_ENV: &str = "DAYBOOK_HOME";
pub const DOWNLOADS_ENV: &str = "DAYBOOK_DOWNLOADS";

pub type FsApi = DaybookApi<FsLocalStorage, FsDiskSink, RestRemote>;

pub struct DaybookContext {
    pub api: FsApi,
    pub config: DaybookConfig,
}

/// `DAYBOOK_HOME` if set, otherwise the platform data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "daybook", "daybook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| DaybookError::Config("Could not determine data directory".into()))
}

/// Where downloads land, in order of preference: the `downloads-dir` config
/// key, `DAYBOOK_DOWNLOADS`, the user's Downloads folder, `<data dir>/downloads`.
pub fn downloads_dir(config: &DaybookConfig, data_dir: &Path) -> PathBuf {
    if let Some(dir) = &config.downloads_dir {
        return dir.clone();
    }
    if let Some(dir) = env::var_os(DOWNLOADS_ENV) {
        return PathBuf::from(dir);
    }
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| data_dir.join("downloads"))
}

pub fn initialize() -> Result<DaybookContext> {
    let data_dir = data_dir()?;
    let config = DaybookConfig::load(&data_dir).unwrap_or_else(|e| {
        warn!("Ignoring unreadable config: {}", e);
        DaybookConfig::default()
    });

    let local = FsLocalStorage::new(data_dir.clone());
    let disk = FsDiskSink::new(downloads_dir(&config, &data_dir));
    let remote = RestRemote::new(
        &config.remote_url,
        &config.remote_key,
        &config.remote_table,
        data_dir.clone(),
    )?;
    let paths = DaybookPaths { data_dir };
    let api = DaybookApi::open(local, disk, remote, config.clone(), paths)?;

    Ok(DaybookContext { api, config })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_downloads_dir_wins() {
        let config = DaybookConfig {
            downloads_dir: Some(PathBuf::from("/srv/exports")),
            ..Default::default()
        };
        assert_eq!(
            downloads_dir(&config, Path::new("/data")),
            PathBuf::from("/srv/exports")
        );
    }
}
