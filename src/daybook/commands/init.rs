use crate::commands::{CmdMessage, CmdResult, DaybookPaths};
use crate::config::DaybookConfig;
use crate::error::Result;
use std::fs;

pub fn run(paths: &DaybookPaths) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    fs::create_dir_all(dir)?;
    if !dir.join("config.json").exists() {
        DaybookConfig::default().save(dir)?;
    }
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Initialized daybook at {}",
        dir.display()
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_dir_and_default_config() {
        let dir = TempDir::new().unwrap();
        let paths = DaybookPaths {
            data_dir: dir.path().join("nested"),
        };
        run(&paths).unwrap();
        assert!(paths.data_dir.join("config.json").exists());
        // Idempotent.
        run(&paths).unwrap();
    }
}
