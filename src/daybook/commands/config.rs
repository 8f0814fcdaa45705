use crate::commands::{CmdMessage, CmdResult, DaybookPaths};
use crate::config::DaybookConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &DaybookPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    match action {
        ConfigAction::ShowAll => {
            let config = DaybookConfig::load(dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = DaybookConfig::load(dir)?;
            let message = match config.get(&key) {
                Some(val) => CmdMessage::info(val),
                None => CmdMessage::error(format!("Unknown config key: {}", key)),
            };
            Ok(CmdResult::default().with_message(message))
        }
        ConfigAction::Set(key, value) => {
            let mut config = DaybookConfig::load(dir)?;
            if let Err(e) = config.set(&key, &value) {
                return Ok(CmdResult::default().with_message(CmdMessage::error(e)));
            }
            config.save(dir)?;
            let display_val = config.get(&key).unwrap_or(value);
            Ok(CmdResult::default()
                .with_message(CmdMessage::success(format!("{} set to {}", key, display_val)))
                .with_config(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_then_show() {
        let dir = TempDir::new().unwrap();
        let paths = DaybookPaths {
            data_dir: dir.path().to_path_buf(),
        };

        run(&paths, ConfigAction::Set("auto-sync".into(), "on".into())).unwrap();
        let shown = run(&paths, ConfigAction::ShowKey("auto-sync".into())).unwrap();
        assert_eq!(shown.messages[0].content, "true");

        let all = run(&paths, ConfigAction::ShowAll).unwrap();
        assert!(all.config.unwrap().auto_sync);
    }

    #[test]
    fn unknown_key_is_an_error_message() {
        let dir = TempDir::new().unwrap();
        let paths = DaybookPaths {
            data_dir: dir.path().to_path_buf(),
        };
        let result = run(&paths, ConfigAction::Set("theme".into(), "dark".into())).unwrap();
        assert!(result.has_errors());
        assert!(!dir.path().join("config.json").exists());
    }
}
