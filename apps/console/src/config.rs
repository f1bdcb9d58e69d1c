use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "console.toml";
const CONFIG_DIR_NAME: &str = "ctrl-console";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: Option<String>,
    pub request_timeout_secs: u64,
    pub log_filter: String,
    pub command_queue_depth: usize,
    pub event_queue_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: None,
            request_timeout_secs: 30,
            log_filter: "warn".into(),
            command_queue_depth: 64,
            event_queue_depth: 256,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    log_filter: Option<String>,
    command_queue_depth: Option<usize>,
    event_queue_depth: Option<usize>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// A zero timeout would fail every request immediately.
    pub fn set_request_timeout_secs(&mut self, secs: u64) {
        self.request_timeout_secs = secs.max(1);
    }

    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.server_url {
            self.server_url = Some(v);
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.set_request_timeout_secs(v);
        }
        if let Some(v) = file_cfg.log_filter {
            self.log_filter = v;
        }
        if let Some(v) = file_cfg.command_queue_depth {
            self.command_queue_depth = v.max(1);
        }
        if let Some(v) = file_cfg.event_queue_depth {
            self.event_queue_depth = v.max(1);
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(v) = lookup("CONSOLE_SERVER_URL") {
            self.server_url = Some(v);
        }
        if let Some(v) = lookup("APP__SERVER_URL") {
            self.server_url = Some(v);
        }

        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            let secs = v
                .parse::<u64>()
                .with_context(|| format!("invalid APP__REQUEST_TIMEOUT_SECS value '{v}'"))?;
            self.set_request_timeout_secs(secs);
        }

        if let Some(v) = lookup("APP__LOG_FILTER") {
            self.log_filter = v;
        }
        Ok(())
    }
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    paths
}

/// Defaults, then the first config file found (or the explicit one), then environment.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match explicit {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            settings
                .apply_file(&raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        None => {
            for path in default_config_paths() {
                let Ok(raw) = fs::read_to_string(&path) else {
                    continue;
                };
                settings
                    .apply_file(&raw)
                    .with_context(|| format!("invalid config file '{}'", path.display()))?;
                break;
            }
        }
    }

    settings.apply_env(|key| std::env::var(key).ok())?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
