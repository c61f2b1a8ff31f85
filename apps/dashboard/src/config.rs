use std::{fs, path::Path};

use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub robot_url: String,
    /// Zero disables pings.
    pub ping_interval_ms: u64,
    pub queue_capacity: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            robot_url: "ws://192.168.43.1:8000/ws".into(),
            ping_interval_ms: 1000,
            queue_capacity: dashboard_core::DEFAULT_QUEUE_CAPACITY,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    robot_url: Option<String>,
    ping_interval_ms: Option<u64>,
    queue_capacity: Option<usize>,
    log_filter: Option<String>,
}

/// Defaults, then the config file if present, then environment overrides.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file(&mut settings, &raw, path);
    }
    // Logging isn't installed yet when settings load.
    for rejected in apply_env(&mut settings, |key| std::env::var(key).ok()) {
        eprintln!("ignoring {rejected}");
    }

    settings
}

fn apply_file(settings: &mut Settings, raw: &str, path: &Path) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            eprintln!("ignoring {}: {error}", path.display());
            return;
        }
    };
    if let Some(v) = file_cfg.robot_url {
        settings.robot_url = v;
    }
    if let Some(v) = file_cfg.ping_interval_ms {
        settings.ping_interval_ms = v;
    }
    if let Some(v) = file_cfg.queue_capacity {
        settings.queue_capacity = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

/// Returns a message for every variable that was set but could not be used.
fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let mut rejected = Vec::new();

    if let Some(v) = lookup("ROBOT_URL") {
        settings.robot_url = v;
    }
    if let Some(v) = lookup("APP__ROBOT_URL") {
        settings.robot_url = v;
    }

    if let Some(v) = lookup("APP__PING_INTERVAL_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.ping_interval_ms = parsed,
            Err(error) => rejected.push(format!("APP__PING_INTERVAL_MS={v}: {error}")),
        }
    }

    if let Some(v) = lookup("APP__QUEUE_CAPACITY") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.queue_capacity = parsed,
            Err(error) => rejected.push(format!("APP__QUEUE_CAPACITY={v}: {error}")),
        }
    }

    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    rejected
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
