use std::{collections::HashMap, fs, path::Path};

use planner_core::GatingMode;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub gating: GatingMode,
    pub submit_delay_ms: u64,
    pub password_min_length: usize,
    pub author: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gating: GatingMode::BeforeSubmit,
            submit_delay_ms: 800,
            password_min_length: 8,
            author: "registrar".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new("planner.toml"), |key| std::env::var(key).ok())
}

/// File values first, then `PLANNER__*` overrides. Unparseable values keep the previous one.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => {
                for (key, value) in file_cfg {
                    let value = match value {
                        toml::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    apply(&mut settings, &key, &value);
                }
            }
            Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable settings file"),
        }
    }

    for key in ["gating", "submit_delay_ms", "password_min_length", "author"] {
        if let Some(value) = env(&format!("PLANNER__{}", key.to_ascii_uppercase())) {
            apply(&mut settings, key, &value);
        }
    }

    settings
}

fn apply(settings: &mut Settings, key: &str, value: &str) {
    match key {
        "gating" => {
            if let Ok(parsed) = value.parse() {
                settings.gating = parsed;
            }
        }
        "submit_delay_ms" => {
            if let Ok(parsed) = value.trim().parse() {
                settings.submit_delay_ms = parsed;
            }
        }
        "password_min_length" => {
            if let Ok(parsed) = value.trim().parse::<usize>() {
                if parsed > 0 {
                    settings.password_min_length = parsed;
                }
            }
        }
        "author" => {
            if !value.trim().is_empty() {
                settings.author = value.trim().to_string();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
