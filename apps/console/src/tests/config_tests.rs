use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_file(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("planner_console_settings_{suffix}.toml"));
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn missing_file_and_env_yield_defaults() {
    let settings = load_settings_from(Path::new("/nonexistent/planner.toml"), |_| None);
    assert_eq!(settings, Settings::default());
}

#[test]
fn file_values_are_applied() {
    let path = temp_settings_file(
        "gating = \"before_review\"\nsubmit_delay_ms = 50\nauthor = \"dean\"\n",
    );
    let settings = load_settings_from(&path, |_| None);
    assert_eq!(settings.gating, GatingMode::BeforeReview);
    assert_eq!(settings.submit_delay_ms, 50);
    assert_eq!(settings.author, "dean");
    assert_eq!(settings.password_min_length, 8);
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn env_overrides_file() {
    let path = temp_settings_file("submit_delay_ms = 50\n");
    let settings = load_settings_from(&path, |key| match key {
        "PLANNER__SUBMIT_DELAY_MS" => Some("0".to_string()),
        "PLANNER__PASSWORD_MIN_LENGTH" => Some("12".to_string()),
        _ => None,
    });
    assert_eq!(settings.submit_delay_ms, 0);
    assert_eq!(settings.password_min_length, 12);
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn invalid_values_keep_defaults() {
    let settings = load_settings_from(Path::new("/nonexistent/planner.toml"), |key| match key {
        "PLANNER__GATING" => Some("whenever".to_string()),
        "PLANNER__SUBMIT_DELAY_MS" => Some("-5".to_string()),
        "PLANNER__PASSWORD_MIN_LENGTH" => Some("0".to_string()),
        "PLANNER__AUTHOR" => Some("   ".to_string()),
        _ => None,
    });
    assert_eq!(settings, Settings::default());
}
