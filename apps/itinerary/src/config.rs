use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

const DEFAULT_CONFIG_FILE: &str = "itinerary.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: Option<PathBuf>,
    pub script_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: None,
            script_path: None,
            log_filter: "info".into(),
        }
    }
}

/// Defaults, then `itinerary.toml` (or `config_path`), then environment.
/// An explicit config path must exist; the default file is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                apply_file(&mut settings, &raw)
                    .with_context(|| format!("invalid config '{DEFAULT_CONFIG_FILE}'"))?;
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, String>>(raw)?;
    if let Some(v) = file_cfg.get("data_path") {
        settings.data_path = Some(PathBuf::from(v));
    }
    if let Some(v) = file_cfg.get("script_path") {
        settings.script_path = Some(PathBuf::from(v));
    }
    if let Some(v) = file_cfg.get("log_filter") {
        settings.log_filter = v.clone();
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("ITINERARY_DATA") {
        settings.data_path = Some(PathBuf::from(v));
    }
    if let Some(v) = var("APP__DATA_PATH") {
        settings.data_path = Some(PathBuf::from(v));
    }

    if let Some(v) = var("APP__SCRIPT_PATH") {
        settings.script_path = Some(PathBuf::from(v));
    }

    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let mut settings = Settings::default();
        apply_file(
            &mut settings,
            "data_path = \"data/itinerary.json\"\nlog_filter = \"debug\"\n",
        )
        .expect("valid toml");

        assert_eq!(settings.data_path, Some(PathBuf::from("data/itinerary.json")));
        assert_eq!(settings.script_path, None);
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn app_prefixed_env_wins_over_short_name() {
        let mut settings = Settings::default();
        let env: HashMap<&str, &str> = [
            ("ITINERARY_DATA", "short.json"),
            ("APP__DATA_PATH", "long.json"),
            ("APP__LOG_FILTER", "client_core=debug"),
        ]
        .into_iter()
        .collect();

        apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.data_path, Some(PathBuf::from("long.json")));
        assert_eq!(settings.log_filter, "client_core=debug");
    }

    #[test]
    fn explicit_config_file_is_required_to_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.toml");
        assert!(load_settings(Some(&missing)).is_err());

        let present = dir.path().join("itinerary.toml");
        fs::write(&present, "script_path = \"demo.txt\"\n").expect("write config");
        let settings = load_settings(Some(&present)).expect("settings");
        assert_eq!(settings.script_path, Some(PathBuf::from("demo.txt")));
    }

    #[test]
    fn malformed_config_is_rejected() {
        let mut settings = Settings::default();
        assert!(apply_file(&mut settings, "data_path = [1, 2]").is_err());
    }
}
