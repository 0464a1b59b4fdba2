use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregator::DEFAULT_OBSERVATION;
use crate::error::{RedeError, Result};
use crate::normalizer::DotPolicy;
use crate::profile::ErpConstants;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_profile")]
    pub default_profile: String,
    #[serde(default = "default_observation")]
    pub default_observation: String,
    #[serde(default)]
    pub dot_policy: DotPolicy,
    #[serde(default)]
    pub erp: ErpConstants,
}

fn default_output_dir() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("taxa-rede")
        .join("exports")
        .to_string_lossy()
        .to_string()
}

fn default_profile() -> String {
    "rede".to_string()
}

fn default_observation() -> String {
    DEFAULT_OBSERVATION.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_profile: default_profile(),
            default_observation: default_observation(),
            dot_policy: DotPolicy::default(),
            erp: ErpConstants::default(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("taxa-rede")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing or unreadable settings fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
        Settings::default()
    })
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| RedeError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn shellexpand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.output_dir = "/tmp/exports".to_string();
        settings.dot_policy = DotPolicy::Thousands;
        settings.erp.approval_group = "PC0099".to_string();
        save_settings_to(&settings, &path).unwrap();

        let loaded = load_settings_from(&path);
        assert_eq!(loaded.output_dir, "/tmp/exports");
        assert_eq!(loaded.dot_policy, DotPolicy::Thousands);
        assert_eq!(loaded.erp.approval_group, "PC0099");
        assert_eq!(loaded.default_profile, "rede");
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("settings.json"));
        assert_eq!(s.default_observation, DEFAULT_OBSERVATION);
        assert_eq!(s.dot_policy, DotPolicy::Decimal);
        assert!(!s.output_dir.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"default_profile": "unitario", "dot_policy": "thousands"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.default_profile, "unitario");
        assert_eq!(s.dot_policy, DotPolicy::Thousands);
        assert_eq!(s.erp.invoice_cnpj, "08845676000198");
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_settings_from(&path).default_profile, "rede");
    }

    #[test]
    fn test_shellexpand_path() {
        assert_eq!(shellexpand_path("/tmp/out"), PathBuf::from("/tmp/out"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(shellexpand_path("~/out"), home.join("out"));
        }
    }
}
