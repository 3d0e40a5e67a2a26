//! Configuration loading and default locations.

use std::path::{Path, PathBuf};

use tracing::debug;

use ocrtext_core::OcrTextConfig;

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ocrtext")
        .join("config.json")
}

pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ocrtext")
        .join("models")
}

/// Load the explicit config file, else the default one if present, else
/// built-in defaults with the per-user model directory.
pub fn load(explicit: Option<&str>) -> anyhow::Result<OcrTextConfig> {
    if let Some(path) = explicit {
        debug!("Loading config from {}", path);
        return Ok(OcrTextConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        return Ok(OcrTextConfig::from_file(&path)?);
    }

    let mut config = OcrTextConfig::default();
    config.models.model_dir = default_model_dir();
    Ok(config)
}
