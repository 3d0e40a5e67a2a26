//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration for ocrtext.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrTextConfig {
    /// OCR model files.
    pub models: ModelConfig,

    /// PDF rasterization configuration.
    pub pdf: PdfConfig,

    /// Extraction behavior.
    pub extraction: ExtractionConfig,
}

/// Model file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ModelConfig {
    pub fn detection_path(&self) -> PathBuf {
        self.model_dir.join(&self.detection_model)
    }

    pub fn recognition_path(&self) -> PathBuf {
        self.model_dir.join(&self.recognition_model)
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.model_dir.join(&self.dictionary)
    }
}

/// Which strategy turns PDF pages into images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterizerKind {
    /// Poppler when `pdftoppm` can be started, embedded page images otherwise.
    #[default]
    Auto,
    /// Always render with poppler's `pdftoppm`.
    Poppler,
    /// Always use the images embedded in each page.
    Embedded,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Rasterization strategy.
    pub rasterizer: RasterizerKind,

    /// DPI for rendering PDF pages to images.
    pub render_dpi: u32,

    /// Name or path of the `pdftoppm` binary.
    pub pdftoppm_path: PathBuf,

    /// Return the document's text layer when it has one, OCR otherwise.
    pub prefer_text_layer: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            rasterizer: RasterizerKind::Auto,
            render_dpi: 200,
            pdftoppm_path: PathBuf::from("pdftoppm"),
            prefer_text_layer: false,
        }
    }
}

/// Extraction behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Fail on unsupported extensions instead of returning empty text.
    pub strict_formats: bool,
}

impl OcrTextConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = OcrTextConfig::default();
        assert_eq!(config.pdf.render_dpi, 200);
        assert_eq!(config.pdf.rasterizer, RasterizerKind::Auto);
        assert_eq!(config.pdf.pdftoppm_path, PathBuf::from("pdftoppm"));
        assert!(!config.extraction.strict_formats);
        assert!(!config.pdf.prefer_text_layer);
        assert_eq!(
            config.models.detection_path(),
            PathBuf::from("models").join("det.onnx")
        );
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "pdf": { "rasterizer": "embedded" } }"#).unwrap();

        let config = OcrTextConfig::from_file(&path).unwrap();
        assert_eq!(config.pdf.rasterizer, RasterizerKind::Embedded);
        assert_eq!(config.pdf.render_dpi, 200);
        assert_eq!(config.models.recognition_model, "latin_rec.onnx");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = OcrTextConfig::default();
        config.models.model_dir = PathBuf::from("/opt/ocr/models");
        config.extraction.strict_formats = true;
        config.save(&path).unwrap();

        let loaded = OcrTextConfig::from_file(&path).unwrap();
        assert_eq!(loaded.models.model_dir, PathBuf::from("/opt/ocr/models"));
        assert!(loaded.extraction.strict_formats);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = OcrTextConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
