//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::cmp::Ordering;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::OcrError;

use super::OcrEngine;

/// Height in pixels of the bands used to group boxes into reading rows.
const ROW_BAND: f32 = 20.0;

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
}

/// A recognized line with the top-left corner of its bounding box.
#[derive(Debug, Clone)]
struct Line {
    text: String,
    x: f32,
    y: f32,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in `models`.
    pub fn from_models(models: &ModelConfig) -> Result<Self, OcrError> {
        let det_path = models.detection_path();
        let rec_path = models.recognition_path();
        let dict_path = models.dictionary_path();

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", models.model_dir.display());

        Ok(Self { engine })
    }
}

impl OcrEngine for PureOcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        debug!("Running OCR on {}x{} image", width, height);

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let mut lines: Vec<Line> = results
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                Line {
                    text: r.text.replace("[UNK]", " "),
                    x,
                    y,
                }
            })
            .collect();

        sort_reading_order(&mut lines);

        let text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            "OCR complete: {} text regions in {}ms",
            lines.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

/// Sort lines top-to-bottom by row band, then left-to-right.
fn sort_reading_order(lines: &mut [Line]) {
    lines.sort_by(|a, b| {
        let row_a = (a.y / ROW_BAND) as i32;
        let row_b = (b.y / ROW_BAND) as i32;
        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal)
        }
    });
}

/// Minimum x and y over the first four exterior points of a polygon.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .take(4)
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(text: &str, x: f32, y: f32) -> Line {
        Line {
            text: text.to_string(),
            x,
            y,
        }
    }

    #[test]
    fn test_reading_order_rows_then_columns() {
        let mut lines = vec![
            line("second row", 10.0, 45.0),
            line("right", 200.0, 5.0),
            line("left", 12.0, 8.0),
        ];
        sort_reading_order(&mut lines);

        let order: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(order, vec!["left", "right", "second row"]);
    }

    #[test]
    fn test_missing_models_is_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let models = ModelConfig {
            model_dir: dir.path().to_path_buf(),
            ..ModelConfig::default()
        };

        let err = PureOcrEngine::from_models(&models).err().unwrap();
        match err {
            OcrError::ModelLoad(msg) => assert!(msg.contains("det.onnx"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
