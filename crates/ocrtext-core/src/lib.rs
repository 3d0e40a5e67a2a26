//! Core library for ocrtext.
//!
//! This crate provides:
//! - File classification by extension (still image, PDF, unsupported)
//! - PDF page rasterization (poppler `pdftoppm` or embedded page images)
//! - OCR using PaddleOCR models through `pure-onnx-ocr`
//! - The [`Extractor`] tying the pieces together

pub mod config;
pub mod error;
pub mod extractor;
pub mod kind;
pub mod ocr;
pub mod pdf;

pub use config::{ExtractionConfig, ModelConfig, OcrTextConfig, PdfConfig, RasterizerKind};
pub use error::{Error, OcrError, PdfError, Result};
pub use extractor::Extractor;
pub use kind::{FileKind, IMAGE_EXTENSIONS};
pub use ocr::{LazyEngine, OcrEngine, PureOcrEngine};
pub use pdf::{
    extract_text_layer, EmbeddedImageRasterizer, PageRasterizer, PopplerRasterizer, Rasterizer,
};
