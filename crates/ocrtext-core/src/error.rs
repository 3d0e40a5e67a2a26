//! Error types for the ocrtext-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the ocrtext library.
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image loading error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The file extension is neither a supported image nor a PDF.
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to read the document's text layer.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The rasterizer ran but failed to render the document.
    #[error("failed to render pages: {0}")]
    Render(String),

    /// The external rasterizer binary could not be started.
    #[error("rasterizer not available: {0}")]
    RasterizerUnavailable(String),

    /// Failed to extract a page image.
    #[error("failed to extract images: {0}")]
    ImageExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// I/O error while handling rasterized pages.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Result type for the ocrtext library.
pub type Result<T> = std::result::Result<T, Error>;
