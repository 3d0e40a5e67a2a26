//! Classify-and-dispatch text extraction for a single file.

use std::io;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::kind::FileKind;
use crate::ocr::OcrEngine;
use crate::pdf::{extract_text_layer, PageRasterizer};

/// Extracts plain text from images and PDFs.
///
/// Images are OCR'd once. PDFs are rasterized and every page is OCR'd in
/// order, each page's text followed by a newline. Any other extension gives
/// empty text, or [`Error::UnsupportedFormat`] in strict mode.
///
/// With the text layer preferred, a PDF whose embedded text is non-blank is
/// returned as that text and never rasterized.
pub struct Extractor<E, R> {
    engine: E,
    rasterizer: R,
    strict: bool,
    text_layer: bool,
}

impl<E: OcrEngine, R: PageRasterizer> Extractor<E, R> {
    /// Create an extractor from an OCR engine and a PDF rasterizer.
    pub fn new(engine: E, rasterizer: R) -> Self {
        Self {
            engine,
            rasterizer,
            strict: false,
            text_layer: false,
        }
    }

    /// Reject unsupported extensions instead of returning empty text.
    pub fn with_strict_formats(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Try the PDF text layer before falling back to OCR.
    pub fn with_text_layer(mut self, prefer: bool) -> Self {
        self.text_layer = prefer;
        self
    }

    /// Access the OCR engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Extract the text of the file at `path`.
    pub fn extract(&self, path: &Path) -> Result<String> {
        self.extract_with_progress(path, |_, _| {})
    }

    /// Like [`extract`](Self::extract), calling `progress(done, total)`
    /// after each PDF page has been recognized.
    pub fn extract_with_progress<P>(&self, path: &Path, mut progress: P) -> Result<String>
    where
        P: FnMut(usize, usize),
    {
        let kind = FileKind::classify(path);

        if !kind.is_supported() {
            if self.strict {
                return Err(Error::UnsupportedFormat(path.to_path_buf()));
            }
            warn!("Unsupported file type, returning empty text: {}", path.display());
            return Ok(String::new());
        }

        if !path.exists() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("input file not found: {}", path.display()),
            )));
        }
        if !path.is_file() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("input is not a regular file: {}", path.display()),
            )));
        }

        info!("Processing {:?} file: {}", kind, path.display());
        let start = Instant::now();

        let text = match kind {
            FileKind::Image => self.extract_image(path)?,
            FileKind::Pdf => self.extract_pdf(path, &mut progress)?,
            FileKind::Unsupported => String::new(),
        };

        debug!(
            "Extracted {} chars in {}ms",
            text.chars().count(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }

    fn extract_image(&self, path: &Path) -> Result<String> {
        // Sniffed, since a `.png` dot-file has no extension for `image` to go on.
        let image = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        Ok(self.engine.recognize(&image)?)
    }

    fn extract_pdf(&self, path: &Path, progress: &mut dyn FnMut(usize, usize)) -> Result<String> {
        if self.text_layer {
            match extract_text_layer(path) {
                Ok(text) if !text.trim().is_empty() => {
                    info!("Using PDF text layer ({} chars)", text.len());
                    return Ok(text);
                }
                Ok(_) => debug!("PDF text layer is blank, running OCR"),
                Err(e) => warn!("PDF text extraction failed, running OCR: {}", e),
            }
        }

        let pages = self.rasterizer.rasterize(path)?;
        let total = pages.len();

        debug!("Rasterized {} pages", total);

        let mut text = String::new();
        for (i, page) in pages.iter().enumerate() {
            let page_text = self.engine.recognize(page)?;
            debug!("Page {}/{}: {} chars", i + 1, total, page_text.len());

            text.push_str(&page_text);
            text.push('\n');
            progress(i + 1, total);
        }

        Ok(text)
    }
}
