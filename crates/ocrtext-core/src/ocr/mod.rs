//! OCR engine seam and its implementations.

mod pure_engine;

pub use pure_engine::PureOcrEngine;

use std::cell::OnceCell;

use image::DynamicImage;
use tracing::debug;

use crate::error::OcrError;

/// Turns an in-memory image into recognized text.
pub trait OcrEngine {
    /// Run OCR on one image and return its text.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for &E {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        (**self).recognize(image)
    }
}

impl<E: OcrEngine + ?Sized> OcrEngine for Box<E> {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        (**self).recognize(image)
    }
}

/// Engine that is only constructed on its first `recognize` call.
pub struct LazyEngine<E, F> {
    loader: F,
    engine: OnceCell<E>,
}

impl<E, F> LazyEngine<E, F>
where
    E: OcrEngine,
    F: Fn() -> Result<E, OcrError>,
{
    /// Wrap a loader. It runs at most once, on the first successful load.
    pub fn new(loader: F) -> Self {
        Self {
            loader,
            engine: OnceCell::new(),
        }
    }

    /// Whether the underlying engine has been constructed.
    pub fn is_loaded(&self) -> bool {
        self.engine.get().is_some()
    }

    fn engine(&self) -> Result<&E, OcrError> {
        if let Some(engine) = self.engine.get() {
            return Ok(engine);
        }

        debug!("Loading OCR engine on first use");
        let loaded = (self.loader)()?;
        Ok(self.engine.get_or_init(|| loaded))
    }
}

impl<E, F> OcrEngine for LazyEngine<E, F>
where
    E: OcrEngine,
    F: Fn() -> Result<E, OcrError>,
{
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        self.engine()?.recognize(image)
    }
}
