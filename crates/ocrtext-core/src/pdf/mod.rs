//! PDF handling: turning every page of a document into an image, and
//! reading the text layer when one is wanted.

mod embedded;
mod poppler;
mod text;

pub use embedded::EmbeddedImageRasterizer;
pub use poppler::PopplerRasterizer;
pub use text::extract_text_layer;

use std::path::Path;

use image::DynamicImage;
use lopdf::Document;
use tracing::{debug, warn};

use crate::config::{PdfConfig, RasterizerKind};
use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for strategies that render PDF pages to images.
pub trait PageRasterizer {
    /// Render every page of the PDF at `path`, in page order.
    ///
    /// A document without pages yields an empty vector.
    fn rasterize(&self, path: &Path) -> Result<Vec<DynamicImage>>;
}

impl<R: PageRasterizer + ?Sized> PageRasterizer for &R {
    fn rasterize(&self, path: &Path) -> Result<Vec<DynamicImage>> {
        (**self).rasterize(path)
    }
}

/// Load a PDF with lopdf, decrypting it when the user password is empty.
pub(crate) fn load_document(path: &Path) -> Result<Document> {
    let mut doc = Document::load(path).map_err(|e| PdfError::Parse(e.to_string()))?;

    if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");
    }

    Ok(doc)
}

/// Number of pages in the PDF at `path`.
pub fn page_count(path: &Path) -> Result<u32> {
    let doc = load_document(path)?;
    Ok(doc.get_pages().len() as u32)
}

/// Rasterizer selected from configuration.
pub enum Rasterizer {
    /// Poppler's `pdftoppm`.
    Poppler(PopplerRasterizer),
    /// Images embedded in each page.
    Embedded(EmbeddedImageRasterizer),
    /// Poppler, falling back to embedded images when `pdftoppm` is missing.
    Auto(PopplerRasterizer, EmbeddedImageRasterizer),
}

impl Rasterizer {
    /// Build the rasterizer described by `config`.
    pub fn from_config(config: &PdfConfig) -> Self {
        let poppler = || PopplerRasterizer::new(&config.pdftoppm_path, config.render_dpi);
        match config.rasterizer {
            RasterizerKind::Poppler => Rasterizer::Poppler(poppler()),
            RasterizerKind::Embedded => Rasterizer::Embedded(EmbeddedImageRasterizer::new()),
            RasterizerKind::Auto => Rasterizer::Auto(poppler(), EmbeddedImageRasterizer::new()),
        }
    }
}

impl PageRasterizer for Rasterizer {
    fn rasterize(&self, path: &Path) -> Result<Vec<DynamicImage>> {
        match self {
            Rasterizer::Poppler(poppler) => poppler.rasterize(path),
            Rasterizer::Embedded(embedded) => embedded.rasterize(path),
            Rasterizer::Auto(poppler, embedded) => match poppler.rasterize(path) {
                Err(PdfError::RasterizerUnavailable(reason)) => {
                    warn!(
                        "{}; falling back to embedded page images (install poppler-utils for full rendering)",
                        reason
                    );
                    embedded.rasterize(path)
                }
                other => other,
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory PDF builders shared by the tests.

    use lopdf::{dictionary, Document, Object, Stream};

    enum Page {
        /// One image XObject drawn over the page.
        Image(Stream),
        /// One line of Helvetica text.
        Text(String),
        /// No resources, empty text object.
        Blank,
    }

    fn build(pages: Vec<Page>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let (resources, content) = match page {
                Page::Image(image) => {
                    let image_id = doc.add_object(image);
                    let resources = dictionary! {
                        "XObject" => dictionary! { "Im0" => image_id },
                    };
                    (Some(resources), b"q 2 0 0 2 0 0 cm /Im0 Do Q".to_vec())
                }
                Page::Text(line) => {
                    let font_id = doc.add_object(dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type1",
                        "BaseFont" => "Helvetica",
                    });
                    let resources = dictionary! {
                        "Font" => dictionary! { "F1" => font_id },
                    };
                    let content = format!("BT /F1 12 Tf 20 100 Td ({}) Tj ET", line);
                    (Some(resources), content.into_bytes())
                }
                Page::Blank => (None, b"BT ET".to_vec()),
            };

            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 200.into(), 200.into()],
            };
            if let Some(resources) = resources {
                let resources_id = doc.add_object(resources);
                page.set("Resources", resources_id);
            }
            kids.push(doc.add_object(page).into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    fn raw_image(width: i64, height: i64, color_space: &str, samples: Vec<u8>) -> Stream {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => color_space,
                "BitsPerComponent" => 8,
            },
            samples,
        )
    }

    /// Build a PDF whose pages each hold one 2x2 DeviceGray image filled
    /// with the given shade. An empty slice gives a zero-page document.
    pub fn gray_pages_pdf(shades: &[u8]) -> Vec<u8> {
        build(
            shades
                .iter()
                .map(|&shade| Page::Image(raw_image(2, 2, "DeviceGray", vec![shade; 4])))
                .collect(),
        )
    }

    /// Build a one-page PDF with a single raw image XObject, the header
    /// values taken verbatim.
    pub fn raw_image_pdf(width: i64, height: i64, color_space: &str, samples: Vec<u8>) -> Vec<u8> {
        build(vec![Page::Image(raw_image(width, height, color_space, samples))])
    }

    /// Build a one-page PDF carrying no image at all.
    pub fn text_only_pdf() -> Vec<u8> {
        build(vec![Page::Blank])
    }

    /// Build a PDF with one page of text per entry.
    pub fn text_layer_pdf(lines: &[&str]) -> Vec<u8> {
        build(lines.iter().map(|line| Page::Text(line.to_string())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_pdf(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let three = write_pdf(dir.path(), "three.pdf", &testing::gray_pages_pdf(&[1, 2, 3]));
        let empty = write_pdf(dir.path(), "empty.pdf", &testing::gray_pages_pdf(&[]));

        assert_eq!(page_count(&three).unwrap(), 3);
        assert_eq!(page_count(&empty).unwrap(), 0);
    }

    #[test]
    fn test_page_count_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "broken.pdf", b"this is not a pdf");
        assert!(matches!(page_count(&path), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_auto_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "scan.pdf", &testing::gray_pages_pdf(&[40, 80]));

        let config = PdfConfig {
            rasterizer: RasterizerKind::Auto,
            pdftoppm_path: dir.path().join("no-such-pdftoppm"),
            ..PdfConfig::default()
        };
        let pages = Rasterizer::from_config(&config).rasterize(&path).unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn test_poppler_only_reports_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "scan.pdf", &testing::gray_pages_pdf(&[40]));

        let config = PdfConfig {
            rasterizer: RasterizerKind::Poppler,
            pdftoppm_path: dir.path().join("no-such-pdftoppm"),
            ..PdfConfig::default()
        };
        let result = Rasterizer::from_config(&config).rasterize(&path);
        assert!(matches!(result, Err(PdfError::RasterizerUnavailable(_))));
    }
}
