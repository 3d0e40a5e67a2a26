//! Page images taken from the image XObjects embedded in a PDF, using lopdf.
//!
//! Scanned documents usually carry exactly one full-page image per page, so
//! this works without any native renderer. Vector-only pages cannot be
//! handled this way.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{load_document, PageRasterizer, Result};
use crate::error::PdfError;

/// Rasterizer that returns the first decodable embedded image of each page.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedImageRasterizer;

impl EmbeddedImageRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Extract the page image for a 1-indexed page.
    fn page_image(&self, doc: &Document, page: u32, page_id: ObjectId) -> Result<DynamicImage> {
        let resources = get_page_resources(doc, page_id).ok_or_else(|| {
            PdfError::ImageExtraction(format!("page {} has no resources", page))
        })?;

        if let Ok(xobjects) = resources.get(b"XObject") {
            if let Ok((_, Object::Dictionary(xobj_dict))) = doc.dereference(xobjects) {
                for (name, obj_ref) in xobj_dict.iter() {
                    if let Ok((_, obj)) = doc.dereference(obj_ref) {
                        if let Some(img) = try_decode_image(doc, obj) {
                            trace!(
                                "Page {}: using XObject /{}",
                                page,
                                String::from_utf8_lossy(name)
                            );
                            return Ok(img);
                        }
                    }
                }
            }
        }

        Err(PdfError::ImageExtraction(format!(
            "page {} has no decodable embedded image",
            page
        )))
    }
}

impl PageRasterizer for EmbeddedImageRasterizer {
    fn rasterize(&self, path: &Path) -> Result<Vec<DynamicImage>> {
        let doc = load_document(path)?;
        let pages = doc.get_pages();

        debug!("Extracting embedded images from {} pages", pages.len());

        // BTreeMap iteration is ascending page number.
        pages
            .iter()
            .map(|(&page, &page_id)| self.page_image(&doc, page, page_id))
            .collect()
    }
}

fn try_decode_image(doc: &Document, obj: &Object) -> Option<DynamicImage> {
    let stream = match obj {
        Object::Stream(stream) => stream,
        _ => return None,
    };
    let dict = &stream.dict;

    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;

    trace!("Found image object: {}x{}", width, height);

    if width == 0 || height == 0 {
        trace!("Skipping empty image object");
        return None;
    }

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };

        match filter_name {
            Some(b"DCTDecode") => {
                trace!("Decoding JPEG image");
                return image::load_from_memory_with_format(
                    &stream.content,
                    image::ImageFormat::Jpeg,
                )
                .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!(
                    "Unsupported image filter {:?}",
                    filter_name.map(String::from_utf8_lossy)
                );
                return None;
            }
            _ => {}
        }
    }

    // Unfiltered streams make decompressed_content fail; use the raw bytes.
    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);

    decode_raw(&data, width, height, color_space, bits)
}

/// Decode raw 8-bit RGB or gray samples into an RGBA image.
fn decode_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
    bits_per_component: i64,
) -> Option<DynamicImage> {
    if bits_per_component != 8 {
        trace!("Unsupported bits per component: {}", bits_per_component);
        return None;
    }

    let channels: usize = match color_space {
        b"DeviceRGB" | b"RGB" => 3,
        b"DeviceGray" | b"G" => 1,
        _ => {
            trace!(
                "Unsupported color space: {}",
                String::from_utf8_lossy(color_space)
            );
            return None;
        }
    };

    let pixels = (width as usize).checked_mul(height as usize)?;
    let needed = pixels.checked_mul(channels)?;
    let rgba_len = pixels.checked_mul(4)?;

    if width == 0 || height == 0 || data.len() < needed {
        trace!(
            "Unusable image data: {} bytes for {}x{} x {} channels",
            data.len(),
            width,
            height,
            channels
        );
        return None;
    }

    let mut rgba = Vec::with_capacity(rgba_len);
    for px in data[..needed].chunks_exact(channels) {
        match px {
            [r, g, b] => rgba.extend_from_slice(&[*r, *g, *b, 255]),
            [gray] => rgba.extend_from_slice(&[*gray, *gray, *gray, 255]),
            _ => {}
        }
    }

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
}

/// Get the resources dictionary for a page, following /Parent inheritance.
fn get_page_resources(doc: &Document, node_id: ObjectId) -> Option<Dictionary> {
    let dict = match doc.get_object(node_id).ok()? {
        Object::Dictionary(dict) => dict,
        _ => return None,
    };

    if let Ok(resources) = dict.get(b"Resources") {
        if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
            return Some(res_dict.clone());
        }
    }

    match dict.get(b"Parent") {
        Ok(Object::Reference(parent_id)) => get_page_resources(doc, *parent_id),
        _ => None,
    }
}
