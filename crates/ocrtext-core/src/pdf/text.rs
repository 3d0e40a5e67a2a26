//! Text layer extraction using pdf-extract.

use std::path::Path;

use lopdf::Document;
use tracing::debug;

use super::Result;
use crate::error::PdfError;

/// Read the embedded text of the PDF at `path`.
///
/// Scanned documents typically have no text layer and give an empty or
/// whitespace-only string.
pub fn extract_text_layer(path: &Path) -> Result<String> {
    let data = plain_bytes(path)?;
    let text = pdf_extract::extract_text_from_mem(&data)
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

    debug!("Text layer: {} chars", text.len());
    Ok(text)
}

/// File bytes, re-saved without encryption when the user password is empty.
fn plain_bytes(path: &Path) -> Result<Vec<u8>> {
    let raw = std::fs::read(path)?;
    let mut doc = Document::load_mem(&raw).map_err(|e| PdfError::Parse(e.to_string()))?;

    if !doc.is_encrypted() {
        return Ok(raw);
    }

    if doc.decrypt("").is_err() {
        return Err(PdfError::Encrypted);
    }
    debug!("Decrypted PDF with empty password");

    let mut decrypted = Vec::new();
    doc.save_to(&mut decrypted)
        .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
    Ok(decrypted)
}
