//! Input classification by file extension.

use std::path::Path;

/// Extensions treated as single still images.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "tiff", "webp"];

/// Extension treated as a multi-page document.
const PDF_EXTENSION: &str = "pdf";

/// Kind of input file, decided from its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A single still image, OCR'd once.
    Image,
    /// A PDF, rasterized page by page.
    Pdf,
    /// Anything else, including files without an extension.
    Unsupported,
}

impl FileKind {
    /// Classify a path by the lowercased suffix of its file name.
    ///
    /// Matches on the `.<ext>` suffix of the name rather than on
    /// [`Path::extension`], so a dot-file such as `.png` counts as an image.
    pub fn classify(path: &Path) -> Self {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_lowercase(),
            None => return FileKind::Unsupported,
        };

        let has_suffix = |ext: &str| {
            name.len() > ext.len()
                && name.ends_with(ext)
                && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
        };

        if IMAGE_EXTENSIONS.iter().any(|ext| has_suffix(ext)) {
            FileKind::Image
        } else if has_suffix(PDF_EXTENSION) {
            FileKind::Pdf
        } else {
            FileKind::Unsupported
        }
    }

    /// Whether this kind is routed to OCR at all.
    pub fn is_supported(self) -> bool {
        !matches!(self, FileKind::Unsupported)
    }
}
