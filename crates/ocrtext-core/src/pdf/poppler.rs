//! Page rendering through poppler's `pdftoppm` command.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;
use tracing::{debug, warn};

use super::{page_count, PageRasterizer, Result};
use crate::error::PdfError;

/// Prefix of the files `pdftoppm` writes into the scratch directory.
const PAGE_PREFIX: &str = "page";

/// Rasterizer that shells out to `pdftoppm` and reads the PNGs back.
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    binary: PathBuf,
    dpi: u32,
}

impl PopplerRasterizer {
    pub fn new(binary: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            binary: binary.into(),
            dpi,
        }
    }

    fn args(&self, input: &Path, out_prefix: &Path) -> Vec<OsString> {
        vec![
            "-r".into(),
            self.dpi.to_string().into(),
            "-png".into(),
            input.as_os_str().to_owned(),
            out_prefix.as_os_str().to_owned(),
        ]
    }
}

impl PageRasterizer for PopplerRasterizer {
    fn rasterize(&self, path: &Path) -> Result<Vec<DynamicImage>> {
        let expected = match page_count(path) {
            Ok(0) => {
                debug!("PDF has no pages, nothing to render");
                return Ok(Vec::new());
            }
            Ok(n) => Some(n as usize),
            Err(e) => {
                debug!("Could not count pages ({}), leaving it to pdftoppm", e);
                None
            }
        };

        let scratch = tempfile::tempdir()?;
        let prefix = scratch.path().join(PAGE_PREFIX);

        debug!(
            "Rendering {} at {} dpi with {}",
            path.display(),
            self.dpi,
            self.binary.display()
        );

        let output = Command::new(&self.binary)
            .args(self.args(path, &prefix))
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => PdfError::RasterizerUnavailable(
                    format!("cannot run {}: {}", self.binary.display(), e),
                ),
                _ => PdfError::Io(e),
            })?;

        if !output.status.success() {
            return Err(PdfError::Render(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let files = collect_page_files(scratch.path())?;
        if let Some(expected) = expected {
            if files.len() != expected {
                warn!(
                    "pdftoppm produced {} pages, document has {}",
                    files.len(),
                    expected
                );
            }
        }

        files
            .iter()
            .map(|file| {
                image::open(file).map_err(|e| {
                    PdfError::Render(format!("cannot read {}: {}", file.display(), e))
                })
            })
            .collect()
    }
}

/// List `page-N.png` files in `dir`, ordered by page number.
///
/// `pdftoppm` zero-pads N to the width of the page count, so the number is
/// parsed rather than relying on name order.
fn collect_page_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<(u32, PathBuf)> = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let number = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(PAGE_PREFIX))
            .and_then(|n| n.strip_prefix('-'))
            .and_then(|n| n.strip_suffix(".png"))
            .and_then(|n| n.parse::<u32>().ok());

        if let Some(number) = number {
            pages.push((number, path));
        }
    }

    pages.sort_by_key(|(number, _)| *number);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}
