//! Extract command - OCR a single image or PDF and print its text.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use ocrtext_core::{Extractor, LazyEngine, PureOcrEngine, Rasterizer, RasterizerKind};

/// Arguments for text extraction.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (png, jpg, jpeg, tiff, webp or pdf)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory holding det.onnx, latin_rec.onnx and latin_dict.txt
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// How PDF pages are turned into images
    #[arg(long, value_enum)]
    rasterizer: Option<RasterizerArg>,

    /// Fail on unsupported file types instead of printing nothing
    #[arg(long)]
    strict: bool,

    /// Print a PDF's embedded text when it has any, OCR otherwise
    #[arg(long)]
    text_layer: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum RasterizerArg {
    /// poppler when available, embedded page images otherwise
    Auto,
    /// poppler's pdftoppm
    Poppler,
    /// images embedded in each page
    Embedded,
}

impl From<RasterizerArg> for RasterizerKind {
    fn from(arg: RasterizerArg) -> Self {
        match arg {
            RasterizerArg::Auto => RasterizerKind::Auto,
            RasterizerArg::Poppler => RasterizerKind::Poppler,
            RasterizerArg::Embedded => RasterizerKind::Embedded,
        }
    }
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::config::load(config_path)?;
    if let Some(model_dir) = args.model_dir {
        config.models.model_dir = model_dir;
    }
    if let Some(rasterizer) = args.rasterizer {
        config.pdf.rasterizer = rasterizer.into();
    }
    if args.strict {
        config.extraction.strict_formats = true;
    }
    if args.text_layer {
        config.pdf.prefer_text_layer = true;
    }

    let models = config.models.clone();
    let engine = LazyEngine::new(move || PureOcrEngine::from_models(&models));
    let extractor = Extractor::new(engine, Rasterizer::from_config(&config.pdf))
        .with_strict_formats(config.extraction.strict_formats)
        .with_text_layer(config.pdf.prefer_text_layer);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} page {pos}/{len}")?
            .progress_chars("##-"),
    );

    let text = extractor
        .extract_with_progress(&args.input, |done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        })
        .with_context(|| format!("failed to extract text from {}", args.input.display()))?;

    pb.finish_and_clear();

    if let Some(output_path) = &args.output {
        fs::write(output_path, format!("{}\n", text))
            .with_context(|| format!("failed to write {}", output_path.display()))?;
    } else {
        println!("{}", text);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
