//! CLI application extracting plain text from images and PDFs.

mod config;
mod extract;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Extract plain text from an image or PDF with OCR
#[derive(Parser)]
#[command(name = "ocrtext")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(flatten)]
    extract: extract::ExtractArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Extracted text owns stdout; logs go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    extract::run(cli.extract, cli.config.as_deref())
}
