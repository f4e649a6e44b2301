//! tinyqr CLI - render a payload as a QR code PNG or in the terminal.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tinyqr::{EncodeOptions, OverflowPolicy, QrMatrix, RenderOptions, DEFAULT_MARGIN, DEFAULT_SCALE};

#[derive(Parser)]
#[command(name = "tinyqr")]
#[command(about = "Minimal QR code generator", long_about = None)]
struct Cli {
    /// Text to encode, e.g. an otpauth:// URI
    text: String,

    /// Pixels per module
    #[arg(short, long, default_value_t = DEFAULT_SCALE)]
    scale: u32,

    /// Quiet zone width in modules
    #[arg(short, long, default_value_t = DEFAULT_MARGIN)]
    margin: u32,

    /// Write a PNG image instead of printing to the terminal
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to do with payloads too long for version 10: reject or clamp
    #[arg(long, default_value = "reject")]
    overflow: OverflowPolicy,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tinyqr=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let matrix = tinyqr::encode(cli.text.as_bytes(), &EncodeOptions::with_overflow(cli.overflow))?;
    info!(version = matrix.version(), size = matrix.size(), "encoded {} bytes", cli.text.len());

    match cli.output {
        Some(path) => {
            let img = tinyqr::render::render_image(&matrix, &RenderOptions::new(cli.scale, cli.margin))?;
            img.save(&path).with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}x{} image to {}", img.width(), img.height(), path.display());
        }
        None => print_matrix(&matrix, cli.margin as usize),
    }

    Ok(())
}

/// Print the matrix using Unicode half blocks, two module rows per line.
/// The terminal is assumed to be light text on dark background, so light
/// modules are printed as blocks.
fn print_matrix(m: &QrMatrix, margin: usize) {
    let rows = m.to_rows();
    let n = m.size() as isize;
    let quiet = margin as isize;
    // modules outside of the symbol belong to the quiet zone and are light
    let light = |x: isize, y: isize| {
        x < 0 || y < 0 || !rows.get(y as usize).and_then(|row| row.get(x as usize)).copied().unwrap_or(false)
    };

    let mut y = -quiet;
    while y < n + quiet {
        let line: String = (-quiet..n + quiet)
            .map(|x| match (light(x, y), light(x, y + 1)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            })
            .collect();
        println!("{}", line);
        y += 2;
    }
}
