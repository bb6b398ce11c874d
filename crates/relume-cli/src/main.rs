//! Relume — render an HDR raw float image through a tone curve.
//!
//! Headless companion to the interactive editor: loads a `.raw` file,
//! optionally bends the curve's midpoint, writes the tone-mapped result as
//! an 8-bit PNG, and prints an intensity histogram to the terminal.

mod logger;

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use tracing::{error, info};

use relume_core::{RawFloatImage, ToneCurve};

const HISTOGRAM_BINS: usize = 24;
const HISTOGRAM_WIDTH: usize = 50;

fn main() -> ExitCode {
    logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, output, midpoint) = match args.as_slice() {
        [input, output] => (input, output, None),
        [input, output, midpoint] => {
            let y: f64 = midpoint
                .parse()
                .with_context(|| format!("midpoint '{midpoint}' is not a number"))?;
            if !(0.0..=1.0).contains(&y) {
                bail!("midpoint must be in [0, 1], got {y}");
            }
            (input, output, Some(y))
        }
        _ => bail!("usage: relume <input.raw> <output.png> [midpoint-y]"),
    };

    let image = RawFloatImage::load_path(input)
        .with_context(|| format!("failed to load raw image '{input}'"))?;
    info!(
        "loaded {}x{} pixels, channel max {:.4}",
        image.width(),
        image.height(),
        image.channel_max()
    );

    let mut curve = ToneCurve::new();
    if let Some(y) = midpoint {
        curve.set_point(1, 0.5, y)?;
        info!("curve midpoint moved to {y}");
    }

    let rendered = image.render(&curve);
    rendered
        .save(output)
        .with_context(|| format!("failed to write '{output}'"))?;
    info!("wrote {output}");

    print_histogram(&image, &curve);
    Ok(())
}

/// Print before/after intensity histograms as horizontal bars.
fn print_histogram(image: &RawFloatImage, curve: &ToneCurve) {
    let before = image.intensity_histogram(HISTOGRAM_BINS, None, None);
    let after = image.intensity_histogram(HISTOGRAM_BINS, Some(curve), None);

    println!("\nintensity distribution (source | remapped):");
    for i in 0..HISTOGRAM_BINS {
        let src = (before.normalized_value(i) * HISTOGRAM_WIDTH as f64).round() as usize;
        let out = (after.normalized_value(i) * HISTOGRAM_WIDTH as f64).round() as usize;
        println!(
            "{i:>3} {:<width$} | {}",
            "#".repeat(src),
            "#".repeat(out),
            width = HISTOGRAM_WIDTH
        );
    }
}
