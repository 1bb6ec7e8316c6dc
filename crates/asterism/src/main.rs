//! asterism: generate and simplify constellation stroke data.
//!
//! Two batch commands operate on a manifest data file (a JSON list of
//! constellation entries):
//!
//! - `generate` traces one stroke per entry from its figure image.
//! - `simplify` re-simplifies the stored strokes to a small fixed budget.
//!
//! Both write a one-time backup of the data file before the first
//! rewrite and print a summary count when done.
//!
//! # Usage
//!
//! ```text
//! asterism generate --data assets/data/constellations_88.json \
//!     --images "assets/images/Constellation Flash Cards"
//! asterism simplify --data assets/data/constellations_88.json --target-points 20
//! ```

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::process::ExitCode;

use asterism_io::{GenerateOptions, SimplifyOptions, run_generate, run_simplify};
use asterism_pipeline::{DownsampleStrategy, ExtractConfig, SamplingStrategy, SimplifyConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Generate and simplify constellation stroke data.
#[derive(Parser)]
#[command(name = "asterism", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Trace strokes from figure images into the data file.
    Generate(GenerateArgs),
    /// Flatten and re-simplify the strokes stored in the data file.
    Simplify(SimplifyArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Manifest data file (JSON list of entries).
    #[arg(long)]
    data: PathBuf,

    /// Directory of figure images, one `.png` per constellation.
    #[arg(long)]
    images: PathBuf,

    /// Luminance threshold (0-255); brighter pixels are the figure.
    #[arg(long, default_value_t = ExtractConfig::DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Maximum foreground pixels used to build the path.
    #[arg(long, default_value_t = ExtractConfig::DEFAULT_MAX_PIXELS, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_pixels: usize,

    /// How to reduce the pixel set to `--max-pixels`.
    #[arg(long, value_enum, default_value_t = Sampling::Random)]
    sampling: Sampling,

    /// Seed for `--sampling random`; omit for a fresh draw each run.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum points in each extracted stroke.
    #[arg(long, default_value_t = ExtractConfig::DEFAULT_MAX_POINTS, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_points: usize,

    /// Index formula used to downsample the stroke.
    #[arg(long, value_enum, default_value_t = Downsample::Stride)]
    downsample: Downsample,

    /// Decimal places kept in stroke coordinates.
    #[arg(long, default_value_t = ExtractConfig::DEFAULT_PRECISION)]
    precision: u32,

    /// Full extraction config as a JSON string.
    ///
    /// When provided, the individual extraction flags are ignored.
    #[arg(long)]
    config_json: Option<String>,

    /// Report what would change without writing anything.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct SimplifyArgs {
    /// Manifest data file (JSON list of entries).
    #[arg(long)]
    data: PathBuf,

    /// Number of points kept per entry.
    #[arg(long, default_value_t = SimplifyConfig::DEFAULT_TARGET_POINTS, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    target_points: usize,

    /// Decimal places kept in stroke coordinates.
    #[arg(long, default_value_t = SimplifyConfig::DEFAULT_PRECISION)]
    precision: u32,

    /// Full simplification config as a JSON string.
    ///
    /// When provided, the individual simplification flags are ignored.
    #[arg(long)]
    config_json: Option<String>,

    /// Report what would change without writing anything.
    #[arg(long)]
    dry_run: bool,
}

/// Pixel sampling strategy selection.
#[derive(Clone, Copy, ValueEnum)]
enum Sampling {
    /// Uniform random sample (reproducible with `--seed`).
    Random,
    /// Evenly spaced pixels in raster order.
    Stride,
    /// Use every foreground pixel.
    Disabled,
}

/// Downsampling formula selection.
#[derive(Clone, Copy, ValueEnum)]
enum Downsample {
    /// `floor(i * L / N)`: may drop the last point.
    Stride,
    /// `round(i * (L - 1) / (N - 1))`: keeps first and last point.
    Endpoints,
}

/// Build an [`ExtractConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual parameter flags are ignored.
fn extract_config(args: &GenerateArgs) -> Result<ExtractConfig, String> {
    if let Some(ref json) = args.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(ExtractConfig {
        threshold: args.threshold,
        max_pixels: args.max_pixels,
        sampling: match args.sampling {
            Sampling::Random => SamplingStrategy::Random { seed: args.seed },
            Sampling::Stride => SamplingStrategy::Stride,
            Sampling::Disabled => SamplingStrategy::Disabled,
        },
        max_points: args.max_points,
        downsample: match args.downsample {
            Downsample::Stride => DownsampleStrategy::Stride,
            Downsample::Endpoints => DownsampleStrategy::Endpoints,
        },
        precision: args.precision,
    })
}

/// Build a [`SimplifyConfig`] from CLI arguments.
fn simplify_config(args: &SimplifyArgs) -> Result<SimplifyConfig, String> {
    if let Some(ref json) = args.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(SimplifyConfig {
        target_points: args.target_points,
        precision: args.precision,
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate(args) => {
            let config = match extract_config(&args) {
                Ok(c) => c,
                Err(msg) => {
                    log::error!("{msg}");
                    return ExitCode::FAILURE;
                }
            };
            log::debug!("Config: {config:?}");

            let options = GenerateOptions {
                data_path: args.data,
                images_dir: args.images,
                config,
                dry_run: args.dry_run,
            };
            match run_generate(&options) {
                Ok(summary) => {
                    println!(
                        "Updated strokes for {} entries in {}",
                        summary.updated,
                        options.data_path.display(),
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    log::error!("{e}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Simplify(args) => {
            let config = match simplify_config(&args) {
                Ok(c) => c,
                Err(msg) => {
                    log::error!("{msg}");
                    return ExitCode::FAILURE;
                }
            };
            log::debug!("Config: {config:?}");

            let options = SimplifyOptions {
                data_path: args.data,
                config,
                dry_run: args.dry_run,
            };
            match run_simplify(&options) {
                Ok(summary) => {
                    println!(
                        "Simplified strokes for {} entries in {}",
                        summary.updated,
                        options.data_path.display(),
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    log::error!("{e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
