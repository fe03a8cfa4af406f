//! `doc-binarize`: binarize a document image with local adaptive thresholding.
//!
//! Parameters come from built-in defaults, then an optional JSON config
//! (`--config`), then individual flags, later sources winning.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use serde::Serialize;

use doc_binarize::{io, BinarizeConfig, BinarizeError, BinarizeParams, GrayscaleMethod, Weighting};

#[derive(Parser, Debug)]
#[command(name = "doc-binarize")]
#[command(version)]
#[command(about = "Binarize document images with local adaptive thresholding", long_about = None)]
struct Cli {
    /// Input image (PNG, JPEG, ...)
    input: PathBuf,

    /// Output PNG path (default: `<input stem>_bin.png` next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file with pipeline parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side of the local window; even values are bumped to the next odd one
    #[arg(short, long)]
    block_size: Option<usize>,

    /// Value subtracted from the local mean; may be negative
    #[arg(short, long, allow_negative_numbers = true)]
    sensitivity: Option<f32>,

    /// Weighting of the local mean
    #[arg(short, long, value_enum)]
    weighting: Option<WeightingArg>,

    /// Color to gray conversion
    #[arg(short, long, value_enum)]
    grayscale: Option<GrayscaleArg>,

    /// Gaussian pre-blur kernel size
    #[arg(long, conflicts_with = "no_pre_blur")]
    pre_blur: Option<usize>,

    /// Skip the pre-blur step
    #[arg(long, default_value_t = false)]
    no_pre_blur: bool,

    /// Downscale inputs whose longer side exceeds this many pixels
    #[arg(long, conflicts_with = "no_max_side")]
    max_side: Option<u32>,

    /// Never downscale the input
    #[arg(long, default_value_t = false)]
    no_max_side: bool,

    /// Print a JSON summary of the run to stdout
    #[arg(long, default_value_t = false)]
    report: bool,

    /// Log verbosity
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevelArg,

    /// Emit JSON-formatted tracing events
    #[cfg(feature = "tracing")]
    #[arg(long, default_value_t = false)]
    json_log: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WeightingArg {
    Uniform,
    Gaussian,
}

impl From<WeightingArg> for Weighting {
    fn from(arg: WeightingArg) -> Self {
        match arg {
            WeightingArg::Uniform => Weighting::Uniform,
            WeightingArg::Gaussian => Weighting::Gaussian,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GrayscaleArg {
    Mean,
    Luminance,
}

impl From<GrayscaleArg> for GrayscaleMethod {
    fn from(arg: GrayscaleArg) -> Self {
        match arg {
            GrayscaleArg::Mean => GrayscaleMethod::Mean,
            GrayscaleArg::Luminance => GrayscaleMethod::Luminance,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Off => LevelFilter::Off,
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    input: PathBuf,
    output: PathBuf,
    input_width: u32,
    input_height: u32,
    width: usize,
    height: usize,
    foreground_ratio: f64,
    params: BinarizeParams,
    max_side: Option<u32>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) {
    let _ = doc_binarize::core::init_with_level(cli.log_level.into());
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) {
    let level: LevelFilter = cli.log_level.into();
    let _ = tracing_log::LogTracer::init_with_filter(level);
    doc_binarize::core::init_tracing(cli.json_log, level);
}

fn resolve_config(cli: &Cli) -> Result<BinarizeConfig, BinarizeError> {
    let mut cfg = match &cli.config {
        Some(path) => BinarizeConfig::load_json(path)?,
        None => BinarizeConfig::default(),
    };
    let threshold = &mut cfg.params.threshold;
    if let Some(block_size) = cli.block_size {
        threshold.block_size = block_size;
    }
    if let Some(sensitivity) = cli.sensitivity {
        threshold.sensitivity = sensitivity;
    }
    if let Some(weighting) = cli.weighting {
        threshold.weighting = weighting.into();
    }
    if let Some(grayscale) = cli.grayscale {
        cfg.params.grayscale = grayscale.into();
    }
    if cli.no_pre_blur {
        cfg.params.pre_blur = None;
    } else if let Some(size) = cli.pre_blur {
        cfg.params.pre_blur = Some(size);
    }
    if cli.no_max_side {
        cfg.max_side = None;
    } else if let Some(max_side) = cli.max_side {
        cfg.max_side = Some(max_side);
    }
    cfg.validate()?;
    Ok(cfg)
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    input.with_file_name(format!("{stem}_bin.png"))
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(cli)))]
fn run(cli: &Cli) -> Result<(), BinarizeError> {
    let cfg = resolve_config(cli)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input));

    let img = io::load_image(&cli.input)?;
    let binary = io::binarize_image(&img, &cfg)?;
    io::save_png(&binary, &output)?;
    info!(
        "wrote {} ({}x{}, {:.1}% foreground)",
        output.display(),
        binary.width(),
        binary.height(),
        100.0 * binary.foreground_ratio()
    );

    if cli.report {
        let report = Report {
            input: cli.input.clone(),
            output,
            input_width: img.width(),
            input_height: img.height(),
            width: binary.width(),
            height: binary.height(),
            foreground_ratio: binary.foreground_ratio(),
            params: cfg.params,
            max_side: cfg.max_side,
        };
        let json = serde_json::to_string_pretty(&report).map_err(BinarizeError::Report)?;
        println!("{json}");
    }
    Ok(())
}
