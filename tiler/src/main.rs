use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use tiler::{
    check_files, merge_dir, split_file, CanvasSizing, EventSink, SizeSpec, SplitConfig,
    TileFormat, TracingSink,
};

/// Split an image into tiles with a sliding window, or merge tiles back.
#[derive(Parser, Debug)]
#[command(name = "tiler", version, about)]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Directory for rolling log files.
    #[arg(long, default_value = "logs", global = true)]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split an image into smaller windows.
    Split(SplitArgs),
    /// Recreate an image from its split tiles.
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// Path to the input image.
    #[arg(long)]
    image_path: PathBuf,

    /// Directory the tiles are written to. Created if missing.
    #[arg(long)]
    output_dir: PathBuf,

    /// YAML or JSON file with window, stride and format. Flags below
    /// override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Height of the window.
    #[arg(long)]
    window_height: Option<u32>,

    /// Width of the window.
    #[arg(long)]
    window_width: Option<u32>,

    /// Use percentages for the window size. `--window-percent=false` turns off percent mode
    /// set by the config file.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    window_percent: Option<bool>,

    /// Stride height.
    #[arg(long)]
    stride_height: Option<u32>,

    /// Stride width.
    #[arg(long)]
    stride_width: Option<u32>,

    /// Use percentages for the stride. `--stride-percent=false` turns off percent mode
    /// set by the config file.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    stride_percent: Option<bool>,

    /// Tile file format: png, jpg, tiff, bmp.
    #[arg(long)]
    format: Option<TileFormat>,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Directory with the tile files.
    #[arg(long)]
    input_dir: PathBuf,

    /// Path for the merged image.
    #[arg(long)]
    output_path: PathBuf,

    /// Original image to compare the merged result against.
    #[arg(long)]
    test_file: Option<PathBuf>,

    /// Where to write the difference image when the comparison fails.
    #[arg(long, requires = "test_file")]
    diff_output: Option<PathBuf>,

    /// Canvas sizing: bottom-right (from the last tile) or bounds (all tiles).
    #[arg(long, default_value_t = CanvasSizing::BottomRightTile)]
    canvas: CanvasSizing,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = common::log_setup::setup_logging(&cli.log_level, &cli.log_dir, "tiler") {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(cli.command, &TracingSink) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, sink: &dyn EventSink) -> Result<ExitCode> {
    match command {
        Command::Split(args) => {
            let config = split_config(&args)?;
            if config.format.is_lossy() {
                tracing::warn!(
                    format = %config.format,
                    "Lossy tile format, merged output will not match the original exactly"
                );
            }
            split_file(&args.image_path, &args.output_dir, &config, sink)
                .with_context(|| format!("Failed to split {}", args.image_path.display()))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Merge(args) => {
            let report = merge_dir(&args.input_dir, &args.output_path, args.canvas, sink)
                .with_context(|| format!("Failed to merge {}", args.input_dir.display()))?;
            if !report.missing.is_empty() {
                tracing::warn!(
                    missing = report.missing.len(),
                    placed = report.placed,
                    "Merged with missing parts"
                );
            }

            let Some(test_file) = &args.test_file else {
                return Ok(ExitCode::SUCCESS);
            };
            let outcome = check_files(
                test_file,
                &args.output_path,
                args.diff_output.as_deref(),
                sink,
            )
            .context("Difference check failed")?;

            Ok(if outcome.is_match() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
    }
}

/// Config file (or defaults) with command-line values on top.
fn split_config(args: &SplitArgs) -> Result<SplitConfig> {
    let mut config = match &args.config {
        Some(path) => SplitConfig::load(path)?,
        None => SplitConfig::default(),
    };

    config.window = override_size(
        config.window,
        args.window_height,
        args.window_width,
        args.window_percent,
    );
    config.stride = override_size(
        config.stride,
        args.stride_height,
        args.stride_width,
        args.stride_percent,
    );
    if let Some(format) = args.format {
        config.format = format;
    }

    Ok(config)
}

fn override_size(
    base: SizeSpec,
    height: Option<u32>,
    width: Option<u32>,
    percent: Option<bool>,
) -> SizeSpec {
    SizeSpec {
        height: height.unwrap_or(base.height),
        width: width.unwrap_or(base.width),
        is_percent: percent.unwrap_or(base.is_percent),
    }
}
