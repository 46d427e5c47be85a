//! BatchResize CLI - folder-to-folder image resizer
//!
//! Resizes every recognized image in one folder to a fixed resolution and
//! writes the results, under the same names, into another folder.

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use console::style;
use tracing::debug;

use batchresize::{init, BatchConfig, BatchEvent, Dimensions, FilterType, ProcessingEngine};

/// BatchResize - force every image in a folder to one size
#[derive(Parser)]
#[command(
    name = "batchresize",
    version,
    about = "Resize every PNG/JPEG/BMP/GIF in a folder to a fixed resolution",
    long_about = "Reads the images directly inside INPUT (png, jpg, jpeg, bmp, gif; any case), \
                  stretches each one to exactly WIDTHxHEIGHT and saves it under the same name in \
                  OUTPUT, which is created if needed. The first file that cannot be read or \
                  written stops the run."
)]
struct Cli {
    /// Folder containing the source images
    #[arg(short, long, value_name = "PATH", env = "BATCHRESIZE_INPUT")]
    input: PathBuf,

    /// Folder receiving the resized images
    #[arg(short, long, value_name = "PATH", env = "BATCHRESIZE_OUTPUT")]
    output: PathBuf,

    /// Output size, aspect ratio is not preserved
    #[arg(short, long, value_name = "WxH", default_value = "294x221", value_parser = parse_dimensions)]
    size: Dimensions,

    /// Resampling filter
    #[arg(short, long, value_enum, default_value_t = CliFilter::CatmullRom)]
    filter: CliFilter,

    /// Show what would be processed without actually processing
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// CLI-compatible filter enum
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<CliFilter> for FilterType {
    fn from(filter: CliFilter) -> Self {
        match filter {
            CliFilter::Nearest => FilterType::Nearest,
            CliFilter::Triangle => FilterType::Triangle,
            CliFilter::CatmullRom => FilterType::CatmullRom,
            CliFilter::Gaussian => FilterType::Gaussian,
            CliFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Parse dimension string (e.g., "294x221")
fn parse_dimensions(s: &str) -> Result<Dimensions, String> {
    Dimensions::parse(s).map_err(|e| e.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    init(log_level);

    let config = BatchConfig::new(&cli.input, &cli.output)
        .target(cli.size)
        .filter(cli.filter.into());
    debug!("Batch configuration: {:?}", config);

    let engine = ProcessingEngine::new();

    if cli.dry_run {
        match engine.plan_batch(&config).await {
            Ok(plan) => {
                println!("{} files would be resized to {}:", style(plan.len()).bold(), config.resize.target);
                for file in &plan {
                    println!("  {} -> {}", file.input_path.display(), file.output_path.display());
                }
            }
            Err(e) => {
                eprintln!("{}: {}", style("Error").red().bold(), e.user_message());
                process::exit(1);
            }
        }
        return;
    }

    let result = engine
        .run_batch(&config, |event| match event {
            BatchEvent::FileResized { file_name, .. } => println!("Resized: {}", file_name),
            BatchEvent::BatchCompleted { .. } => println!("All images resized."),
        })
        .await;

    if let Err(e) = result {
        eprintln!("{}: {}", style("Error").red().bold(), e.user_message());
        process::exit(1);
    }
}
