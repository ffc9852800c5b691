use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use czimeta::source::{ExportedXmlSource, OmeXmlSource, ReaderOptions};
use czimeta::OmeXml;

mod config;
mod extract;
mod info;
mod planes;

pub use config::Config;

/// czimeta - OME-XML metadata extraction for tiled Zeiss CZI acquisitions
#[derive(Parser)]
#[command(name = "czimeta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file (default: ./czimeta.toml if present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the plane table (positions, time offsets, acquisition timestamps)
    Planes {
        /// OME-XML document, or an image file with a .ome.xml sidecar
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (.csv or .parquet); CSV on stdout when omitted
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Acquisition timezone in whole hours east of UTC
        #[arg(short, long, allow_hyphen_values = true)]
        timezone: Option<i32>,
    },

    /// Print the channel definitions as JSON
    Channels {
        /// OME-XML document, or an image file with a .ome.xml sidecar
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Report one list per image instead of requiring identical channels
        #[arg(long)]
        per_image: bool,
    },

    /// Print the physical pixel size as JSON
    PixelSize {
        /// OME-XML document, or an image file with a .ome.xml sidecar
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Report one size per image instead of requiring identical sizes
        #[arg(long)]
        per_image: bool,
    },

    /// Print all structured annotations as a JSON object
    Annotations {
        /// OME-XML document, or an image file with a .ome.xml sidecar
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Print camera binning, ROI, LUT and bit depth as JSON
    Hardware {
        /// OME-XML document, or an image file with a .ome.xml sidecar
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Annotation key holding the camera ROI
        #[arg(long, value_name = "KEY")]
        roi_key: Option<String>,
    },

    /// Summarize image count, dimensions, channels and pixel size
    Info {
        /// OME-XML document, or an image file with a .ome.xml sidecar
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Planes {
            input,
            output,
            timezone,
        } => planes::run(
            &input,
            output,
            timezone.or(config.planes.timezone_hours),
            &config.reader,
        ),
        Commands::Channels { input, per_image } => {
            extract::run_channels(&input, per_image, &config.reader)
        }
        Commands::PixelSize { input, per_image } => {
            extract::run_pixel_size(&input, per_image, &config.reader)
        }
        Commands::Annotations { input } => extract::run_annotations(&input, &config.reader),
        Commands::Hardware { input, roi_key } => {
            extract::run_hardware(&input, roi_key.or(config.annotations.roi_key), &config.reader)
        }
        Commands::Info { input } => info::run(&input, &config.reader),
    }
}

/// Read and parse the document for `input`
fn load_document(input: &Path, options: &ReaderOptions) -> Result<OmeXml> {
    ExportedXmlSource
        .read_document(input, options)
        .with_context(|| format!("Failed to load OME-XML for {}", input.display()))
}

/// Pretty-print `value` as JSON on stdout
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
