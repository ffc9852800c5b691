//! # czimeta
//!
//! Command-line access to the metadata of tiled Zeiss CZI acquisitions.
//!
//! ## Usage
//!
//! ```bash
//! # Plane table as CSV on stdout, or to a file
//! czimeta planes scan.ome.xml
//! czimeta planes scan.czi -o planes.parquet --timezone 9
//!
//! # Channel, pixel size and camera settings as JSON
//! czimeta channels scan.ome.xml
//! czimeta hardware scan.ome.xml --roi-key "HardwareSetting|ParameterCollection|Frame"
//!
//! # Overview
//! czimeta info scan.ome.xml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
