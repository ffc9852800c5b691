use anyhow::{Context, Result};
use log::info;
use std::io;
use std::path::{Path, PathBuf};

use czimeta::planes::{timezone_from_hours, utc};
use czimeta::source::ReaderOptions;

/// Build the plane table and write it to `output` or stdout
pub fn run(
    input: &Path,
    output: Option<PathBuf>,
    timezone_hours: Option<i32>,
    options: &ReaderOptions,
) -> Result<()> {
    let timezone = match timezone_hours {
        Some(hours) => timezone_from_hours(hours)?,
        None => utc(),
    };

    info!("Input:    {}", input.display());
    info!("Timezone: {}", timezone);

    let document = super::load_document(input, options)?;
    let table = document
        .plane_table(timezone)
        .context("Failed to build plane table")?;
    info!("Planes:   {} over {} images", table.len(), table.image_count());

    match output {
        Some(path) => {
            let format = table
                .write_to_path(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Format:   {:?}", format);
        }
        None => table
            .write_csv(io::stdout().lock())
            .context("Failed to write CSV to stdout")?,
    }

    Ok(())
}
