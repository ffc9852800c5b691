use anyhow::{Context, Result};
use std::path::Path;

use czimeta::channels::ChannelList;
use czimeta::pixel_size::PixelSize;
use czimeta::properties::Domain;
use czimeta::source::{ExportedXmlSource, ReaderOptions};
use czimeta::summary::ImageSizeSummary;

#[cfg(feature = "colorized_output")]
use console::style;

/// Display a summary of the document for `input`
pub fn run(input: &Path, options: &ReaderOptions) -> Result<()> {
    let document = super::load_document(input, options)?;
    let summary = document
        .image_size_summary()
        .context("Failed to summarize image size")?;
    summary.log_summary();

    // Tiles with differing settings are still worth summarizing
    let channels = document.channels(false).context("Failed to read channels")?;
    let pixel_sizes = document
        .pixel_size(false)
        .context("Failed to read pixel size")?;
    let plane_count: usize = document
        .extract_properties(&[], Domain::Plane)
        .context("Failed to count planes")?
        .into_per_plane()
        .map_or(0, |groups| groups.iter().map(Vec::len).sum());

    let source = ExportedXmlSource::resolve(input);
    let first_pixel_size = pixel_sizes
        .per_image()
        .and_then(|sizes| sizes.first())
        .cloned()
        .unwrap_or_default();

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", style("OME-XML Document Information").bold().cyan());
        println!("{}", style("============================").cyan());
        println!("{}: {}", style("File").bold(), source.display());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("OME-XML Document Information");
        println!("============================");
        println!("File: {}", source.display());
    }
    println!();

    print_sizes(&summary, plane_count);
    println!();
    print_channels(&channels);
    println!();
    print_pixel_size(&first_pixel_size, pixel_sizes.per_image().map_or(0, <[_]>::len));

    Ok(())
}

fn print_sizes(summary: &ImageSizeSummary, plane_count: usize) {
    println!("Dimensions:");
    println!("  Images (tiles): {}", summary.series_count);
    println!("  Planes (total): {}", plane_count);
    println!(
        "  First image:    X={} Y={} Z={} C={} T={}",
        summary.size_x, summary.size_y, summary.size_z, summary.size_c, summary.size_t
    );
}

fn print_channels(channels: &ChannelList) {
    let per_image = channels.per_image().unwrap_or_default();
    let uniform = per_image.windows(2).all(|pair| pair[0] == pair[1]);

    println!("Channels:");
    if let Some(first) = per_image.first() {
        for (i, channel) in first.iter().enumerate() {
            println!("  {:3}. {}", i, channel.name().unwrap_or("<unnamed>"));
        }
    }
    print_status("Channels identical across images", uniform);
}

fn print_pixel_size(size: &PixelSize, image_count: usize) {
    let format_axis = |value: Option<f64>, unit: Option<&str>| match value {
        Some(v) => format!("{} {}", v, unit.unwrap_or("")).trim_end().to_string(),
        None => "<not set>".to_string(),
    };

    println!("Pixel size ({} images):", image_count);
    println!("  X: {}", format_axis(size.x, size.x_unit.as_deref()));
    println!("  Y: {}", format_axis(size.y, size.y_unit.as_deref()));
}

fn print_status(label: &str, ok: bool) {
    #[cfg(feature = "colorized_output")]
    {
        use console::Emoji;

        static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
        static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");

        if ok {
            println!("  {} {}", style(OK).green(), label);
        } else {
            println!("  {} {}", style(WARN).yellow(), style(label).yellow());
        }
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("  [{}] {}", if ok { "OK" } else { "WARN" }, label);
    }
}
