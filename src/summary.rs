//! Series count and dimensions of the first image

use std::fmt;

use serde::Serialize;

use crate::omexml::{pixels_of, OmeXml, OmeXmlError};

/// Number of images and the dimensions of the first one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSizeSummary {
    /// Number of images (series) in the document
    pub series_count: usize,
    /// Time points
    pub size_t: u64,
    /// Channels
    pub size_c: u64,
    /// Width in pixels
    pub size_x: u64,
    /// Height in pixels
    pub size_y: u64,
    /// Z slices
    pub size_z: u64,
}

impl ImageSizeSummary {
    /// Log each value at info level
    pub fn log_summary(&self) {
        log::info!("series count: {}", self.series_count);
        log::info!("sizeT: {}", self.size_t);
        log::info!("sizeC: {}", self.size_c);
        log::info!("sizeX: {}", self.size_x);
        log::info!("sizeY: {}", self.size_y);
        log::info!("sizeZ: {}", self.size_z);
    }
}

impl fmt::Display for ImageSizeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "series count: {}", self.series_count)?;
        writeln!(f, "sizeT: {}", self.size_t)?;
        writeln!(f, "sizeC: {}", self.size_c)?;
        writeln!(f, "sizeX: {}", self.size_x)?;
        writeln!(f, "sizeY: {}", self.size_y)?;
        write!(f, "sizeZ: {}", self.size_z)
    }
}

impl OmeXml {
    /// Summarize the image sizes; fails if the document has no image
    pub fn image_size_summary(&self) -> Result<ImageSizeSummary, OmeXmlError> {
        let images = self.images()?;
        let first = images
            .first()
            .ok_or_else(|| OmeXmlError::missing("OME/Image"))?;
        let pixels = pixels_of(first)?;

        let size = |name: &str| -> Result<u64, OmeXmlError> {
            let raw = pixels
                .attribute(name)
                .ok_or_else(|| OmeXmlError::missing(format!("Pixels/@{}", name)))?;
            raw.trim()
                .parse()
                .map_err(|_| OmeXmlError::invalid_value(name, raw))
        };

        Ok(ImageSizeSummary {
            series_count: images.len(),
            size_t: size("SizeT")?,
            size_c: size("SizeC")?,
            size_x: size("SizeX")?,
            size_y: size("SizeY")?,
            size_z: size("SizeZ")?,
        })
    }
}

/// Parse `ome_xml` and summarize its image sizes, logging the result when
/// `log_summary` is set
pub fn summarize_image_size(ome_xml: &str, log_summary: bool) -> Result<ImageSizeSummary, OmeXmlError> {
    let summary = OmeXml::parse(ome_xml)?.image_size_summary()?;
    if log_summary {
        summary.log_summary();
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TILES: &str = r#"<OME>
      <Image ID="Image:0"><Pixels SizeT="3" SizeC="2" SizeX="2048" SizeY="1024" SizeZ="5"/></Image>
      <Image ID="Image:1"><Pixels SizeT="3" SizeC="2" SizeX="2048" SizeY="1024" SizeZ="5"/></Image>
    </OME>"#;

    #[test]
    fn test_summary() {
        let summary = summarize_image_size(TWO_TILES, false).unwrap();
        assert_eq!(
            summary,
            ImageSizeSummary {
                series_count: 2,
                size_t: 3,
                size_c: 2,
                size_x: 2048,
                size_y: 1024,
                size_z: 5,
            }
        );
    }

    #[test]
    fn test_display() {
        let summary = summarize_image_size(TWO_TILES, true).unwrap();
        let text = summary.to_string();
        assert!(text.starts_with("series count: 2\n"));
        assert!(text.ends_with("sizeZ: 5"));
    }

    #[test]
    fn test_no_image() {
        let err = summarize_image_size("<OME/>", false).unwrap_err();
        assert_eq!(err, OmeXmlError::MissingField("OME/Image".to_string()));
    }

    #[test]
    fn test_invalid_size() {
        let xml = r#"<OME><Image><Pixels SizeT="-1" SizeC="1" SizeX="1" SizeY="1" SizeZ="1"/></Image></OME>"#;
        let err = summarize_image_size(xml, false).unwrap_err();
        assert!(matches!(err, OmeXmlError::InvalidValue { ref field, .. } if field == "SizeT"));
    }
}
