//! Physical pixel size of each image

use serde::Serialize;

use crate::omexml::{OmeXml, OmeXmlError};
use crate::properties::{optional_f64, optional_text, Domain, Record};

/// `Pixels` attributes read for the pixel size, in record order
pub const PIXEL_SIZE_KEYS: [&str; 4] = [
    "@PhysicalSizeX",
    "@PhysicalSizeXUnit",
    "@PhysicalSizeY",
    "@PhysicalSizeYUnit",
];

/// Physical size of one pixel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PixelSize {
    /// `PhysicalSizeX`
    pub x: Option<f64>,
    /// `PhysicalSizeXUnit` (OME defaults to µm when absent)
    pub x_unit: Option<String>,
    /// `PhysicalSizeY`
    pub y: Option<f64>,
    /// `PhysicalSizeYUnit`
    pub y_unit: Option<String>,
}

/// Result of pixel-size extraction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PixelSizes {
    /// The size shared by every image
    Uniform(PixelSize),
    /// One size per image, in image order
    PerImage(Vec<PixelSize>),
}

impl PixelSizes {
    /// The shared size, if extraction assumed uniform sizes
    pub fn uniform(&self) -> Option<&PixelSize> {
        match self {
            PixelSizes::Uniform(size) => Some(size),
            PixelSizes::PerImage(_) => None,
        }
    }

    /// The per-image sizes, if extraction did not assume uniform sizes
    pub fn per_image(&self) -> Option<&[PixelSize]> {
        match self {
            PixelSizes::PerImage(sizes) => Some(sizes.as_slice()),
            PixelSizes::Uniform(_) => None,
        }
    }
}

impl OmeXml {
    /// Physical X/Y pixel size and units.
    ///
    /// With `assume_uniform`, all images must agree field by field.
    pub fn pixel_size(&self, assume_uniform: bool) -> Result<PixelSizes, OmeXmlError> {
        let records = self
            .extract_properties(&PIXEL_SIZE_KEYS, Domain::Pixels)?
            .into_per_image()
            .unwrap_or_default();

        if !assume_uniform {
            return records
                .iter()
                .map(pixel_size_from)
                .collect::<Result<Vec<_>, _>>()
                .map(PixelSizes::PerImage);
        }

        // Attributes are compared as written, before any number conversion
        let (first, others) = records
            .split_first()
            .ok_or_else(|| OmeXmlError::missing("OME/Image"))?;
        for (offset, other) in others.iter().enumerate() {
            let mismatch = PIXEL_SIZE_KEYS
                .iter()
                .zip(first.iter().zip(other))
                .find(|(_, (a, b))| a != b);
            if let Some((key, _)) = mismatch {
                return Err(OmeXmlError::InconsistentMetadata(format!(
                    "{} of image {} differs from image 0",
                    key.trim_start_matches('@'),
                    offset + 1
                )));
            }
        }
        pixel_size_from(first).map(PixelSizes::Uniform)
    }
}

fn pixel_size_from(record: &Record) -> Result<PixelSize, OmeXmlError> {
    Ok(PixelSize {
        x: optional_f64("PhysicalSizeX", record[0].as_ref())?,
        x_unit: optional_text(record[1].as_ref()),
        y: optional_f64("PhysicalSizeY", record[2].as_ref())?,
        y_unit: optional_text(record[3].as_ref()),
    })
}

/// Parse `ome_xml` and run [`OmeXml::pixel_size`]
pub fn parse_pixel_size(ome_xml: &str, assume_uniform: bool) -> Result<PixelSizes, OmeXmlError> {
    OmeXml::parse(ome_xml)?.pixel_size(assume_uniform)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(sizes: &[(&str, &str)]) -> String {
        let mut xml = String::from("<OME>");
        for (x, y) in sizes {
            xml.push_str(&format!(
                r#"<Image><Pixels PhysicalSizeX="{x}" PhysicalSizeXUnit="µm" PhysicalSizeY="{y}" PhysicalSizeYUnit="µm"/></Image>"#
            ));
        }
        xml.push_str("</OME>");
        xml
    }

    #[test]
    fn test_uniform_pixel_size() {
        let xml = document(&[("0.325", "0.325"), ("0.325", "0.325")]);
        let sizes = parse_pixel_size(&xml, true).unwrap();
        let size = sizes.uniform().unwrap();

        assert_eq!(size.x, Some(0.325));
        assert_eq!(size.x_unit.as_deref(), Some("µm"));
        assert_eq!(size.y, Some(0.325));
        assert_eq!(size.y_unit.as_deref(), Some("µm"));
    }

    #[test]
    fn test_inconsistent_pixel_size() {
        let xml = document(&[("0.325", "0.325"), ("0.65", "0.325")]);
        let err = parse_pixel_size(&xml, true).unwrap_err();
        assert_eq!(
            err,
            OmeXmlError::InconsistentMetadata(
                "PhysicalSizeX of image 1 differs from image 0".to_string()
            )
        );
    }

    #[test]
    fn test_sizes_compared_as_written() {
        let xml = document(&[("NaN", "0.325"), ("NaN", "0.325")]);
        let size = parse_pixel_size(&xml, true).unwrap();
        assert!(size.uniform().unwrap().x.unwrap().is_nan());

        let xml = document(&[("1.0", "0.325"), ("1", "0.325")]);
        let err = parse_pixel_size(&xml, true).unwrap_err();
        assert_eq!(
            err,
            OmeXmlError::InconsistentMetadata(
                "PhysicalSizeX of image 1 differs from image 0".to_string()
            )
        );
    }

    #[test]
    fn test_per_image_pixel_size() {
        let xml = document(&[("0.325", "0.325"), ("0.65", "0.65")]);
        let sizes = parse_pixel_size(&xml, false).unwrap();
        let sizes = sizes.per_image().unwrap();
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[1].x, Some(0.65));
    }

    #[test]
    fn test_missing_attributes_are_none() {
        let xml = r#"<OME><Image><Pixels PhysicalSizeX="1.0"/></Image></OME>"#;
        let size = parse_pixel_size(xml, true).unwrap();
        assert_eq!(
            size,
            PixelSizes::Uniform(PixelSize {
                x: Some(1.0),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_unparsable_size() {
        let xml = r#"<OME><Image><Pixels PhysicalSizeX="wide"/></Image></OME>"#;
        let err = parse_pixel_size(xml, true).unwrap_err();
        assert!(matches!(err, OmeXmlError::InvalidValue { .. }));
    }
}
