//! # Property Extractor
//!
//! Generic per-image / per-plane access to OME-XML fields. Every domain
//! extractor in this crate is built on the functions here.
//!
//! ```rust
//! use czimeta::properties::{parse_properties, Domain};
//!
//! let xml = r#"<OME><Image><Pixels SizeX="512" SizeY="256"/></Image></OME>"#;
//! let records = parse_properties(xml, &["@SizeX", "@SizeY", "@SizeZ"], Domain::Pixels)?
//!     .into_per_image()
//!     .unwrap();
//! assert_eq!(records[0][0].as_ref().and_then(|v| v.as_text()), Some("512"));
//! assert!(records[0][2].is_none());
//! # Ok::<(), czimeta::OmeXmlError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::omexml::{pixels_of, planes_of, Node, OmeXml, OmeXmlError, Value};

/// One record from a tolerant multi-key lookup, positional with the keys
pub type Record = Vec<Option<Value>>;

/// Schema level a property is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// `Image` element, one record per image
    Image,
    /// `Image/Pixels` element, one record per image
    Pixels,
    /// `Image/Pixels/Plane` elements, one record per plane grouped by image
    Plane,
}

impl Domain {
    /// Lowercase name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Image => "image",
            Domain::Pixels => "pixels",
            Domain::Plane => "plane",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = OmeXmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Domain::Image),
            "pixels" => Ok(Domain::Pixels),
            "plane" => Ok(Domain::Plane),
            _ => Err(OmeXmlError::InvalidDomain(s.to_string())),
        }
    }
}

/// Extracted values, shaped by the domain they came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Properties<T> {
    /// One entry per image (`image` and `pixels` domains)
    PerImage(Vec<T>),
    /// One entry per plane, grouped by image (`plane` domain)
    PerPlane(Vec<Vec<T>>),
}

impl<T> Properties<T> {
    /// Number of images the properties cover
    pub fn image_count(&self) -> usize {
        match self {
            Properties::PerImage(values) => values.len(),
            Properties::PerPlane(groups) => groups.len(),
        }
    }

    /// Per-image values, or `None` for plane-level properties
    pub fn into_per_image(self) -> Option<Vec<T>> {
        match self {
            Properties::PerImage(values) => Some(values),
            Properties::PerPlane(_) => None,
        }
    }

    /// Per-plane values, or `None` for image-level properties
    pub fn into_per_plane(self) -> Option<Vec<Vec<T>>> {
        match self {
            Properties::PerPlane(groups) => Some(groups),
            Properties::PerImage(_) => None,
        }
    }
}

impl OmeXml {
    /// Tolerant multi-key extraction; absent keys are `None`
    pub fn extract_properties(
        &self,
        keys: &[&str],
        domain: Domain,
    ) -> Result<Properties<Record>, OmeXmlError> {
        self.collect_properties(domain, |node| Ok(node.select_keys(keys)))
    }

    /// Strict single-key extraction; an absent key fails with `MissingField`
    pub fn extract_field(&self, key: &str, domain: Domain) -> Result<Properties<Value>, OmeXmlError> {
        self.collect_properties(domain, |node| node.select_key(key))
    }

    fn collect_properties<T, F>(&self, domain: Domain, select: F) -> Result<Properties<T>, OmeXmlError>
    where
        F: Fn(&Node) -> Result<T, OmeXmlError>,
    {
        match domain {
            Domain::Image => self.map_images(select).map(Properties::PerImage),
            Domain::Pixels => self.map_pixels(select).map(Properties::PerImage),
            Domain::Plane => self.map_planes(select).map(Properties::PerPlane),
        }
    }

    pub(crate) fn map_images<T, F>(&self, select: F) -> Result<Vec<T>, OmeXmlError>
    where
        F: Fn(&Node) -> Result<T, OmeXmlError>,
    {
        self.images()?.iter().map(select).collect()
    }

    pub(crate) fn map_pixels<T, F>(&self, select: F) -> Result<Vec<T>, OmeXmlError>
    where
        F: Fn(&Node) -> Result<T, OmeXmlError>,
    {
        self.images()?
            .iter()
            .map(|image| pixels_of(image).and_then(&select))
            .collect()
    }

    pub(crate) fn map_planes<T, F>(&self, select: F) -> Result<Vec<Vec<T>>, OmeXmlError>
    where
        F: Fn(&Node) -> Result<T, OmeXmlError>,
    {
        self.images()?
            .iter()
            .map(|image| -> Result<Vec<T>, OmeXmlError> {
                planes_of(image)?.iter().map(&select).collect()
            })
            .collect()
    }
}

/// Parse `ome_xml` and run [`OmeXml::extract_properties`]
pub fn parse_properties(
    ome_xml: &str,
    keys: &[&str],
    domain: Domain,
) -> Result<Properties<Record>, OmeXmlError> {
    OmeXml::parse(ome_xml)?.extract_properties(keys, domain)
}

/// Parse `ome_xml` and run [`OmeXml::extract_field`]
pub fn parse_field(ome_xml: &str, key: &str, domain: Domain) -> Result<Properties<Value>, OmeXmlError> {
    OmeXml::parse(ome_xml)?.extract_field(key, domain)
}

/// Text of an optional value parsed as `f64`; `None` stays `None`
pub(crate) fn optional_f64(field: &str, value: Option<&Value>) -> Result<Option<f64>, OmeXmlError> {
    match value.and_then(Value::as_text) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| OmeXmlError::invalid_value(field, raw)),
    }
}

/// Text of an optional value as an owned string
pub(crate) fn optional_text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_text).map(str::to_string)
}
