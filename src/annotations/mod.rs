//! # Structured Annotations
//!
//! Bio-Formats copies the CZI "original metadata" into
//! `StructuredAnnotations/XMLAnnotation` entries:
//!
//! ```text
//! <XMLAnnotation ID="Annotation:12" Namespace="openmicroscopy.org/OriginalMetadata">
//!   <Value>
//!     <OriginalMetadata>
//!       <Key>HardwareSetting|ParameterCollection|Binning</Key>
//!       <Value>[2,2]</Value>
//!     </OriginalMetadata>
//!   </Value>
//! </XMLAnnotation>
//! ```
//!
//! [`StructuredAnnotations`] collects them into a key/value map. The camera
//! settings under `HardwareSetting|ParameterCollection|…` are JSON arrays and
//! are decoded on demand by the accessors in [`hardware`].

pub mod hardware;


use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::omexml::{Node, OmeXml, OmeXmlError};

pub use hardware::{
    parse_binning, parse_camera_bits, parse_camera_lut, parse_camera_roi,
    parse_camera_roi_ranges, parse_camera_roi_with_key, Binning, CameraLut, CameraRoi, RoiRanges,
    BINNING_KEY, CAMERA_LUT1_KEY, CAMERA_LUT2_KEY, FRAME_KEY, IMAGE_FRAME_KEY, VALID_BITS_KEY,
};

/// `OriginalMetadata` key/value pairs of a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StructuredAnnotations {
    entries: BTreeMap<String, String>,
}

impl StructuredAnnotations {
    /// Raw value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Raw value for `key`, or `MissingField`
    pub fn require(&self, key: &str) -> Result<&str, OmeXmlError> {
        self.get(key).ok_or_else(|| OmeXmlError::missing(key))
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, raw value)` in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }

    /// Entries whose key starts with `prefix`
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.entries
            .range(prefix.to_string()..)
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.entries
    }
}

impl FromIterator<(String, String)> for StructuredAnnotations {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StructuredAnnotations {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl OmeXml {
    /// Collect the `OriginalMetadata` key/value pairs.
    ///
    /// Fails with `MissingField` if the section, an `XMLAnnotation` wrapper,
    /// or a `Key`/`Value` is absent. A later duplicate key wins.
    pub fn structured_annotation_dict(&self) -> Result<StructuredAnnotations, OmeXmlError> {
        let annotations = self
            .structured_annotations()?
            .require_child("XMLAnnotation", "StructuredAnnotations/XMLAnnotation")?
            .as_slice();

        let mut entries = BTreeMap::new();
        for annotation in annotations {
            let (key, value) = original_metadata(annotation)?;
            entries.insert(key, value);
        }
        log::debug!(
            "Read {} structured annotations ({} unique keys)",
            annotations.len(),
            entries.len()
        );
        Ok(StructuredAnnotations { entries })
    }
}

/// Parse `ome_xml` and run [`OmeXml::structured_annotation_dict`]
pub fn parse_structured_annotation_dict(ome_xml: &str) -> Result<StructuredAnnotations, OmeXmlError> {
    OmeXml::parse(ome_xml)?.structured_annotation_dict()
}

fn original_metadata(annotation: &Node) -> Result<(String, String), OmeXmlError> {
    let metadata = annotation
        .first_child("Value")
        .ok_or_else(|| OmeXmlError::missing("XMLAnnotation/Value"))?
        .first_child("OriginalMetadata")
        .ok_or_else(|| OmeXmlError::missing("XMLAnnotation/Value/OriginalMetadata"))?;

    let key = metadata
        .first_child("Key")
        .ok_or_else(|| OmeXmlError::missing("OriginalMetadata/Key"))?;
    let value = metadata
        .first_child("Value")
        .ok_or_else(|| OmeXmlError::missing("OriginalMetadata/Value"))?;

    Ok((
        key.text().unwrap_or_default().to_string(),
        value.text().unwrap_or_default().to_string(),
    ))
}
