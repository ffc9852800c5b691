//! Camera settings stored as JSON arrays under
//! `HardwareSetting|ParameterCollection|…`

use std::ops::Range;

use serde::Serialize;

use super::{parse_structured_annotation_dict, StructuredAnnotations};
use crate::omexml::OmeXmlError;

const PARAMETER_COLLECTION: &str = "HardwareSetting|ParameterCollection|";

/// Camera binning `[x, y]`
pub const BINNING_KEY: &str = "HardwareSetting|ParameterCollection|Binning";
/// Camera ROI `[x0, y0, width, height, …]`, the default ROI key
pub const IMAGE_FRAME_KEY: &str = "HardwareSetting|ParameterCollection|ImageFrame";
/// Alternative camera ROI key written by some acquisition setups
pub const FRAME_KEY: &str = "HardwareSetting|ParameterCollection|Frame";
/// First camera look-up-table value
pub const CAMERA_LUT1_KEY: &str = "HardwareSetting|ParameterCollection|CameraLUT1";
/// Second camera look-up-table value
pub const CAMERA_LUT2_KEY: &str = "HardwareSetting|ParameterCollection|CameraLUT2";
/// Significant bits per pixel of the camera
pub const VALID_BITS_KEY: &str = "HardwareSetting|ParameterCollection|ValidBits";

/// Camera binning factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Binning {
    /// Horizontal binning
    pub x: u32,
    /// Vertical binning
    pub y: u32,
}

/// Camera region of interest in sensor pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraRoi {
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub y0: f64,
    /// Width
    pub x1: f64,
    /// Height
    pub y1: f64,
}

/// Half-open sensor pixel ranges covered by a [`CameraRoi`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoiRanges {
    /// `x0..x0 + x1`
    pub x: Range<i64>,
    /// `y0..y0 + y1`
    pub y: Range<i64>,
}

impl CameraRoi {
    /// The ROI as integer ranges, truncating each value toward zero.
    ///
    /// Values and sums beyond the `i64` range saturate at its limits. A
    /// negative width or height gives a range whose end precedes its start,
    /// which is empty.
    pub fn as_ranges(&self) -> RoiRanges {
        let (x0, y0) = (self.x0.trunc() as i64, self.y0.trunc() as i64);
        let (x1, y1) = (self.x1.trunc() as i64, self.y1.trunc() as i64);
        RoiRanges {
            x: x0..x0.saturating_add(x1),
            y: y0..y0.saturating_add(y1),
        }
    }
}

/// Camera look-up-table pair; both `None` when the document lacks either key
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraLut {
    /// `CameraLUT1`
    pub lut1: Option<f64>,
    /// `CameraLUT2`
    pub lut2: Option<f64>,
}

impl CameraLut {
    /// Value reported when the LUT keys are absent
    pub const UNAVAILABLE: CameraLut = CameraLut {
        lut1: None,
        lut2: None,
    };

    /// Whether both values are present
    pub fn is_available(&self) -> bool {
        self.lut1.is_some() && self.lut2.is_some()
    }
}

impl StructuredAnnotations {
    /// Decode the value of `key` as a JSON array of numbers
    pub fn decode_array(&self, key: &str) -> Result<Vec<f64>, OmeXmlError> {
        let raw = self.require(key)?;
        let elements: Vec<serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| OmeXmlError::malformed_annotation(key, e.to_string()))?;

        elements
            .iter()
            .map(|element| {
                element.as_f64().ok_or_else(|| {
                    OmeXmlError::malformed_annotation(key, format!("non-numeric element {}", element))
                })
            })
            .collect()
    }

    /// Camera binning from [`BINNING_KEY`]
    pub fn binning(&self) -> Result<Binning, OmeXmlError> {
        let values = self.decode_exact(BINNING_KEY, 2)?;
        Ok(Binning {
            x: to_u32(BINNING_KEY, values[0])?,
            y: to_u32(BINNING_KEY, values[1])?,
        })
    }

    /// Camera ROI from `key` (usually [`IMAGE_FRAME_KEY`] or [`FRAME_KEY`]);
    /// elements past the fourth are ignored
    pub fn camera_roi(&self, key: &str) -> Result<CameraRoi, OmeXmlError> {
        let values = self.decode_array(key)?;
        match values[..] {
            [x0, y0, x1, y1, ..] => Ok(CameraRoi { x0, y0, x1, y1 }),
            _ => Err(OmeXmlError::malformed_annotation(
                key,
                format!("expected at least 4 elements, found {}", values.len()),
            )),
        }
    }

    /// Camera LUT; missing keys give [`CameraLut::UNAVAILABLE`]
    pub fn camera_lut(&self) -> Result<CameraLut, OmeXmlError> {
        if !self.contains_key(CAMERA_LUT1_KEY) || !self.contains_key(CAMERA_LUT2_KEY) {
            log::warn!("Camera LUT not found in structured annotations");
            return Ok(CameraLut::UNAVAILABLE);
        }
        Ok(CameraLut {
            lut1: Some(self.decode_exact(CAMERA_LUT1_KEY, 1)?[0]),
            lut2: Some(self.decode_exact(CAMERA_LUT2_KEY, 1)?[0]),
        })
    }

    /// Camera bit depth from [`VALID_BITS_KEY`]
    pub fn camera_bits(&self) -> Result<u32, OmeXmlError> {
        let values = self.decode_exact(VALID_BITS_KEY, 1)?;
        to_u32(VALID_BITS_KEY, values[0])
    }

    /// All hardware-setting entries
    pub fn hardware_settings(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.with_prefix(PARAMETER_COLLECTION)
    }

    fn decode_exact(&self, key: &str, len: usize) -> Result<Vec<f64>, OmeXmlError> {
        let values = self.decode_array(key)?;
        if values.len() != len {
            return Err(OmeXmlError::malformed_annotation(
                key,
                format!("expected {} element(s), found {}", len, values.len()),
            ));
        }
        Ok(values)
    }
}

fn to_u32(key: &str, value: f64) -> Result<u32, OmeXmlError> {
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(OmeXmlError::malformed_annotation(
            key,
            format!("{} is not an unsigned integer", value),
        ));
    }
    Ok(value as u32)
}

/// Parse `ome_xml` and read the camera binning
pub fn parse_binning(ome_xml: &str) -> Result<Binning, OmeXmlError> {
    parse_structured_annotation_dict(ome_xml)?.binning()
}

/// Parse `ome_xml` and read the camera ROI under [`IMAGE_FRAME_KEY`]
pub fn parse_camera_roi(ome_xml: &str) -> Result<CameraRoi, OmeXmlError> {
    parse_camera_roi_with_key(ome_xml, IMAGE_FRAME_KEY)
}

/// Parse `ome_xml` and read the camera ROI under `key`
pub fn parse_camera_roi_with_key(ome_xml: &str, key: &str) -> Result<CameraRoi, OmeXmlError> {
    parse_structured_annotation_dict(ome_xml)?.camera_roi(key)
}

/// Parse `ome_xml` and read the camera ROI as pixel ranges
pub fn parse_camera_roi_ranges(ome_xml: &str) -> Result<RoiRanges, OmeXmlError> {
    Ok(parse_camera_roi(ome_xml)?.as_ranges())
}

/// Parse `ome_xml` and read the camera LUT
pub fn parse_camera_lut(ome_xml: &str) -> Result<CameraLut, OmeXmlError> {
    parse_structured_annotation_dict(ome_xml)?.camera_lut()
}

/// Parse `ome_xml` and read the camera bit depth
pub fn parse_camera_bits(ome_xml: &str) -> Result<u32, OmeXmlError> {
    parse_structured_annotation_dict(ome_xml)?.camera_bits()
}
