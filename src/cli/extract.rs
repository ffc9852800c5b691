use anyhow::{Context, Result};
use log::warn;
use serde::Serialize;
use std::path::Path;

use czimeta::annotations::{Binning, CameraLut, CameraRoi, RoiRanges, IMAGE_FRAME_KEY};
use czimeta::source::ReaderOptions;
use czimeta::OmeXmlError;

/// Print channels, shared or per image
pub fn run_channels(input: &Path, per_image: bool, options: &ReaderOptions) -> Result<()> {
    let document = super::load_document(input, options)?;
    let channels = document
        .channels(!per_image)
        .context("Failed to read channels")?;
    super::print_json(&channels)
}

/// Print pixel size, shared or per image
pub fn run_pixel_size(input: &Path, per_image: bool, options: &ReaderOptions) -> Result<()> {
    let document = super::load_document(input, options)?;
    let pixel_size = document
        .pixel_size(!per_image)
        .context("Failed to read pixel size")?;
    super::print_json(&pixel_size)
}

/// Print the structured annotation dictionary
pub fn run_annotations(input: &Path, options: &ReaderOptions) -> Result<()> {
    let document = super::load_document(input, options)?;
    let annotations = document
        .structured_annotation_dict()
        .context("Failed to read structured annotations")?;
    super::print_json(&annotations)
}

/// Camera settings; a setting that cannot be read is reported as null
#[derive(Debug, Serialize)]
struct HardwareReport {
    binning: Option<Binning>,
    roi_key: String,
    camera_roi: Option<CameraRoi>,
    camera_roi_ranges: Option<RoiRanges>,
    camera_lut: Option<CameraLut>,
    camera_bits: Option<u32>,
}

/// Print binning, ROI, LUT and bit depth
pub fn run_hardware(input: &Path, roi_key: Option<String>, options: &ReaderOptions) -> Result<()> {
    let document = super::load_document(input, options)?;
    let annotations = document
        .structured_annotation_dict()
        .context("Failed to read structured annotations")?;
    let roi_key = roi_key.unwrap_or_else(|| IMAGE_FRAME_KEY.to_string());

    let camera_roi = report("camera ROI", annotations.camera_roi(&roi_key));
    let hardware = HardwareReport {
        binning: report("binning", annotations.binning()),
        camera_roi_ranges: camera_roi.as_ref().map(CameraRoi::as_ranges),
        camera_roi,
        roi_key,
        camera_lut: report("camera LUT", annotations.camera_lut()),
        camera_bits: report("camera bits", annotations.camera_bits()),
    };
    super::print_json(&hardware)
}

fn report<T>(what: &str, result: Result<T, OmeXmlError>) -> Option<T> {
    result
        .map_err(|e| warn!("Could not read {}: {}", what, e))
        .ok()
}
