//! # czimeta - OME-XML Metadata for Tiled Zeiss CZI Acquisitions
//!
//! `czimeta` reads the OME-XML document that Bio-Formats produces for a Zeiss
//! CZI file opened in tiled mode (one image per tile, no stitching) and turns
//! the parts microscopists actually need into typed values:
//!
//! - **Channels** and **pixel size**, checked to be identical across tiles
//! - **Plane table**: one row per plane with stage position, time offset,
//!   plane indices, tile index and timezone-aware acquisition timestamps
//! - **Camera settings** from the original-metadata annotations: binning,
//!   ROI, LUT and bit depth
//!
//! ## Quick Start
//!
//! ```rust
//! use czimeta::prelude::*;
//!
//! let xml = r#"<OME>
//!   <Image ID="Image:0">
//!     <AcquisitionDate>2021-04-12T02:12:21.340000</AcquisitionDate>
//!     <Pixels PhysicalSizeX="0.65" PhysicalSizeXUnit="µm" PhysicalSizeY="0.65" PhysicalSizeYUnit="µm">
//!       <Channel ID="Channel:0:0" Name="DAPI"/>
//!       <Plane TheC="0" TheT="0" TheZ="0" DeltaT="1.027" PositionX="-1165.624" PositionY="122.694"/>
//!     </Pixels>
//!   </Image>
//! </OME>"#;
//!
//! let document = OmeXml::parse(xml)?;
//!
//! let channels = document.channels(true)?;
//! assert_eq!(channels.uniform().unwrap()[0].name(), Some("DAPI"));
//!
//! let pixel_size = document.pixel_size(true)?;
//! assert_eq!(pixel_size.uniform().unwrap().x, Some(0.65));
//!
//! let planes = document.plane_table(timezone_from_hours(9)?)?;
//! assert_eq!(planes.len(), 1);
//! # Ok::<(), czimeta::OmeXmlError>(())
//! ```
//!
//! Every operation also exists as a free function taking the XML string
//! (`parse_channels`, `parse_planes`, `parse_binning`, ...), which parses the
//! document once per call.
//!
//! ## Architecture
//!
//! - [`omexml`]: node tree, strict and tolerant key lookup
//! - [`properties`]: keyed extraction at image, pixels or plane level
//! - [`channels`], [`pixel_size`]: per-image settings with a uniformity check
//! - [`planes`]: the plane table, Arrow conversion, CSV/Parquet export
//! - [`annotations`]: structured annotations and camera settings
//! - [`summary`]: series count and first-image dimensions
//! - [`source`]: where the OME-XML text comes from

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod annotations;
pub mod channels;
pub mod omexml;
pub mod pixel_size;
pub mod planes;
pub mod properties;
pub mod source;
pub mod summary;

pub use annotations::{
    parse_binning, parse_camera_bits, parse_camera_lut, parse_camera_roi, parse_camera_roi_ranges,
    parse_camera_roi_with_key, parse_structured_annotation_dict,
};
pub use channels::parse_channels;
pub use omexml::{OmeXml, OmeXmlError};
pub use pixel_size::parse_pixel_size;
pub use planes::parse_planes;
pub use properties::{parse_field, parse_properties};
pub use summary::summarize_image_size;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::annotations::{
        Binning, CameraLut, CameraRoi, RoiRanges, StructuredAnnotations, BINNING_KEY,
        CAMERA_LUT1_KEY, CAMERA_LUT2_KEY, FRAME_KEY, IMAGE_FRAME_KEY, VALID_BITS_KEY,
    };
    pub use crate::channels::{Channel, ChannelList};
    pub use crate::omexml::{Element, Node, OmeXml, OmeXmlError, Value};
    pub use crate::pixel_size::{PixelSize, PixelSizes};
    pub use crate::planes::{
        columns, timezone_from_hours, utc, ExportFormat, PlaneRecord, PlaneTable, PlaneTableError,
    };
    pub use crate::properties::{Domain, Properties, Record};
    pub use crate::source::{ExportedXmlSource, OmeXmlSource, ReaderOptions, SourceError};
    pub use crate::summary::ImageSizeSummary;
}
