//! # Plane Table
//!
//! Joins every plane of every image with that image's acquisition time into
//! one flat table.
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | index | Int64 | Row label inside the image's partition |
//! | X, Y, Z | Float64 (nullable) | Stage position |
//! | T | Float64 (nullable) | Seconds since acquisition start (`DeltaT`) |
//! | C_index, T_index, Z_index | Int64 | `TheC`, `TheT`, `TheZ` |
//! | image | Int64 | Zero-based image index |
//! | plane | Int64 | Zero-based plane index within the image |
//! | image_acquisition_T | Timestamp(µs, tz) | `AcquisitionDate` of the image |
//! | absolute_T | Timestamp(µs, tz) (nullable) | `image_acquisition_T + T` |
//!
//! `absolute_T` is a derived convenience column. It assumes `DeltaT` is
//! measured from `AcquisitionDate`, which Bio-Formats does not guarantee.
//!
//! ```rust
//! use czimeta::planes::{parse_planes, utc};
//!
//! let xml = r#"<OME><Image>
//!   <AcquisitionDate>2021-04-12T02:12:21.340000</AcquisitionDate>
//!   <Pixels><Plane TheC="0" TheT="0" TheZ="0" DeltaT="1.027" PositionX="-1165.624"/></Pixels>
//! </Image></OME>"#;
//!
//! let table = parse_planes(xml, utc())?;
//! assert_eq!(table.len(), 1);
//! let row = &table.rows()[0];
//! assert_eq!((row.image, row.plane), (0, 0));
//! assert_eq!(row.absolute_t.unwrap().to_rfc3339(), "2021-04-12T02:12:22.367+00:00");
//! # Ok::<(), czimeta::OmeXmlError>(())
//! ```

pub mod columns;
mod export;
mod table;
mod timestamps;

#[cfg(test)]
mod tests;

use chrono::{DateTime, FixedOffset};

use crate::omexml::{OmeXml, OmeXmlError, Value};
use crate::properties::{optional_f64, Record};

pub use export::{ExportFormat, PlaneTableError, KEY_TIMEZONE};
pub use table::{plane_table_schema, PlaneRecord, PlaneTable};
pub use timestamps::{parse_acquisition_date, timezone_from_hours, utc};

use timestamps::offset_by_seconds;

impl OmeXml {
    /// Build the plane table with timestamps expressed in `timezone`
    pub fn plane_table(&self, timezone: FixedOffset) -> Result<PlaneTable, OmeXmlError> {
        let positions = self.map_planes(|plane| Ok(plane.select_keys(&columns::PLANE_KEYS)))?;
        let acquisition_dates = self.map_images(|image| {
            let value = image.select_key("AcquisitionDate")?;
            let raw = value
                .as_text()
                .ok_or_else(|| OmeXmlError::missing("Image/AcquisitionDate"))?;
            parse_acquisition_date(raw, &timezone)
        })?;

        if positions.len() != acquisition_dates.len() {
            return Err(OmeXmlError::StructuralMismatch {
                planes: positions.len(),
                dates: acquisition_dates.len(),
            });
        }

        let partitions = positions
            .iter()
            .zip(acquisition_dates.iter())
            .enumerate()
            .map(|(image, (records, acquired))| build_partition(image, records, acquired))
            .collect::<Result<Vec<_>, _>>()?;

        let table = PlaneTable::concat(timezone, partitions);
        log::debug!(
            "Built plane table with {} rows from {} images",
            table.len(),
            positions.len()
        );
        Ok(table)
    }
}

/// Parse `ome_xml` and run [`OmeXml::plane_table`]
pub fn parse_planes(ome_xml: &str, timezone: FixedOffset) -> Result<PlaneTable, OmeXmlError> {
    OmeXml::parse(ome_xml)?.plane_table(timezone)
}

fn build_partition(
    image: usize,
    records: &[Record],
    acquired: &DateTime<FixedOffset>,
) -> Result<Vec<PlaneRecord>, OmeXmlError> {
    records
        .iter()
        .enumerate()
        .map(|(plane, record)| {
            let t = optional_f64("DeltaT", record[3].as_ref())?;
            Ok(PlaneRecord {
                index: plane,
                x: optional_f64("PositionX", record[0].as_ref())?,
                y: optional_f64("PositionY", record[1].as_ref())?,
                z: optional_f64("PositionZ", record[2].as_ref())?,
                t,
                c_index: plane_index("TheC", record[4].as_ref())?,
                t_index: plane_index("TheT", record[5].as_ref())?,
                z_index: plane_index("TheZ", record[6].as_ref())?,
                image,
                plane,
                image_acquisition_t: *acquired,
                absolute_t: t.and_then(|seconds| offset_by_seconds(acquired, seconds)),
            })
        })
        .collect()
}

/// A required plane index, read as a float and truncated toward zero;
/// values outside the `i64` range are invalid
fn plane_index(field: &str, value: Option<&Value>) -> Result<i64, OmeXmlError> {
    let number = optional_f64(field, value)?
        .ok_or_else(|| OmeXmlError::missing(format!("Plane/@{}", field)))?;
    let truncated = number.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if !(truncated >= i64::MIN as f64 && truncated < i64::MAX as f64) {
        return Err(OmeXmlError::invalid_value(field, number.to_string()));
    }
    Ok(truncated as i64)
}
