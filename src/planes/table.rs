use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, Int64Builder, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::columns;

/// One row of the plane table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneRecord {
    /// Row label inside the image's partition before renumbering
    pub index: usize,
    /// Stage position X
    #[serde(rename = "X")]
    pub x: Option<f64>,
    /// Stage position Y
    #[serde(rename = "Y")]
    pub y: Option<f64>,
    /// Stage position Z
    #[serde(rename = "Z")]
    pub z: Option<f64>,
    /// Seconds since the image acquisition started
    #[serde(rename = "T")]
    pub t: Option<f64>,
    /// Channel index
    #[serde(rename = "C_index")]
    pub c_index: i64,
    /// Time point index
    #[serde(rename = "T_index")]
    pub t_index: i64,
    /// Z slice index
    #[serde(rename = "Z_index")]
    pub z_index: i64,
    /// Image (tile/series) index
    pub image: usize,
    /// Plane index within the image
    pub plane: usize,
    /// Acquisition timestamp of the image
    #[serde(rename = "image_acquisition_T")]
    pub image_acquisition_t: DateTime<FixedOffset>,
    /// Acquisition timestamp plus `T`; best effort, not a verified clock
    #[serde(rename = "absolute_T")]
    pub absolute_t: Option<DateTime<FixedOffset>>,
}

/// Planes of every image joined with their acquisition time.
///
/// Rows are ordered by image, then by plane within the image; a row's
/// position in [`PlaneTable::rows`] is its renumbered index.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneTable {
    timezone: FixedOffset,
    rows: Vec<PlaneRecord>,
}

impl PlaneTable {
    /// Concatenate per-image partitions, keeping their order
    pub(crate) fn concat(timezone: FixedOffset, partitions: Vec<Vec<PlaneRecord>>) -> Self {
        let total = partitions.iter().map(Vec::len).sum();
        let mut rows = Vec::with_capacity(total);
        for partition in partitions {
            rows.extend(partition);
        }
        Self { timezone, rows }
    }

    /// Number of rows (planes over all images)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in order
    pub fn rows(&self) -> &[PlaneRecord] {
        &self.rows
    }

    /// Iterate over rows
    pub fn iter(&self) -> std::slice::Iter<'_, PlaneRecord> {
        self.rows.iter()
    }

    /// Timezone the timestamp columns are expressed in
    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    /// Number of distinct images in the table
    pub fn image_count(&self) -> usize {
        self.rows.last().map(|row| row.image + 1).unwrap_or(0)
    }

    /// Values of an integer column (`index`, `C_index`, `T_index`,
    /// `Z_index`, `image`, `plane`); `None` for any other name
    pub fn integer_column(&self, name: &str) -> Option<Vec<i64>> {
        let get: fn(&PlaneRecord) -> i64 = match name {
            columns::INDEX => |r| r.index as i64,
            columns::C_INDEX => |r| r.c_index,
            columns::T_INDEX => |r| r.t_index,
            columns::Z_INDEX => |r| r.z_index,
            columns::IMAGE => |r| r.image as i64,
            columns::PLANE => |r| r.plane as i64,
            _ => return None,
        };
        Some(self.rows.iter().map(get).collect())
    }

    /// Values of a float column (`X`, `Y`, `Z`, `T`); `None` for any other name
    pub fn float_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let get: fn(&PlaneRecord) -> Option<f64> = match name {
            columns::X => |r| r.x,
            columns::Y => |r| r.y,
            columns::Z => |r| r.z,
            columns::T => |r| r.t,
            _ => return None,
        };
        Some(self.rows.iter().map(get).collect())
    }

    /// Arrow schema of [`PlaneTable::to_record_batch`]
    pub fn schema(&self) -> Schema {
        plane_table_schema(&self.timezone)
    }

    /// Convert to an Arrow record batch
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let n = self.rows.len();
        let mut index = Int64Builder::with_capacity(n);
        let mut x = Float64Builder::with_capacity(n);
        let mut y = Float64Builder::with_capacity(n);
        let mut z = Float64Builder::with_capacity(n);
        let mut t = Float64Builder::with_capacity(n);
        let mut c_index = Int64Builder::with_capacity(n);
        let mut t_index = Int64Builder::with_capacity(n);
        let mut z_index = Int64Builder::with_capacity(n);
        let mut image = Int64Builder::with_capacity(n);
        let mut plane = Int64Builder::with_capacity(n);
        let mut acquisition = Vec::with_capacity(n);
        let mut absolute = Vec::with_capacity(n);

        for row in &self.rows {
            index.append_value(row.index as i64);
            x.append_option(row.x);
            y.append_option(row.y);
            z.append_option(row.z);
            t.append_option(row.t);
            c_index.append_value(row.c_index);
            t_index.append_value(row.t_index);
            z_index.append_value(row.z_index);
            image.append_value(row.image as i64);
            plane.append_value(row.plane as i64);
            acquisition.push(row.image_acquisition_t.timestamp_micros());
            absolute.push(row.absolute_t.map(|ts| ts.timestamp_micros()));
        }

        let tz = self.timezone.to_string();
        let arrays: Vec<ArrayRef> = vec![
            Arc::new(index.finish()),
            Arc::new(x.finish()),
            Arc::new(y.finish()),
            Arc::new(z.finish()),
            Arc::new(t.finish()),
            Arc::new(c_index.finish()),
            Arc::new(t_index.finish()),
            Arc::new(z_index.finish()),
            Arc::new(image.finish()),
            Arc::new(plane.finish()),
            Arc::new(TimestampMicrosecondArray::from(acquisition).with_timezone(tz.clone())),
            Arc::new(TimestampMicrosecondArray::from(absolute).with_timezone(tz)),
        ];

        RecordBatch::try_new(Arc::new(self.schema()), arrays)
    }
}

impl<'a> IntoIterator for &'a PlaneTable {
    type Item = &'a PlaneRecord;
    type IntoIter = std::slice::Iter<'a, PlaneRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Arrow schema of the plane table with timestamps in `timezone`
pub fn plane_table_schema(timezone: &FixedOffset) -> Schema {
    let timestamp = DataType::Timestamp(TimeUnit::Microsecond, Some(timezone.to_string().into()));
    Schema::new(vec![
        Field::new(columns::INDEX, DataType::Int64, false),
        Field::new(columns::X, DataType::Float64, true),
        Field::new(columns::Y, DataType::Float64, true),
        Field::new(columns::Z, DataType::Float64, true),
        Field::new(columns::T, DataType::Float64, true),
        Field::new(columns::C_INDEX, DataType::Int64, false),
        Field::new(columns::T_INDEX, DataType::Int64, false),
        Field::new(columns::Z_INDEX, DataType::Int64, false),
        Field::new(columns::IMAGE, DataType::Int64, false),
        Field::new(columns::PLANE, DataType::Int64, false),
        Field::new(columns::IMAGE_ACQUISITION_T, timestamp.clone(), false),
        Field::new(columns::ABSOLUTE_T, timestamp, true),
    ])
}
