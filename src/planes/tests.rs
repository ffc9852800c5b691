use super::*;
use arrow::array::{Array, Float64Array, Int64Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, TimeUnit};

/// Tiled acquisition: `images` tiles, each with `channels` x `times` planes
fn tiled_document(images: usize, channels: usize, times: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<OME xmlns="http://www.openmicroscopy.org/Schemas/OME/2016-06">"#,
    );
    for i in 0..images {
        xml.push_str(&format!(
            r#"<Image ID="Image:{i}"><AcquisitionDate>2021-04-12T02:12:{:02}.340000</AcquisitionDate>
<Pixels ID="Pixels:{i}" SizeC="{channels}" SizeT="{times}" SizeZ="1">"#,
            21 + i
        ));
        for c in 0..channels {
            xml.push_str(&format!(r#"<Channel ID="Channel:{i}:{c}" Name="C{c}"/>"#));
        }
        for t in 0..times {
            for c in 0..channels {
                xml.push_str(&format!(
                    r#"<Plane TheC="{c}" TheT="{t}" TheZ="0" DeltaT="{}" PositionX="{}" PositionY="122.694" PositionZ="0.001"/>"#,
                    1.027 + t as f64,
                    -1165.624 + 100.0 * i as f64
                ));
            }
        }
        xml.push_str("</Pixels></Image>");
    }
    xml.push_str("</OME>");
    xml
}

#[test]
fn test_row_count_is_total_plane_count() {
    let xml = tiled_document(4, 2, 3);
    let table = parse_planes(&xml, utc()).unwrap();
    assert_eq!(table.len(), 4 * 2 * 3);
    assert_eq!(table.image_count(), 4);
}

#[test]
fn test_image_and_plane_columns() {
    let xml = tiled_document(3, 2, 2);
    let table = parse_planes(&xml, utc()).unwrap();

    let images = table.integer_column(columns::IMAGE).unwrap();
    assert_eq!(images, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);

    let planes = table.integer_column(columns::PLANE).unwrap();
    assert_eq!(planes, vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]);

    // Pre-reset labels restart in every partition
    assert_eq!(table.integer_column(columns::INDEX).unwrap(), planes);
}

#[test]
fn test_channel_indices() {
    let xml = tiled_document(2, 3, 2);
    let table = parse_planes(&xml, utc()).unwrap();

    for image in 0..2 {
        let mut channels: Vec<i64> = table
            .iter()
            .filter(|row| row.image == image)
            .map(|row| row.c_index)
            .collect();
        channels.sort_unstable();
        channels.dedup();
        assert_eq!(channels, vec![0, 1, 2]);
    }
    let t_indices = table.integer_column(columns::T_INDEX).unwrap();
    assert_eq!(&t_indices[..6], &[0, 0, 0, 1, 1, 1]);
}

#[test]
fn test_single_plane_example() {
    let xml = r#"<OME><Image>
      <AcquisitionDate>2021-04-12T02:12:21.340000</AcquisitionDate>
      <Pixels><Plane TheC="0" TheT="0" TheZ="0" DeltaT="1.027" PositionX="-1165.624" PositionY="122.694" PositionZ="0.001"/></Pixels>
    </Image></OME>"#;
    let table = parse_planes(xml, utc()).unwrap();

    assert_eq!(table.len(), 1);
    let row = &table.rows()[0];
    assert_eq!(row.index, 0);
    assert_eq!(row.image, 0);
    assert_eq!(row.plane, 0);
    assert_eq!(row.x, Some(-1165.624));
    assert_eq!(row.y, Some(122.694));
    assert_eq!(row.z, Some(0.001));
    assert_eq!(row.t, Some(1.027));
    assert_eq!((row.c_index, row.t_index, row.z_index), (0, 0, 0));
    assert_eq!(
        row.image_acquisition_t.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string(),
        "2021-04-12T02:12:21.340000+00:00"
    );
    assert_eq!(
        row.absolute_t.unwrap().format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string(),
        "2021-04-12T02:12:22.367000+00:00"
    );
}

#[test]
fn test_timezone_changes_wall_clock_not_instant() {
    let xml = tiled_document(1, 1, 1);
    let utc_table = parse_planes(&xml, utc()).unwrap();
    let tokyo_table = parse_planes(&xml, timezone_from_hours(9).unwrap()).unwrap();

    let a = &utc_table.rows()[0];
    let b = &tokyo_table.rows()[0];
    assert_eq!(a.image_acquisition_t, b.image_acquisition_t);
    assert_eq!(b.image_acquisition_t.offset().local_minus_utc(), 9 * 3600);
    assert_eq!(
        b.image_acquisition_t.format("%H:%M").to_string(),
        "11:12"
    );
    assert_eq!(tokyo_table.timezone().to_string(), "+09:00");
}

#[test]
fn test_missing_optional_positions_are_null() {
    let xml = r#"<OME><Image>
      <AcquisitionDate>2021-04-12T02:12:21</AcquisitionDate>
      <Pixels><Plane TheC="0" TheT="0" TheZ="0"/></Pixels>
    </Image></OME>"#;
    let table = parse_planes(xml, utc()).unwrap();
    let row = &table.rows()[0];

    assert_eq!((row.x, row.y, row.z, row.t), (None, None, None, None));
    assert!(row.absolute_t.is_none());
}

#[test]
fn test_missing_plane_index() {
    let xml = r#"<OME><Image>
      <AcquisitionDate>2021-04-12T02:12:21</AcquisitionDate>
      <Pixels><Plane TheC="0" TheZ="0"/></Pixels>
    </Image></OME>"#;
    let err = parse_planes(xml, utc()).unwrap_err();
    assert_eq!(err, OmeXmlError::MissingField("Plane/@TheT".to_string()));
}

#[test]
fn test_out_of_range_plane_index() {
    for raw in ["1e300", "-1e19", "inf", "NaN"] {
        let xml = format!(
            r#"<OME><Image>
      <AcquisitionDate>2021-04-12T02:12:21</AcquisitionDate>
      <Pixels><Plane TheC="{raw}" TheT="0" TheZ="0"/></Pixels>
    </Image></OME>"#
        );
        let err = parse_planes(&xml, utc()).unwrap_err();
        assert!(
            matches!(err, OmeXmlError::InvalidValue { ref field, .. } if field == "TheC"),
            "{raw}: {err:?}"
        );
    }
}

#[test]
fn test_large_plane_index_in_range() {
    let xml = r#"<OME><Image>
      <AcquisitionDate>2021-04-12T02:12:21</AcquisitionDate>
      <Pixels><Plane TheC="0" TheT="4096.9" TheZ="-2.5"/></Pixels>
    </Image></OME>"#;
    let table = parse_planes(xml, utc()).unwrap();
    let row = table.iter().next().unwrap();
    assert_eq!((row.t_index, row.z_index), (4096, -2));
}

#[test]
fn test_non_numeric_position() {
    let xml = r#"<OME><Image>
      <AcquisitionDate>2021-04-12T02:12:21</AcquisitionDate>
      <Pixels><Plane TheC="0" TheT="0" TheZ="0" PositionX="left"/></Pixels>
    </Image></OME>"#;
    let err = parse_planes(xml, utc()).unwrap_err();
    assert!(matches!(err, OmeXmlError::InvalidValue { ref field, .. } if field == "PositionX"));
}

#[test]
fn test_missing_acquisition_date() {
    let xml = r#"<OME><Image><Pixels><Plane TheC="0" TheT="0" TheZ="0"/></Pixels></Image></OME>"#;
    let err = parse_planes(xml, utc()).unwrap_err();
    assert_eq!(err, OmeXmlError::MissingField("AcquisitionDate".to_string()));
}

#[test]
fn test_image_without_planes_contributes_no_rows() {
    let xml = r#"<OME>
      <Image><AcquisitionDate>2021-04-12T02:12:21</AcquisitionDate><Pixels/></Image>
      <Image><AcquisitionDate>2021-04-12T02:12:22</AcquisitionDate>
        <Pixels><Plane TheC="0" TheT="0" TheZ="0"/></Pixels></Image>
    </OME>"#;
    let table = parse_planes(xml, utc()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].image, 1);
}

#[test]
fn test_idempotent() {
    let xml = tiled_document(2, 2, 2);
    assert_eq!(
        parse_planes(&xml, utc()).unwrap(),
        parse_planes(&xml, utc()).unwrap()
    );
}

#[test]
fn test_record_batch() {
    let xml = tiled_document(2, 1, 2);
    let table = parse_planes(&xml, timezone_from_hours(2).unwrap()).unwrap();
    let batch = table.to_record_batch().unwrap();

    assert_eq!(batch.num_rows(), 4);
    assert_eq!(batch.num_columns(), columns::ALL.len());
    for (field, name) in batch.schema().fields().iter().zip(columns::ALL) {
        assert_eq!(field.name(), name);
    }

    let image = batch
        .column(8)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(image.values().to_vec(), vec![0, 0, 1, 1]);

    let x = batch.column(1).as_any().downcast_ref::<Float64Array>().unwrap();
    assert!((x.value(2) - -1065.624).abs() < 1e-9);

    let absolute = batch
        .column(11)
        .as_any()
        .downcast_ref::<TimestampMicrosecondArray>()
        .unwrap();
    assert_eq!(absolute.null_count(), 0);
    assert_eq!(
        absolute.value(0),
        table.rows()[0].absolute_t.unwrap().timestamp_micros()
    );
    assert_eq!(
        batch.schema().field(10).data_type(),
        &DataType::Timestamp(TimeUnit::Microsecond, Some("+02:00".into()))
    );
}

#[test]
fn test_write_csv() {
    let xml = tiled_document(1, 1, 2);
    let table = parse_planes(&xml, utc()).unwrap();

    let mut buffer = Vec::new();
    table.write_csv(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next().unwrap(), columns::ALL.join(","));
    let first = lines.next().unwrap();
    assert!(first.starts_with("0,-1165.624,122.694,0.001,1.027,0,0,0,0,0,"));
    assert!(first.contains("2021-04-12T02:12:21.340"));
    assert_eq!(lines.count(), 1);
}

#[test]
fn test_write_empty_csv_has_header() {
    let table = parse_planes("<OME/>", utc()).unwrap();
    let mut buffer = Vec::new();
    table.write_csv(&mut buffer).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap().trim_end(), columns::ALL.join(","));
}

#[test]
fn test_write_to_path() {
    let dir = tempfile::tempdir().unwrap();
    let xml = tiled_document(2, 2, 1);
    let table = parse_planes(&xml, utc()).unwrap();

    let parquet_path = dir.path().join("planes.parquet");
    assert_eq!(table.write_to_path(&parquet_path).unwrap(), ExportFormat::Parquet);
    assert!(std::fs::metadata(&parquet_path).unwrap().len() > 0);

    let csv_path = dir.path().join("planes.csv");
    assert_eq!(table.write_to_path(&csv_path).unwrap(), ExportFormat::Csv);
    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(text.lines().count(), 5);

    let err = table.write_to_path(dir.path().join("planes.xlsx")).unwrap_err();
    assert!(matches!(err, PlaneTableError::UnsupportedFormat(_)));
}
