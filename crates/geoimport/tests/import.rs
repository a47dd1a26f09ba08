//! End-to-end import tests across all supported formats

use std::io::Write;

use geoimport::{
    import, import_file, import_named, GeoFormat, GeoImportError, GpxViolation, KmlErrorKind,
};

const GEOJSON_COLLECTION: &str = r##"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "name": "Berlin", "description": "capital" },
      "geometry": { "type": "Point", "coordinates": [13.405, 52.52] }
    },
    {
      "type": "Feature",
      "properties": { "color": "#ff0000" },
      "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1], [2, 0]] }
    },
    {
      "type": "Feature",
      "properties": { "color": "#ff0000" },
      "geometry": { "type": "LineString", "coordinates": [[5, 5], [6, 6]] }
    },
    {
      "type": "Feature",
      "properties": { "color": "#00ff00" },
      "geometry": { "type": "LineString", "coordinates": [[9, 9], [8, 8]] }
    }
  ]
}"##;

const GPX_TRACK: &str = r#"<?xml version="1.0"?>
<gpx version="1.1" creator="test">
  <wpt lat="47.644" lon="-122.326"><name>start</name></wpt>
  <wpt lat="47.650" lon="-122.330"><name>finish</name><desc>uphill</desc></wpt>
  <trk>
    <name>loop</name>
    <trkseg>
      <trkpt lat="47.644" lon="-122.326"/>
      <trkpt lat="47.646" lon="-122.328"/>
      <trkpt lat="47.650" lon="-122.330"/>
    </trkseg>
  </trk>
</gpx>"#;

const KML_STYLED: &str = r#"<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Style id="track"><LineStyle><color>ff00aaff</color></LineStyle></Style>
    <Placemark>
      <name>ride</name>
      <styleUrl>#track</styleUrl>
      <LineString><coordinates>8.5,47.3 8.6,47.4 8.7,47.5</coordinates></LineString>
    </Placemark>
    <Placemark>
      <name>summit</name>
      <Point><coordinates>8.6,47.45</coordinates></Point>
    </Placemark>
  </Document>
</kml>"#;

#[test]
fn test_geojson_import_groups_lines_by_color() {
    let data = import(GEOJSON_COLLECTION.as_bytes(), GeoFormat::GeoJson).unwrap();

    assert_eq!(data.points.len(), 1);
    assert_eq!(data.points[0].title.as_deref(), Some("Berlin"));
    assert_eq!(data.points[0].subtitle.as_deref(), Some("capital"));

    // Two red lines in one group, the green one in another, input order.
    assert_eq!(data.multi_polylines.len(), 2);
    assert_eq!(data.multi_polylines[0].color.as_deref(), Some("ff0000"));
    assert_eq!(data.multi_polylines[0].lines.len(), 2);
    assert_eq!(data.multi_polylines[1].color.as_deref(), Some("00ff00"));
    assert_eq!(data.multi_polylines[1].lines.len(), 1);
}

#[test]
fn test_geojson_bounds_span_all_geometry() {
    let data = import(GEOJSON_COLLECTION.as_bytes(), GeoFormat::GeoJson).unwrap();
    let bounds = data.bounds.unwrap();
    assert!(bounds.min_longitude <= 0.0);
    assert!(bounds.max_longitude >= 13.405);
    assert!(bounds.max_latitude >= 52.52);
}

#[test]
fn test_gpx_import_indexes_waypoints_and_builds_track() {
    let data = import(GPX_TRACK.as_bytes(), GeoFormat::Gpx).unwrap();

    assert_eq!(data.points.len(), 2);
    assert_eq!(data.points[0].index, Some(1));
    assert_eq!(data.points[1].index, Some(2));
    assert_eq!(data.points[1].subtitle.as_deref(), Some("uphill"));

    assert_eq!(data.multi_polylines.len(), 1);
    assert_eq!(data.multi_polylines[0].lines[0].coordinates.len(), 3);
    assert!(data.multi_polylines[0].lines[0].labels.contains(&"loop".to_string()));
}

#[test]
fn test_gpx_out_of_range_coordinates_are_aggregated() {
    let gpx = r#"<gpx version="1.1">
  <wpt lat="95.0" lon="10.0"/>
  <wpt lat="10.0" lon="200.0"/>
</gpx>"#;
    match import(gpx.as_bytes(), GeoFormat::Gpx) {
        Err(GeoImportError::InvalidGpx(errors)) => {
            assert_eq!(errors.violations.len(), 2);
            assert!(matches!(
                errors.violations[0],
                GpxViolation::LatitudeOutOfRange(lat) if lat == 95.0
            ));
            assert!(matches!(
                errors.violations[1],
                GpxViolation::LongitudeOutOfRange(lon) if lon == 200.0
            ));
        }
        other => panic!("expected InvalidGpx, got {other:?}"),
    }
}

#[test]
fn test_kml_import_resolves_style_color() {
    let data = import(KML_STYLED.as_bytes(), GeoFormat::Kml).unwrap();
    assert_eq!(data.points.len(), 1);
    assert_eq!(data.multi_polylines.len(), 1);
    assert_eq!(data.multi_polylines[0].color.as_deref(), Some("ff00aaff"));
}

#[test]
fn test_kmz_import_via_named_entry_point() {
    let mut buffer = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buffer);
        writer
            .start_file("doc.kml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(KML_STYLED.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    let data = import_named(&buffer.into_inner(), "export.kmz").unwrap();
    assert_eq!(data.points.len(), 1);
}

#[test]
fn test_featureless_input_is_file_empty() {
    let empty_collection = br#"{ "type": "FeatureCollection", "features": [] }"#;
    assert!(matches!(
        import(empty_collection, GeoFormat::GeoJson),
        Err(GeoImportError::FileEmpty)
    ));

    let placemarkless = b"<kml><Document><name>nothing</name></Document></kml>";
    assert!(matches!(
        import(placemarkless, GeoFormat::Kml),
        Err(GeoImportError::FileEmpty)
    ));
}

#[test]
fn test_zero_byte_input_is_corrupted_not_empty() {
    for format in [GeoFormat::GeoJson, GeoFormat::Gpx, GeoFormat::Kml] {
        assert!(matches!(
            import(b"", format),
            Err(GeoImportError::FileCorrupted)
        ));
    }
}

#[test]
fn test_unsupported_extension_is_checked_before_file_access() {
    // The path does not exist; the extension check must fire first.
    match import_file("/nonexistent/layers.shp") {
        Err(GeoImportError::UnsupportedFileType { extension }) => {
            assert_eq!(extension, "shp");
        }
        other => panic!("expected UnsupportedFileType, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_inaccessible() {
    assert!(matches!(
        import_file("/nonexistent/trip.gpx"),
        Err(GeoImportError::FileInaccessible(_))
    ));
}

#[test]
fn test_import_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trip.geojson");
    std::fs::write(&path, GEOJSON_COLLECTION).unwrap();

    let data = import_file(&path).unwrap();
    assert_eq!(data.points.len(), 1);
    assert!(data.bounds.is_some());
}

#[test]
fn test_wrong_format_hint_fails_cleanly() {
    // GPX bytes decoded as GeoJSON must be a GeoJSON error, not a panic.
    assert!(matches!(
        import(GPX_TRACK.as_bytes(), GeoFormat::GeoJson),
        Err(GeoImportError::InvalidGeoJson(_))
    ));
    // GeoJSON bytes decoded as KML fail the XML parse.
    assert!(matches!(
        import(GEOJSON_COLLECTION.as_bytes(), GeoFormat::Kml),
        Err(GeoImportError::InvalidKml(KmlErrorKind::Xml { .. }))
    ));
}
