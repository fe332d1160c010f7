use super::*;

#[test]
fn swaps_lng_lat() {
    let features = GeoJson::parse_features(
        br#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"church"},
             "geometry":{"type":"Point","coordinates":[-77.05, 38.9, 12.0]}}
        ]}"#,
    )
    .unwrap();
    assert_eq!(features.len(), 1);
    let pts = features[0].geometry.as_ref().unwrap().points().unwrap();
    assert_eq!(pts, vec![LatLng::new(38.9, -77.05)]);
    assert_eq!(features[0].properties["name"], "church");
}

#[test]
fn multiline_keeps_part_order() {
    let g: Geometry = serde_json::from_value(serde_json::json!({
        "type": "MultiLineString",
        "coordinates": [[[0.0, 0.0], [1.0, 0.0]], [[5.0, 5.0], [6.0, 5.0], [7.0, 5.0]]]
    }))
    .unwrap();
    let parts = g.line_parts().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].len(), 2);
    assert_eq!(parts[1][2], LatLng::new(5.0, 7.0));
    assert!(g.points().unwrap().is_empty());
}

#[test]
fn null_geometry_and_properties_are_tolerated() {
    let features = GeoJson::parse_features(
        br#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":null,"geometry":null},
            {"type":"Feature","geometry":{"type":"GeometryCollection","geometries":[]}}
        ]}"#,
    )
    .unwrap();
    assert!(features[0].geometry.is_none());
    assert!(features[0].properties.is_empty());
    assert!(matches!(features[1].geometry, Some(Geometry::Unsupported)));
}

#[test]
fn short_position_is_rejected() {
    let g: Geometry =
        serde_json::from_value(serde_json::json!({"type": "Point", "coordinates": [1.0]})).unwrap();
    assert!(g.points().is_err());
}

#[test]
fn malformed_document_is_serde_error() {
    let err = GeoJson::parse_features(b"{ nope").unwrap_err();
    assert!(matches!(err, ScrollmapError::Serde(_)));
}
