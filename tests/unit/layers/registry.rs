use super::*;
use crate::layers::{definition::LayerStyle, popup::PopupStrategy, source::MemoryFetcher};

const POINTS: &str = r##"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"name":"St. Paul","svgColor":"#00ff00"},
   "geometry":{"type":"Point","coordinates":[-77.0, 38.9]}},
  {"type":"Feature","properties":{"name":"Annex"},
   "geometry":{"type":"Point","coordinates":[-77.1, 38.8]}},
  {"type":"Feature","properties":{"name":"Lot"},
   "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}
]}"##;

const LINES: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{},
   "geometry":{"type":"LineString","coordinates":[[-77.0, 38.9],[-77.0, 38.9001]]}},
  {"type":"Feature","properties":{},
   "geometry":{"type":"MultiLineString","coordinates":[[[0,0],[0,0]],[[1,1],[1,1]]]}}
]}"#;

const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><circle cx="12" cy="12" r="10" fill="{color}"/></svg>"#;

fn fetcher() -> MemoryFetcher {
    MemoryFetcher::new()
        .with("data/church.geojson", POINTS)
        .unwrap()
        .with("data/street.geojson", LINES)
        .unwrap()
        .with("data/home.svg", ICON)
        .unwrap()
        .with("data/broken.geojson", "{ not json")
        .unwrap()
}

fn icon(source: &str) -> IconSpec {
    IconSpec {
        source: source.to_string(),
        size: Some(50.0),
        color: None,
        label: Some("Church".to_string()),
    }
}

fn load(defs: Vec<LayerDefinition>) -> LayerRegistry {
    futures::executor::block_on(LayerRegistry::load_all(
        defs,
        &fetcher(),
        &EngineSettings::default(),
    ))
}

fn markers(layer: &LoadedLayer) -> &[Marker] {
    match &layer.renderable {
        Renderable::Markers(m) => &m.markers,
        other => panic!("expected markers, got {}", other.kind()),
    }
}

#[test]
fn inline_icons_use_feature_color_then_layer_color() {
    let mut def = LayerDefinition::new("church", "data/church.geojson");
    def.style = LayerStyle {
        color: Some("#ff0000".to_string()),
        ..LayerStyle::default()
    };
    def.icon = Some(icon("data/home.svg"));
    let reg = load(vec![def]);

    let m = markers(reg.get("church").unwrap());
    assert_eq!(m.len(), 2);
    let IconMarkup::Inline { svg } = &m[0].icon else {
        panic!("expected inline icon");
    };
    assert!(svg.contains(r##"fill="#00ff00""##));
    let IconMarkup::Inline { svg } = &m[1].icon else {
        panic!("expected inline icon");
    };
    assert!(svg.contains(r##"fill="#ff0000""##));
    assert_eq!(m[0].anchor, (25.0, 25.0));
    assert_eq!(m[0].label.as_deref(), Some("Church"));
    assert_eq!(m[0].popup.as_ref().unwrap().content, "St. Paul");
    assert_eq!(m[0].popup.as_ref().unwrap().max_width, 300);
}

#[test]
fn missing_icon_falls_back_to_external_reference() {
    let mut def = LayerDefinition::new("church", "data/church.geojson");
    def.icon = Some(icon("data/missing.svg"));
    let reg = load(vec![def]);

    let m = markers(reg.get("church").unwrap());
    assert_eq!(m.len(), 2);
    for marker in m {
        assert_eq!(
            marker.icon,
            IconMarkup::External {
                url: "data/missing.svg".to_string()
            }
        );
    }
    assert_eq!(reg.failures().count(), 0);
}

#[test]
fn one_failure_leaves_others_loaded() {
    let reg = load(vec![
        LayerDefinition::new("broken", "data/broken.geojson"),
        LayerDefinition::new("absent", "data/absent.geojson"),
        LayerDefinition::new("church", "data/church.geojson"),
    ]);
    assert!(reg.get("broken").is_none());
    assert!(reg.get("absent").is_none());
    assert!(reg.get("church").is_some());
    let failed: Vec<&str> = reg.failures().map(|(name, _)| name).collect();
    assert_eq!(failed, vec!["absent", "broken"]);
    assert!(reg.definition("broken").is_some());
    assert_eq!(reg.len(), 1);
}

#[test]
fn shapes_layer_turns_points_into_circles() {
    let mut def = LayerDefinition::new("historic_sites", "data/church.geojson");
    def.popup = PopupStrategy::None;
    let reg = load(vec![def]);

    let Renderable::Shapes(c) = &reg.get("historic_sites").unwrap().renderable else {
        panic!("expected shapes");
    };
    assert_eq!(c.features.len(), 3);
    assert!(matches!(c.features[0].shape, Shape::Circle { radius, .. } if radius == 10.0));
    assert!(matches!(c.features[2].shape, Shape::Polygon { .. }));
    assert!(c.features.iter().all(|f| f.popup.is_none()));
    assert_eq!(c.style.opacity, 1.0);
    assert_eq!(c.style.fill_opacity, 0.5);
}

#[test]
fn line_layers_keep_one_segment_per_part() {
    let mut def = LayerDefinition::new("street_path", "data/street.geojson");
    def.line = true;
    def.draw_speed = Some(2.0);
    let reg = load(vec![def]);

    let layer = reg.get("street_path").unwrap();
    let line = layer.line.as_ref().unwrap();
    assert_eq!(line.segments.len(), 3);
    // ~11 m apart at 2 m spacing.
    assert!(line.segments[0].len() >= 5);
    assert_eq!(line.segments[0][0], LatLng::new(38.9, -77.0));
    assert_eq!(line.style.color, "#d62728");
    assert_eq!(layer.draw_speed, 2.0);
    assert_eq!(reg.line_layers().collect::<Vec<_>>(), vec!["street_path"]);
}

#[test]
fn require_reports_unknown_layer() {
    let reg = load(vec![LayerDefinition::new("broken", "data/broken.geojson")]);
    assert!(matches!(
        reg.require("broken"),
        Err(ScrollmapError::UnknownLayer(name)) if name == "broken"
    ));
    assert!(reg.require("bogus").is_err());
}

#[test]
fn icon_layer_draws_non_point_features_as_styled_shapes() {
    let mut def = LayerDefinition::new("onezeroone", "data/church.geojson");
    def.style = LayerStyle {
        color: Some("#0000ff".to_string()),
        weight: Some(4.0),
        ..LayerStyle::default()
    };
    def.icon = Some(icon("data/home.svg"));
    let reg = load(vec![def]);

    let Renderable::Markers(c) = &reg.get("onezeroone").unwrap().renderable else {
        panic!("expected markers");
    };
    assert_eq!(c.markers.len(), 2);
    let shapes = c.shapes.as_ref().unwrap();
    assert_eq!(shapes.features.len(), 1);
    assert!(matches!(shapes.features[0].shape, Shape::Polygon { .. }));
    assert_eq!(shapes.features[0].popup.as_ref().unwrap().content, "Lot");
    assert_eq!(shapes.style.color, "#0000ff");
    assert_eq!(shapes.style.weight, 4.0);
}

#[test]
fn line_only_icon_layer_has_shapes_and_no_markers() {
    let mut def = LayerDefinition::new("streets", "data/street.geojson");
    def.icon = Some(icon("data/home.svg"));
    let reg = load(vec![def]);
    let Renderable::Markers(c) = &reg.get("streets").unwrap().renderable else {
        panic!("expected markers");
    };
    assert!(c.markers.is_empty());
    assert_eq!(c.shapes.as_ref().unwrap().features.len(), 2);
}
