use super::*;
use crate::{
    foundation::core::MapView,
    surface::{
        MapSurface,
        renderable::{Marker, ShapeFeature, ShapeStyle},
    },
};

fn style(color: &str) -> ShapeStyle {
    ShapeStyle {
        color: color.to_string(),
        weight: 6.0,
        opacity: 1.0,
        fill_opacity: 0.5,
    }
}

fn scene() -> SceneSurface {
    let mut s = SceneSurface::new();
    s.fly_to(&MapView::new(LatLng::new(0.0, 0.0), 10.0).unwrap());
    s
}

#[test]
fn requires_a_view() {
    let s = SceneSurface::new();
    assert!(scene_svg(&s, &SnapshotOpts::default()).is_err());
    let opts = SnapshotOpts {
        width: 0,
        ..SnapshotOpts::default()
    };
    assert!(scene_svg(&scene(), &opts).is_err());
}

#[test]
fn svg_uses_live_opacity_and_escapes_attributes() {
    let mut s = scene();
    s.attach(
        "lots",
        &Renderable::Shapes(ShapeCollection {
            style: style("#00ffff"),
            features: vec![ShapeFeature {
                shape: Shape::Polygon {
                    rings: vec![vec![
                        LatLng::new(0.0, 0.0),
                        LatLng::new(0.01, 0.0),
                        LatLng::new(0.01, 0.01),
                    ]],
                },
                popup: None,
            }],
        }),
    );
    s.set_style("lots", 0.25, 0.125);
    s.attach(
        "church",
        &Renderable::Markers(MarkerCollection {
            markers: vec![Marker {
                position: LatLng::new(0.0, 0.0),
                icon: IconMarkup::External {
                    url: "icons/a&b.svg".to_string(),
                },
                size: 32.0,
                anchor: (16.0, 16.0),
                label: Some("<Church>".to_string()),
                popup: None,
            }],
            shapes: None,
        }),
    );

    let svg = scene_svg(&s, &SnapshotOpts::default()).unwrap();
    assert!(svg.contains(r#"fill-opacity="0.125""#));
    assert!(svg.contains(r#"stroke-opacity="0.25""#));
    assert!(svg.contains("icons/a&amp;b.svg"));
    assert!(svg.contains("&lt;Church&gt;"));
    assert!(svg.contains(r#"x="384" y="284" width="32" height="32""#));
}

#[test]
fn inline_icon_is_positioned_in_place_of_fill_sizing() {
    let mut s = scene();
    s.attach(
        "home",
        &Renderable::Markers(MarkerCollection {
            markers: vec![Marker {
                position: LatLng::new(0.0, 0.0),
                icon: IconMarkup::Inline {
                    svg: r#"<svg width="100%" height="100%" viewBox="0 0 4 4"><rect width="4" height="4"/></svg>"#
                        .to_string(),
                },
                size: 20.0,
                anchor: (10.0, 10.0),
                label: None,
                popup: None,
            }],
            shapes: None,
        }),
    );
    let svg = scene_svg(&s, &SnapshotOpts::default()).unwrap();
    assert!(svg.contains(r#"<svg x="390" y="290" width="20" height="20" viewBox="0 0 4 4">"#));
}

#[test]
fn renders_route_pixels() {
    let mut s = scene();
    s.attach(
        "street#route",
        &Renderable::Route(RoutePath {
            style: style("#ff0000"),
        }),
    );
    let line = [LatLng::new(0.0, -0.05), LatLng::new(0.0, 0.05)];
    s.set_path("street#route", &[&line[..]]);

    let opts = SnapshotOpts {
        width: 64,
        height: 48,
        ..SnapshotOpts::default()
    };
    let img = render_snapshot(&s, &opts).unwrap();
    assert_eq!(img.dimensions(), (64, 48));
    let center = img.get_pixel(32, 24);
    assert_eq!(center.0, [255, 0, 0, 255]);
    let corner = img.get_pixel(0, 0);
    assert_eq!(corner.0, [242, 239, 233, 255]);
}

#[test]
fn icon_layer_shapes_are_drawn_under_markers() {
    let mut s = scene();
    s.attach(
        "onezeroone",
        &Renderable::Markers(MarkerCollection {
            markers: vec![Marker {
                position: LatLng::new(0.0, 0.0),
                icon: IconMarkup::External {
                    url: "icon.svg".to_string(),
                },
                size: 20.0,
                anchor: (10.0, 10.0),
                label: None,
                popup: None,
            }],
            shapes: Some(ShapeCollection {
                style: style("#0000ff"),
                features: vec![ShapeFeature {
                    shape: Shape::Polyline {
                        parts: vec![vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 0.01)]],
                    },
                    popup: None,
                }],
            }),
        }),
    );
    s.set_style("onezeroone", 0.5, 0.25);

    let svg = scene_svg(&s, &SnapshotOpts::default()).unwrap();
    let path_at = svg.find(r##"stroke="#0000ff""##).unwrap();
    let image_at = svg.find("<image").unwrap();
    assert!(path_at < image_at);
    assert!(svg.contains(r#"stroke-opacity="0.5""#));
}
