use crate::foundation::core::LatLng;

/// Resolved vector style. Opacity values double as fade-in targets.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ShapeStyle {
    /// Stroke (and default fill) color, any CSS color string.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Stroke opacity target.
    pub opacity: f64,
    /// Fill opacity target.
    pub fill_opacity: f64,
}

/// Popup bound to a feature.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Popup {
    /// HTML content.
    pub content: String,
    /// Maximum width in pixels.
    pub max_width: u32,
}

/// Geometry of a single vector feature in `(lat, lng)` order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Polygon; first ring is the exterior.
    Polygon {
        /// Rings.
        rings: Vec<Vec<LatLng>>,
    },
    /// One or more open line parts.
    Polyline {
        /// Parts.
        parts: Vec<Vec<LatLng>>,
    },
    /// Fixed-pixel-radius circle marker.
    Circle {
        /// Center.
        center: LatLng,
        /// Radius in pixels.
        radius: f64,
        /// Fill color.
        fill_color: String,
        /// Stroke color.
        stroke_color: String,
        /// Stroke width in pixels.
        weight: f64,
    },
}

/// Vector feature plus its optional popup.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ShapeFeature {
    /// Geometry.
    pub shape: Shape,
    /// Popup, if any strategy produced content.
    pub popup: Option<Popup>,
}

/// Vector layer: shapes sharing one style.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ShapeCollection {
    /// Shared style.
    pub style: ShapeStyle,
    /// Features in source order.
    pub features: Vec<ShapeFeature>,
}

/// How an icon marker draws its graphic.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IconMarkup {
    /// Inline SVG filling its container.
    Inline {
        /// Rewritten SVG markup.
        svg: String,
    },
    /// Reference to the icon asset by URL.
    External {
        /// Icon URL or path.
        url: String,
    },
}

impl IconMarkup {
    /// Whether the graphic is embedded inline.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }
}

/// Icon marker at a point feature.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Marker {
    /// Anchor position.
    pub position: LatLng,
    /// Graphic.
    pub icon: IconMarkup,
    /// Square icon size in pixels.
    pub size: f64,
    /// Pixel offset of the anchor inside the icon box (`size / 2` on both axes).
    pub anchor: (f64, f64),
    /// Static caption drawn with the icon.
    pub label: Option<String>,
    /// Popup, if any strategy produced content.
    pub popup: Option<Popup>,
}

impl Marker {
    /// Wrapper markup that sizes the container; the inline SVG fills it.
    pub fn html(&self) -> String {
        let size = format_px(self.size);
        let body = match &self.icon {
            IconMarkup::Inline { svg } => svg.clone(),
            IconMarkup::External { url } => {
                format!(r#"<img src="{url}" width="100%" height="100%"/>"#)
            }
        };
        format!(r#"<div style="width:{size}px;height:{size}px;display:inline-block">{body}</div>"#)
    }
}

/// Marker layer.
///
/// Point features become markers. Line and polygon features of the same layer are drawn as
/// styled shapes in `shapes` and fade together with the markers.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MarkerCollection {
    /// Markers in source order.
    pub markers: Vec<Marker>,
    /// Non-point features, drawn with the layer style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shapes: Option<ShapeCollection>,
}

/// Style-only handle for an animated route; points arrive through `set_path`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RoutePath {
    /// Stroke style.
    pub style: ShapeStyle,
}

/// Image pinned to a coordinate for the duration of a step.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FloatingImage {
    /// Image URL or path.
    pub url: String,
    /// Center position.
    pub position: LatLng,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// Anything the engine can attach to a map surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Renderable {
    /// Vector shapes.
    Shapes(ShapeCollection),
    /// Icon markers.
    Markers(MarkerCollection),
    /// Animated route line.
    Route(RoutePath),
    /// Floating image.
    Image(FloatingImage),
}

impl Renderable {
    /// Short kind tag used in traces.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Shapes(_) => "shapes",
            Self::Markers(_) => "markers",
            Self::Route(_) => "route",
            Self::Image(_) => "image",
        }
    }
}

/// Format a pixel value without a trailing `.0` for whole numbers.
pub(crate) fn format_px(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
