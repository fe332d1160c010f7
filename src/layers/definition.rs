use crate::{
    foundation::error::{ScrollmapError, ScrollmapResult},
    layers::popup::PopupStrategy,
};

/// Declared style for a layer. Unset fields take engine defaults at load time.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerStyle {
    /// Stroke color (any CSS color string).
    #[serde(default)]
    pub color: Option<String>,
    /// Stroke width in pixels.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Stroke opacity target.
    #[serde(default)]
    pub opacity: Option<f64>,
    /// Fill opacity target.
    #[serde(default, alias = "fillOpacity")]
    pub fill_opacity: Option<f64>,
}

/// Custom icon for point features.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IconSpec {
    /// Location of the SVG asset.
    pub source: String,
    /// Square size in pixels.
    #[serde(default)]
    pub size: Option<f64>,
    /// Color substituted for `{color}` unless a feature overrides it.
    #[serde(default)]
    pub color: Option<String>,
    /// Static caption drawn with the icon.
    #[serde(default)]
    pub label: Option<String>,
}

/// Circle-marker styling for point features of layers without an icon.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointStyle {
    /// Radius in pixels.
    #[serde(default = "default_point_radius")]
    pub radius: f64,
    /// Stroke color; the fill uses the layer color.
    #[serde(default = "default_point_stroke")]
    pub stroke_color: String,
    /// Stroke width in pixels.
    #[serde(default = "default_point_weight")]
    pub weight: f64,
}

fn default_point_radius() -> f64 {
    10.0
}

fn default_point_stroke() -> String {
    "#810202".to_string()
}

fn default_point_weight() -> f64 {
    2.0
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            radius: default_point_radius(),
            stroke_color: default_point_stroke(),
            weight: default_point_weight(),
        }
    }
}

/// Immutable declaration of a named, independently toggleable layer.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct LayerDefinition {
    /// Unique key.
    pub name: String,
    /// GeoJSON source location.
    pub source: String,
    /// Vector style.
    #[serde(default)]
    pub style: LayerStyle,
    /// Optional icon for point features.
    #[serde(default)]
    pub icon: Option<IconSpec>,
    /// Popup content strategy.
    #[serde(default)]
    pub popup: PopupStrategy,
    /// Circle styling for icon-less point features.
    #[serde(default)]
    pub point_style: Option<PointStyle>,
    /// Whether this layer feeds the route-draw animator.
    #[serde(default)]
    pub line: bool,
    /// Draw speed divisor: 1 is normal, 2 draws half as fast, 0.5 twice as fast.
    #[serde(default)]
    pub draw_speed: Option<f64>,
}

impl LayerDefinition {
    /// Minimal definition with defaults for everything but name and source.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            style: LayerStyle::default(),
            icon: None,
            popup: PopupStrategy::default(),
            point_style: None,
            line: false,
            draw_speed: None,
        }
    }

    /// Speed divisor with 0, negative, non-finite and unset all meaning 1.
    pub fn speed_divisor(&self) -> f64 {
        match self.draw_speed {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => 1.0,
        }
    }

    /// Check the declaration in isolation.
    pub fn validate(&self) -> ScrollmapResult<()> {
        if self.name.trim().is_empty() {
            return Err(ScrollmapError::validation("layer name must be non-empty"));
        }
        if self.name.contains(',') || self.name.trim() != self.name {
            return Err(ScrollmapError::validation(format!(
                "layer name '{}' must not contain commas or surrounding whitespace",
                self.name
            )));
        }
        if self.source.trim().is_empty() {
            return Err(ScrollmapError::validation(format!(
                "layer '{}' source must be non-empty",
                self.name
            )));
        }
        if let Some(d) = self.draw_speed
            && (!d.is_finite() || d < 0.0)
        {
            return Err(ScrollmapError::validation(format!(
                "layer '{}' draw_speed must be finite and >= 0",
                self.name
            )));
        }
        for (what, v) in [
            ("opacity", self.style.opacity),
            ("fill_opacity", self.style.fill_opacity),
        ] {
            if let Some(v) = v
                && !(0.0..=1.0).contains(&v)
            {
                return Err(ScrollmapError::validation(format!(
                    "layer '{}' {what} must be within [0, 1]",
                    self.name
                )));
            }
        }
        if let Some(icon) = &self.icon {
            if icon.source.trim().is_empty() {
                return Err(ScrollmapError::validation(format!(
                    "layer '{}' icon source must be non-empty",
                    self.name
                )));
            }
            if let Some(size) = icon.size
                && (!size.is_finite() || size <= 0.0)
            {
                return Err(ScrollmapError::validation(format!(
                    "layer '{}' icon size must be finite and > 0",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/definition.rs"]
mod tests;
