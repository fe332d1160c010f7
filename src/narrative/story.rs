use std::{collections::BTreeSet, fs::File, io::BufReader, path::Path};

use crate::{
    foundation::core::{LatLng, MapView, Millis},
    foundation::error::{ScrollmapError, ScrollmapResult},
    foundation::settings::EngineSettings,
    layers::definition::LayerDefinition,
    surface::renderable::FloatingImage,
    visibility::request::LayerRequest,
};

/// A complete narrative: engine settings, layer declarations and ordered steps.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct StoryConfig {
    /// Engine tuning.
    #[serde(default)]
    pub settings: EngineSettings,
    /// View before the first step is entered.
    #[serde(default)]
    pub initial_view: Option<MapView>,
    /// Layer declarations.
    #[serde(default)]
    pub layers: Vec<LayerDefinition>,
    /// Steps in scroll order.
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// One scroll step.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct StepConfig {
    /// View center latitude.
    #[serde(default)]
    pub lat: Option<f64>,
    /// View center longitude.
    #[serde(default)]
    pub lng: Option<f64>,
    /// View zoom; absent or 0 keeps the current view.
    #[serde(default)]
    pub zoom: Option<f64>,
    /// Fly-to duration override.
    #[serde(default)]
    pub fly_ms: Option<Millis>,
    /// Layers to show while this step is active.
    #[serde(default)]
    pub layers: Option<LayerRequest>,
    /// Whether progress on this step draws a route.
    #[serde(default)]
    pub line_step: bool,
    /// Line layer driven by this step.
    #[serde(default)]
    pub line_layer: Option<String>,
    /// Image pinned on the map for this step.
    #[serde(default)]
    pub float_image: Option<FloatImageConfig>,
}

impl StepConfig {
    /// Camera target, when this step moves the camera.
    pub fn view(&self) -> Option<MapView> {
        let (lat, lng, zoom) = (self.lat?, self.lng?, self.zoom?);
        let mut view = MapView::new(LatLng::new(lat, lng), zoom).ok()?;
        if let Some(ms) = self.fly_ms {
            view.fly_duration = ms;
        }
        view.is_flyable().then_some(view)
    }

    /// Line layer animated by this step, if it is a line step.
    pub fn route_layer(&self) -> Option<&str> {
        if self.line_step {
            self.line_layer.as_deref()
        } else {
            None
        }
    }
}

/// Floating image declaration.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct FloatImageConfig {
    /// Image URL or path.
    pub url: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Width in pixels.
    #[serde(default = "default_image_px")]
    pub width: f64,
    /// Height in pixels.
    #[serde(default = "default_image_px")]
    pub height: f64,
}

fn default_image_px() -> f64 {
    120.0
}

impl FloatImageConfig {
    /// Renderable form; `None` when the position is not finite.
    pub fn to_image(&self) -> Option<FloatingImage> {
        let position = LatLng::new(self.lat, self.lng);
        position.is_finite().then(|| FloatingImage {
            url: self.url.clone(),
            position,
            width: self.width,
            height: self.height,
        })
    }
}

impl StoryConfig {
    /// Parse a story from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ScrollmapResult<Self> {
        serde_json::from_reader(r).map_err(|e| ScrollmapError::serde(format!("parse story JSON: {e}")))
    }

    /// Parse a story from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ScrollmapResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ScrollmapError::validation(format!("open story JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check settings, layer declarations and step references.
    pub fn validate(&self) -> ScrollmapResult<()> {
        self.settings.validate()?;

        let mut names = BTreeSet::new();
        for def in &self.layers {
            def.validate()?;
            if !names.insert(def.name.as_str()) {
                return Err(ScrollmapError::validation(format!(
                    "duplicate layer name '{}'",
                    def.name
                )));
            }
        }

        for (i, step) in self.steps.iter().enumerate() {
            if let Some(zoom) = step.zoom
                && (!zoom.is_finite() || zoom < 0.0)
            {
                return Err(ScrollmapError::validation(format!(
                    "step {i} zoom must be finite and >= 0"
                )));
            }
            if let Some(layer) = &step.line_layer {
                let is_line = self.layer(layer).is_some_and(|d| d.line);
                if !is_line {
                    return Err(ScrollmapError::validation(format!(
                        "step {i} line_layer '{layer}' is not a declared line layer"
                    )));
                }
            } else if step.line_step {
                return Err(ScrollmapError::validation(format!(
                    "step {i} is a line step without line_layer"
                )));
            }
            if let Some(img) = &step.float_image {
                if img.url.trim().is_empty() {
                    return Err(ScrollmapError::validation(format!(
                        "step {i} float_image url must be non-empty"
                    )));
                }
                if !(img.width.is_finite() && img.width > 0.0 && img.height.is_finite() && img.height > 0.0) {
                    return Err(ScrollmapError::validation(format!(
                        "step {i} float_image size must be finite and > 0"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Layer declaration by name.
    pub fn layer(&self, name: &str) -> Option<&LayerDefinition> {
        self.layers.iter().find(|d| d.name == name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narrative/story.rs"]
mod tests;
