use std::collections::HashMap;

use crate::{
    foundation::core::{LatLng, MapView},
    surface::{MapSurface, MarkerPart, renderable::Renderable},
};

/// Live appearance of one surface id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LiveStyle {
    /// Last stroke/fill opacity written, if any.
    pub opacity: Option<(f64, f64)>,
    /// Last per-marker, per-part opacity written.
    pub markers: HashMap<(usize, MarkerPart), f64>,
}

impl LiveStyle {
    /// Effective opacity of a marker: icon and graphic multiply.
    pub fn marker_opacity(&self, marker: usize) -> f64 {
        let icon = self.markers.get(&(marker, MarkerPart::Icon)).copied();
        let graphic = self.markers.get(&(marker, MarkerPart::Graphic)).copied();
        icon.unwrap_or(1.0) * graphic.unwrap_or(1.0)
    }
}

/// Surface that keeps the attached scene so it can be inspected or rasterized.
#[derive(Debug, Default)]
pub struct SceneSurface {
    view: Option<MapView>,
    attached: Vec<(String, Renderable)>,
    styles: HashMap<String, LiveStyle>,
    paths: HashMap<String, Vec<Vec<LatLng>>>,
}

impl SceneSurface {
    /// Empty scene without a view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last view flown to.
    pub fn view(&self) -> Option<&MapView> {
        self.view.as_ref()
    }

    /// Attached renderables in attach order (draw order).
    pub fn attached(&self) -> impl Iterator<Item = (&str, &Renderable)> {
        self.attached.iter().map(|(id, r)| (id.as_str(), r))
    }

    /// Live style for an id (default when never written).
    pub fn style(&self, id: &str) -> LiveStyle {
        self.styles.get(id).cloned().unwrap_or_default()
    }

    /// Current path of a route id.
    pub fn path(&self, id: &str) -> &[Vec<LatLng>] {
        self.paths.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl MapSurface for SceneSurface {
    fn attach(&mut self, id: &str, renderable: &Renderable) {
        if let Some(slot) = self.attached.iter_mut().find(|(i, _)| i == id) {
            slot.1 = renderable.clone();
            return;
        }
        self.attached.push((id.to_string(), renderable.clone()));
    }

    fn detach(&mut self, id: &str) {
        self.attached.retain(|(i, _)| i != id);
    }

    fn is_attached(&self, id: &str) -> bool {
        self.attached.iter().any(|(i, _)| i == id)
    }

    fn set_style(&mut self, id: &str, opacity: f64, fill_opacity: f64) {
        self.styles.entry(id.to_string()).or_default().opacity = Some((opacity, fill_opacity));
    }

    fn set_marker_opacity(&mut self, id: &str, marker: usize, part: MarkerPart, opacity: f64) {
        self.styles
            .entry(id.to_string())
            .or_default()
            .markers
            .insert((marker, part), opacity);
    }

    fn set_path(&mut self, id: &str, segments: &[&[LatLng]]) {
        self.paths.insert(
            id.to_string(),
            segments.iter().map(|s| s.to_vec()).collect(),
        );
    }

    fn fly_to(&mut self, view: &MapView) {
        self.view = Some(*view);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/scene.rs"]
mod tests;
