//! The map surface seam.
//!
//! Tile rendering, pan/zoom and DOM work belong to whatever map engine hosts the narrative. The
//! engine only needs the primitives on [`MapSurface`]; this module also provides two in-process
//! surfaces, one that records calls and one that keeps a renderable scene.

pub(crate) mod projection;
pub(crate) mod recording;
pub(crate) mod renderable;
pub(crate) mod scene;
pub(crate) mod snapshot;

use crate::foundation::core::{LatLng, MapView};
use renderable::Renderable;

/// Which element of an icon marker an opacity write targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPart {
    /// The marker's icon container element.
    Icon,
    /// The graphic (inline SVG or image) inside the container.
    Graphic,
}

/// Rendering primitives consumed by the engine.
///
/// Ids are layer names for data layers, `<layer>#route` for animated routes and
/// [`FLOAT_IMAGE_ID`] for the per-step floating image. Style writes may arrive before `attach`
/// and must be remembered by the implementation.
pub trait MapSurface {
    /// Add a renderable to the map.
    fn attach(&mut self, id: &str, renderable: &Renderable);

    /// Remove a renderable from the map, freeing its resources.
    fn detach(&mut self, id: &str);

    /// Whether `id` is currently on the map.
    fn is_attached(&self, id: &str) -> bool;

    /// Set stroke and fill opacity on every feature of a vector renderable.
    fn set_style(&mut self, id: &str, opacity: f64, fill_opacity: f64);

    /// Set opacity on one part of one marker.
    fn set_marker_opacity(&mut self, id: &str, marker: usize, part: MarkerPart, opacity: f64);

    /// Replace the visible path of a route renderable.
    fn set_path(&mut self, id: &str, segments: &[&[LatLng]]);

    /// Animate the camera to a view.
    fn fly_to(&mut self, view: &MapView);
}

/// Surface id of the floating step image.
pub const FLOAT_IMAGE_ID: &str = "float-image";

/// Surface id of the animated route for a line layer.
pub fn route_id(layer: &str) -> String {
    format!("{layer}#route")
}
