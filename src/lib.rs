//! scrollmap is a scroll-driven narrative map engine.
//!
//! As a reader scrolls through text steps, the map flies between views, cross-fades named
//! groups of geographic layers and draws route lines in proportion to scroll progress.
//!
//! # Pipeline overview
//!
//! 1. **Load**: `StoryConfig -> LayerRegistry` (GeoJSON sources and SVG icons, fetched concurrently)
//! 2. **Drive**: `DriverEvent -> Narrative` (step enter / step progress)
//! 3. **Reconcile**: requested layer sets are debounced and diffed by the `VisibilityOrchestrator`
//! 4. **Draw**: fades and route reveals are written to a `MapSurface`
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Explicit time**: every event carries a [`Millis`] timestamp; fades and debounce run on a
//!   virtual [`Timeline`], so behavior is deterministic for a given event sequence.
//! - **No IO in the engine**: sources are fetched once up front through a [`SourceFetcher`].
//! - **Nothing fatal**: a layer that fails to load is logged and left out; the rest of the story
//!   keeps working.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod animation;
mod foundation;
mod geometry;
mod layers;
mod narrative;
mod route;
mod surface;
mod visibility;

pub use animation::ease::Ease;
pub use animation::timeline::{TaskHandle, Timeline};
pub use animation::tween::{Lerp, Tween, TweenSample};
pub use foundation::core::{LatLng, MapView, Millis, Rgba8};
pub use foundation::error::{ScrollmapError, ScrollmapResult};
pub use foundation::settings::EngineSettings;
pub use geometry::densify::{MAX_STEPS_PER_PAIR, densify, distance_m};
pub use layers::definition::{IconSpec, LayerDefinition, LayerStyle, PointStyle};
pub use layers::geojson::{Feature, GeoJson, Geometry};
pub use layers::icon::{FALLBACK_ICON_COLOR, IconTemplate};
pub use layers::popup::{PopupFn, PopupStrategy, Properties, render_template};
pub use layers::registry::{LayerRegistry, LineGeometry, LineSegment, LoadedLayer};
pub use layers::source::{FsFetcher, MemoryFetcher, SourceFetcher, normalize_rel_path};
pub use narrative::driver::{DriverEvent, Narrative};
pub use narrative::story::{FloatImageConfig, StepConfig, StoryConfig};
pub use route::animator::{RouteAnimator, effective_progress, reveal, reveal_count};
pub use surface::projection::{Viewport, world_px};
pub use surface::recording::{RecordingSurface, SurfaceCall};
pub use surface::renderable::{
    FloatingImage, IconMarkup, Marker, MarkerCollection, Popup, Renderable, RoutePath, Shape,
    ShapeCollection, ShapeFeature, ShapeStyle,
};
pub use surface::scene::{LiveStyle, SceneSurface};
pub use surface::snapshot::{SnapshotOpts, render_snapshot, scene_svg};
pub use surface::{FLOAT_IMAGE_ID, MapSurface, MarkerPart, route_id};
pub use visibility::orchestrator::{
    FadeLevels, VisibilityOrchestrator, VisibilityState, VisibilityTask,
};
pub use visibility::request::LayerRequest;
