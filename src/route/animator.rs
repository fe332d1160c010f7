//! Progress-proportional route drawing.
//!
//! A line layer's segments are treated as one sequence of points. Progress (divided by the
//! layer's speed divisor) selects a prefix of that sequence, which is then split back along the
//! original segment boundaries so disjoint parts never get joined.

use crate::{
    foundation::core::LatLng,
    layers::registry::{LayerRegistry, LineSegment},
    surface::{MapSurface, renderable::{Renderable, RoutePath}, route_id},
};

/// `clamp(progress / divisor, 0, 1)`.
///
/// A zero, negative or non-finite divisor counts as 1; NaN progress counts as 0.
pub fn effective_progress(progress: f64, divisor: f64) -> f64 {
    let divisor = if divisor.is_finite() && divisor > 0.0 {
        divisor
    } else {
        1.0
    };
    let p = if progress.is_nan() { 0.0 } else { progress };
    (p / divisor).clamp(0.0, 1.0)
}

/// Number of points revealed out of `total`.
pub fn reveal_count(progress: f64, divisor: f64, total: usize) -> usize {
    let count = (effective_progress(progress, divisor) * total as f64).floor() as usize;
    count.min(total)
}

/// First `count` points across `segments`, split along segment boundaries.
///
/// Segments before the cutoff are returned whole, the cutoff segment is truncated and later
/// segments are omitted.
pub fn reveal(segments: &[LineSegment], count: usize) -> Vec<&[LatLng]> {
    let mut left = count;
    let mut out = Vec::new();
    for seg in segments {
        if left == 0 {
            break;
        }
        if left >= seg.len() {
            out.push(seg.as_slice());
            left -= seg.len();
        } else {
            out.push(&seg[..left]);
            break;
        }
    }
    out
}

/// Keeps at most one route renderable attached and feeds it revealed points.
#[derive(Debug, Default)]
pub struct RouteAnimator {
    active: Option<String>,
}

impl RouteAnimator {
    /// Animator with no active route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Line layer whose route is currently attached.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Detach every route renderable, then attach and reset `target` when given.
    ///
    /// A target that is already the active, attached route is left as drawn.
    pub fn enter_step(
        &mut self,
        target: Option<&str>,
        registry: &LayerRegistry,
        surface: &mut dyn MapSurface,
    ) {
        if let Some(name) = target
            && self.active.as_deref() == Some(name)
            && surface.is_attached(&route_id(name))
        {
            tracing::debug!(layer = %name, "line step continues active route");
            return;
        }

        for name in registry.line_layers() {
            surface.detach(&route_id(name));
        }
        self.active = None;

        let Some(name) = target else {
            return;
        };
        let Some(line) = registry.get(name).and_then(|l| l.line.as_ref()) else {
            tracing::debug!(layer = %name, "no route data for line step");
            return;
        };
        let id = route_id(name);
        surface.attach(
            &id,
            &Renderable::Route(RoutePath {
                style: line.style.clone(),
            }),
        );
        surface.set_path(&id, &[]);
        self.active = Some(name.to_string());
    }

    /// Replace the path of `layer` with the prefix selected by `progress`.
    pub fn update(
        &self,
        progress: f64,
        layer: &str,
        registry: &LayerRegistry,
        surface: &mut dyn MapSurface,
    ) {
        let Some(loaded) = registry.get(layer) else {
            return;
        };
        let Some(line) = &loaded.line else {
            return;
        };
        let count = reveal_count(progress, loaded.draw_speed, line.total_points());
        let visible = reveal(&line.segments, count);
        surface.set_path(&route_id(layer), &visible);
    }

    /// Clear the path of `layer`.
    pub fn reset(&self, layer: &str, registry: &LayerRegistry, surface: &mut dyn MapSurface) {
        if registry.get(layer).is_some_and(|l| l.line.is_some()) {
            surface.set_path(&route_id(layer), &[]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/route/animator.rs"]
mod tests;
