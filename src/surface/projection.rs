use std::f64::consts::PI;

use kurbo::{Point, Vec2};

use crate::foundation::core::{LatLng, MapView};

/// Tile edge length in pixels at zoom 0.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the square Web-Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Web-Mercator world pixel coordinate of `p` at `zoom`.
pub fn world_px(p: LatLng, zoom: f64) -> Point {
    let scale = TILE_SIZE * zoom.exp2();
    let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (p.lng + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale;
    Point::new(x, y)
}

/// Maps coordinates to pixels of a fixed-size viewport centered on a view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    origin: Point,
    zoom: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    /// Viewport of `width` x `height` pixels centered on `view`.
    pub fn new(view: &MapView, width: u32, height: u32) -> Self {
        let (width, height) = (f64::from(width), f64::from(height));
        let center = world_px(view.center, view.zoom);
        Self {
            origin: center - Vec2::new(width / 2.0, height / 2.0),
            zoom: view.zoom,
            width,
            height,
        }
    }

    /// Screen pixel of `p`.
    pub fn project(&self, p: LatLng) -> Point {
        let w = world_px(p, self.zoom);
        Point::new(w.x - self.origin.x, w.y - self.origin.y)
    }

    /// Viewport size in pixels.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/projection.rs"]
mod tests;
