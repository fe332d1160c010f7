use crate::foundation::error::{ScrollmapError, ScrollmapResult};

/// Geographic coordinate in degrees, stored latitude-first.
///
/// GeoJSON stores `[longitude, latitude]`; conversion happens once at load time so that everything
/// downstream of the registry works in `(lat, lng)` order.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Construct a coordinate from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Construct from a GeoJSON `[lng, lat]` position.
    pub fn from_lng_lat(pos: [f64; 2]) -> Self {
        Self {
            lat: pos[1],
            lng: pos[0],
        }
    }

    /// Whether both components are finite.
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Component-wise linear interpolation (not geodesic).
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }
}

/// Timeline timestamp or duration in milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Zero milliseconds.
    pub const ZERO: Self = Self(0);

    /// Saturating addition of a duration.
    pub fn after(self, delay: Millis) -> Self {
        Self(self.0.saturating_add(delay.0))
    }
}

/// Camera target for a step: center, zoom and fly-to duration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapView {
    /// Map center.
    pub center: LatLng,
    /// Zoom level.
    pub zoom: f64,
    /// Fly-to animation duration.
    #[serde(default = "default_fly_duration")]
    pub fly_duration: Millis,
}

fn default_fly_duration() -> Millis {
    Millis(2000)
}

impl MapView {
    /// Validated constructor.
    pub fn new(center: LatLng, zoom: f64) -> ScrollmapResult<Self> {
        if !center.is_finite() {
            return Err(ScrollmapError::validation("map view center must be finite"));
        }
        if !zoom.is_finite() || zoom < 0.0 {
            return Err(ScrollmapError::validation(
                "map view zoom must be finite and >= 0",
            ));
        }
        Ok(Self {
            center,
            zoom,
            fly_duration: default_fly_duration(),
        })
    }

    /// A view is flown to only when its center is finite and zoom is non-zero.
    pub fn is_flyable(&self) -> bool {
        self.center.is_finite() && self.zoom.is_finite() && self.zoom != 0.0
    }
}

/// Straight (non-premultiplied) RGBA8 color parsed from CSS hex notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> ScrollmapResult<Self> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ScrollmapError::validation(format!("color '{s}' must start with '#'")))?;
        if !hex.is_ascii() {
            return Err(ScrollmapError::validation(format!("invalid hex color '{s}'")));
        }
        let digit = |i: usize, len: usize| {
            u8::from_str_radix(&hex[i..i + len], 16)
                .map_err(|_| ScrollmapError::validation(format!("invalid hex color '{s}'")))
        };
        match hex.len() {
            3 => Ok(Self {
                r: digit(0, 1)? * 17,
                g: digit(1, 1)? * 17,
                b: digit(2, 1)? * 17,
                a: 255,
            }),
            6 | 8 => Ok(Self {
                r: digit(0, 2)?,
                g: digit(2, 2)?,
                b: digit(4, 2)?,
                a: if hex.len() == 8 { digit(6, 2)? } else { 255 },
            }),
            _ => Err(ScrollmapError::validation(format!(
                "invalid hex color '{s}'"
            ))),
        }
    }

    /// `#rrggbb` form, dropping alpha.
    pub fn to_hex_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a `[0, 1]` fraction.
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
