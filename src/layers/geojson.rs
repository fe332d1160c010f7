//! Minimal GeoJSON model.
//!
//! Only what the narrative draws is modelled: a `FeatureCollection` of features with point, line
//! and polygon geometries. Positions are converted from `[lng, lat(, alt)]` to [`LatLng`] here and
//! nowhere else.

use serde_json::Value;

use crate::{
    foundation::core::LatLng,
    foundation::error::{ScrollmapError, ScrollmapResult},
    layers::popup::Properties,
};

/// Top-level GeoJSON document.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    /// Collection of features.
    FeatureCollection {
        /// Features in document order.
        features: Vec<Feature>,
    },
    /// Single feature.
    Feature(Feature),
}

impl GeoJson {
    /// Parse bytes into a list of features.
    pub fn parse_features(bytes: &[u8]) -> ScrollmapResult<Vec<Feature>> {
        let doc: GeoJson = serde_json::from_slice(bytes)
            .map_err(|e| ScrollmapError::serde(format!("parse geojson: {e}")))?;
        Ok(match doc {
            GeoJson::FeatureCollection { features } => features,
            GeoJson::Feature(f) => vec![f],
        })
    }
}

/// Geometry plus properties.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct Feature {
    /// Geometry; `null` is allowed and skipped downstream.
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Properties; `null` reads as empty.
    #[serde(default, deserialize_with = "properties_or_empty")]
    pub properties: Properties,
}

fn properties_or_empty<'de, D>(de: D) -> Result<Properties, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v: Option<Value> = serde::Deserialize::deserialize(de)?;
    Ok(match v {
        Some(Value::Object(map)) => map,
        _ => Properties::new(),
    })
}

/// Raw GeoJSON position; at least two numbers, extra dimensions ignored.
pub type Position = Vec<f64>;

/// Supported geometries. Anything else parses as [`Geometry::Unsupported`].
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Single position.
    Point {
        /// Position.
        coordinates: Position,
    },
    /// Several positions.
    MultiPoint {
        /// Positions.
        coordinates: Vec<Position>,
    },
    /// Open line.
    LineString {
        /// Positions.
        coordinates: Vec<Position>,
    },
    /// Several lines.
    MultiLineString {
        /// Lines.
        coordinates: Vec<Vec<Position>>,
    },
    /// Polygon rings.
    Polygon {
        /// Rings.
        coordinates: Vec<Vec<Position>>,
    },
    /// Several polygons.
    MultiPolygon {
        /// Polygons.
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    /// Geometry collections and unknown types.
    #[serde(other)]
    Unsupported,
}

/// Convert one position, swapping to `(lat, lng)`.
pub fn to_latlng(pos: &[f64]) -> ScrollmapResult<LatLng> {
    match pos {
        [lng, lat, ..] => {
            let p = LatLng::from_lng_lat([*lng, *lat]);
            if p.is_finite() {
                Ok(p)
            } else {
                Err(ScrollmapError::validation("non-finite position"))
            }
        }
        _ => Err(ScrollmapError::validation(format!(
            "position needs at least 2 numbers, got {}",
            pos.len()
        ))),
    }
}

/// Convert a list of positions.
pub fn to_path(positions: &[Position]) -> ScrollmapResult<Vec<LatLng>> {
    positions.iter().map(|p| to_latlng(p)).collect()
}

impl Geometry {
    /// Point positions carried by point geometries; empty for other kinds.
    pub fn points(&self) -> ScrollmapResult<Vec<LatLng>> {
        match self {
            Self::Point { coordinates } => Ok(vec![to_latlng(coordinates)?]),
            Self::MultiPoint { coordinates } => to_path(coordinates),
            _ => Ok(Vec::new()),
        }
    }

    /// Line parts in source order; empty for non-line kinds.
    pub fn line_parts(&self) -> ScrollmapResult<Vec<Vec<LatLng>>> {
        match self {
            Self::LineString { coordinates } => Ok(vec![to_path(coordinates)?]),
            Self::MultiLineString { coordinates } => coordinates.iter().map(|l| to_path(l)).collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// Polygons as ring lists; empty for non-polygon kinds.
    pub fn polygons(&self) -> ScrollmapResult<Vec<Vec<Vec<LatLng>>>> {
        let rings = |poly: &Vec<Vec<Position>>| -> ScrollmapResult<Vec<Vec<LatLng>>> {
            poly.iter().map(|r| to_path(r)).collect()
        };
        match self {
            Self::Polygon { coordinates } => Ok(vec![rings(coordinates)?]),
            Self::MultiPolygon { coordinates } => coordinates.iter().map(rings).collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// Whether this is a point or multipoint geometry.
    pub fn is_point(&self) -> bool {
        matches!(self, Self::Point { .. } | Self::MultiPoint { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/geojson.rs"]
mod tests;
