use std::collections::BTreeMap;

use crate::{
    foundation::core::LatLng,
    foundation::error::{ScrollmapError, ScrollmapResult},
    foundation::settings::EngineSettings,
    geometry::densify::densify,
    layers::{
        definition::{IconSpec, LayerDefinition},
        geojson::{Feature, GeoJson},
        icon::{FALLBACK_ICON_COLOR, IconTemplate},
        popup::property_text,
        source::SourceFetcher,
    },
    surface::renderable::{
        IconMarkup, Marker, MarkerCollection, Popup, Renderable, Shape, ShapeCollection,
        ShapeFeature, ShapeStyle,
    },
};

/// Ordered, densified `(lat, lng)` points of one line part.
pub type LineSegment = Vec<LatLng>;

const DEFAULT_SHAPE_COLOR: &str = "#3388ff";
const DEFAULT_SHAPE_WEIGHT: f64 = 3.0;
const DEFAULT_FILL_OPACITY: f64 = 0.5;
const DEFAULT_ROUTE_COLOR: &str = "#d62728";
const DEFAULT_ROUTE_WEIGHT: f64 = 5.0;
const DEFAULT_CIRCLE_FILL: &str = "#3f0303";

/// Line data cached for the route-draw animator.
#[derive(Clone, Debug, PartialEq)]
pub struct LineGeometry {
    /// Segments in source order, never merged or reordered.
    pub segments: Vec<LineSegment>,
    /// Style of the animated path.
    pub style: ShapeStyle,
}

impl LineGeometry {
    /// Total point count across all segments.
    pub fn total_points(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }
}

/// Live state of a layer that loaded successfully.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedLayer {
    /// Layer name.
    pub name: String,
    /// What to attach when the layer is shown.
    pub renderable: Renderable,
    /// Route data for line layers.
    pub line: Option<LineGeometry>,
    /// Effective draw speed divisor.
    pub draw_speed: f64,
}

/// Owns layer definitions and everything loaded from them.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    definitions: Vec<LayerDefinition>,
    loaded: BTreeMap<String, LoadedLayer>,
    failures: BTreeMap<String, String>,
}

impl LayerRegistry {
    /// Load every definition concurrently.
    ///
    /// A layer whose source cannot be fetched or parsed is logged and left out; it never
    /// affects the others. Icons are best-effort and fall back to an external reference.
    #[tracing::instrument(skip_all, fields(layers = defs.len()))]
    pub async fn load_all<F: SourceFetcher>(
        defs: Vec<LayerDefinition>,
        fetcher: &F,
        settings: &EngineSettings,
    ) -> Self {
        let results =
            futures::future::join_all(defs.iter().map(|def| load_layer(def, fetcher, settings)))
                .await;

        let mut loaded = BTreeMap::new();
        let mut failures = BTreeMap::new();
        for (def, result) in defs.iter().zip(results) {
            match result {
                Ok(layer) => {
                    tracing::info!(layer = %def.name, "loaded layer");
                    loaded.insert(def.name.clone(), layer);
                }
                Err(e) => {
                    tracing::error!(layer = %def.name, error = %e, "layer unavailable");
                    failures.insert(def.name.clone(), e.to_string());
                }
            }
        }

        Self {
            definitions: defs,
            loaded,
            failures,
        }
    }

    /// Loaded layer by name.
    pub fn get(&self, name: &str) -> Option<&LoadedLayer> {
        self.loaded.get(name)
    }

    /// Loaded layer by name, or [`ScrollmapError::UnknownLayer`].
    pub fn require(&self, name: &str) -> ScrollmapResult<&LoadedLayer> {
        self.get(name)
            .ok_or_else(|| ScrollmapError::UnknownLayer(name.to_string()))
    }

    /// Declaration by name, loaded or not.
    pub fn definition(&self, name: &str) -> Option<&LayerDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// All declarations in declaration order.
    pub fn definitions(&self) -> &[LayerDefinition] {
        &self.definitions
    }

    /// Names of loaded layers that carry route data.
    pub fn line_layers(&self) -> impl Iterator<Item = &str> {
        self.loaded
            .values()
            .filter(|l| l.line.is_some())
            .map(|l| l.name.as_str())
    }

    /// Names and reasons of layers that failed to load.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.failures.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of loaded layers.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Whether no layer loaded.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

async fn load_layer<F: SourceFetcher>(
    def: &LayerDefinition,
    fetcher: &F,
    settings: &EngineSettings,
) -> ScrollmapResult<LoadedLayer> {
    let icon = async {
        match &def.icon {
            Some(icon_spec) => Some(load_icon(def, icon_spec, fetcher, settings).await),
            None => None,
        }
    };
    let (source, icon) = futures::join!(fetcher.fetch(&def.source), icon);

    let bytes = source.map_err(|e| ScrollmapError::load_failure(&def.name, e))?;
    let features =
        GeoJson::parse_features(&bytes).map_err(|e| ScrollmapError::load_failure(&def.name, e))?;

    let template = match icon {
        Some(Ok(t)) => Some(t),
        Some(Err(e)) => {
            tracing::warn!(layer = %def.name, error = %e, "icon unusable, using external reference");
            None
        }
        None => None,
    };

    build_layer(def, &features, template.as_ref(), fetcher, settings)
        .map_err(|e| ScrollmapError::load_failure(&def.name, e))
}

async fn load_icon<F: SourceFetcher>(
    def: &LayerDefinition,
    icon_spec: &IconSpec,
    fetcher: &F,
    settings: &EngineSettings,
) -> ScrollmapResult<IconTemplate> {
    let missing = || ScrollmapError::asset_missing(&def.name, &icon_spec.source);
    let bytes = fetcher.fetch(&icon_spec.source).await.map_err(|_| missing())?;
    let text = String::from_utf8(bytes).map_err(|_| missing())?;
    let template = IconTemplate::parse(&text).ok_or_else(missing)?;
    template
        .validate(icon_spec.size.unwrap_or(settings.default_icon_size))
        .map_err(|_| missing())?;
    Ok(template)
}

fn build_layer<F: SourceFetcher>(
    def: &LayerDefinition,
    features: &[Feature],
    template: Option<&IconTemplate>,
    fetcher: &F,
    settings: &EngineSettings,
) -> ScrollmapResult<LoadedLayer> {
    let renderable = match &def.icon {
        Some(icon_spec) => Renderable::Markers(build_markers(
            def, icon_spec, features, template, fetcher, settings,
        )?),
        None => Renderable::Shapes(build_shapes(def, features, settings)?),
    };

    let line = if def.line {
        let mut segments = Vec::new();
        for g in features.iter().filter_map(|f| f.geometry.as_ref()) {
            for part in g.line_parts()? {
                segments.push(densify(&part, settings.densify_target_m));
            }
        }
        if segments.is_empty() {
            tracing::warn!(layer = %def.name, "line layer has no line geometry");
        }
        Some(LineGeometry {
            segments,
            style: route_style(def),
        })
    } else {
        None
    };

    Ok(LoadedLayer {
        name: def.name.clone(),
        renderable,
        line,
        draw_speed: def.speed_divisor(),
    })
}

/// Resolved vector style with engine defaults.
pub fn shape_style(def: &LayerDefinition) -> ShapeStyle {
    ShapeStyle {
        color: def
            .style
            .color
            .clone()
            .unwrap_or_else(|| DEFAULT_SHAPE_COLOR.to_string()),
        weight: def.style.weight.unwrap_or(DEFAULT_SHAPE_WEIGHT),
        opacity: def.style.opacity.unwrap_or(1.0),
        fill_opacity: def.style.fill_opacity.unwrap_or(DEFAULT_FILL_OPACITY),
    }
}

/// Style of the animated route path.
pub fn route_style(def: &LayerDefinition) -> ShapeStyle {
    ShapeStyle {
        color: def
            .style
            .color
            .clone()
            .unwrap_or_else(|| DEFAULT_ROUTE_COLOR.to_string()),
        weight: def.style.weight.unwrap_or(DEFAULT_ROUTE_WEIGHT),
        opacity: def.style.opacity.unwrap_or(1.0),
        fill_opacity: 0.0,
    }
}

fn popup_for(def: &LayerDefinition, feature: &Feature, settings: &EngineSettings) -> Option<Popup> {
    def.popup.content(&feature.properties, def).map(|content| Popup {
        content,
        max_width: settings.popup_max_width,
    })
}

fn build_shapes(
    def: &LayerDefinition,
    features: &[Feature],
    settings: &EngineSettings,
) -> ScrollmapResult<ShapeCollection> {
    let mut out = Vec::new();
    for feature in features {
        push_shape_features(&mut out, def, feature, settings)?;
    }
    Ok(ShapeCollection {
        style: shape_style(def),
        features: out,
    })
}

fn push_shape_features(
    out: &mut Vec<ShapeFeature>,
    def: &LayerDefinition,
    feature: &Feature,
    settings: &EngineSettings,
) -> ScrollmapResult<()> {
    let Some(geometry) = &feature.geometry else {
        tracing::debug!(layer = %def.name, "skipping feature without geometry");
        return Ok(());
    };
    let point_style = def.point_style.clone().unwrap_or_default();
    let circle_fill = def
        .style
        .color
        .clone()
        .unwrap_or_else(|| DEFAULT_CIRCLE_FILL.to_string());
    let popup = popup_for(def, feature, settings);

    let mut shapes = Vec::new();
    for center in geometry.points()? {
        shapes.push(Shape::Circle {
            center,
            radius: point_style.radius,
            fill_color: circle_fill.clone(),
            stroke_color: point_style.stroke_color.clone(),
            weight: point_style.weight,
        });
    }
    let parts = geometry.line_parts()?;
    if !parts.is_empty() {
        shapes.push(Shape::Polyline { parts });
    }
    for rings in geometry.polygons()? {
        shapes.push(Shape::Polygon { rings });
    }
    if shapes.is_empty() {
        tracing::debug!(layer = %def.name, "skipping unsupported geometry");
    }

    out.extend(shapes.into_iter().map(|shape| ShapeFeature {
        shape,
        popup: popup.clone(),
    }));
    Ok(())
}

fn build_markers<F: SourceFetcher>(
    def: &LayerDefinition,
    icon_spec: &IconSpec,
    features: &[Feature],
    template: Option<&IconTemplate>,
    fetcher: &F,
    settings: &EngineSettings,
) -> ScrollmapResult<MarkerCollection> {
    let size = icon_spec.size.unwrap_or(settings.default_icon_size);
    let layer_color = icon_spec
        .color
        .as_deref()
        .or(def.style.color.as_deref())
        .unwrap_or(FALLBACK_ICON_COLOR);

    let mut markers = Vec::new();
    let mut shapes = Vec::new();
    for feature in features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        if !geometry.is_point() {
            push_shape_features(&mut shapes, def, feature, settings)?;
            continue;
        }

        let icon = match template {
            Some(t) => {
                let color = property_text(&feature.properties, "svgColor")
                    .unwrap_or_else(|| layer_color.to_string());
                IconMarkup::Inline {
                    svg: t.render(&color, size),
                }
            }
            None => IconMarkup::External {
                url: fetcher.external_url(&icon_spec.source),
            },
        };
        let popup = popup_for(def, feature, settings);

        for position in geometry.points()? {
            markers.push(Marker {
                position,
                icon: icon.clone(),
                size,
                anchor: ((size / 2.0).round(), (size / 2.0).round()),
                label: icon_spec.label.clone(),
                popup: popup.clone(),
            });
        }
    }

    let shapes = (!shapes.is_empty()).then(|| ShapeCollection {
        style: shape_style(def),
        features: shapes,
    });
    Ok(MarkerCollection { markers, shapes })
}

#[cfg(test)]
#[path = "../../tests/unit/layers/registry.rs"]
mod tests;
