//! Rasterize a [`SceneSurface`] into an RGBA image.
//!
//! The scene is first written out as an SVG document in viewport pixel space (shapes and
//! routes through `kurbo` paths, markers as nested `<svg>` or `<image>` elements) and then
//! rendered with `usvg`/`resvg`. Only what the engine attaches is drawn; there are no tiles.

use std::{fmt::Write as _, path::PathBuf, sync::Arc};

use anyhow::Context;
use kurbo::BezPath;

use crate::{
    foundation::core::{LatLng, Rgba8},
    foundation::error::{ScrollmapError, ScrollmapResult},
    surface::{
        projection::Viewport,
        renderable::{
            FloatingImage, IconMarkup, MarkerCollection, Renderable, RoutePath, Shape,
            ShapeCollection, format_px,
        },
        scene::{LiveStyle, SceneSurface},
    },
};

/// Output parameters for [`render_snapshot`].
#[derive(Clone, Debug)]
pub struct SnapshotOpts {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Background fill.
    pub background: Rgba8,
    /// Directory that relative image and icon references resolve against.
    pub resources_dir: Option<PathBuf>,
}

impl Default for SnapshotOpts {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Rgba8 {
                r: 242,
                g: 239,
                b: 233,
                a: 255,
            },
            resources_dir: None,
        }
    }
}

/// SVG document of the scene as seen through its current view.
pub fn scene_svg(scene: &SceneSurface, opts: &SnapshotOpts) -> ScrollmapResult<String> {
    if opts.width == 0 || opts.height == 0 {
        return Err(ScrollmapError::validation("snapshot width/height must be > 0"));
    }
    let view = scene
        .view()
        .ok_or_else(|| ScrollmapError::validation("scene has no view to render"))?;
    let vp = Viewport::new(view, opts.width, opts.height);

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = opts.width,
        h = opts.height,
    );
    for (id, renderable) in scene.attached() {
        let style = scene.style(id);
        match renderable {
            Renderable::Shapes(c) => write_shapes(&mut out, &vp, c, &style),
            Renderable::Markers(c) => write_markers(&mut out, &vp, c, &style),
            Renderable::Route(r) => write_route(&mut out, &vp, r, scene.path(id)),
            Renderable::Image(img) => write_image(&mut out, &vp, img),
        }
    }
    out.push_str("</svg>");
    Ok(out)
}

/// Render the scene to straight-alpha RGBA8.
#[tracing::instrument(skip_all, fields(width = opts.width, height = opts.height))]
pub fn render_snapshot(scene: &SceneSurface, opts: &SnapshotOpts) -> ScrollmapResult<image::RgbaImage> {
    let svg = scene_svg(scene, opts)?;

    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let usvg_opts = usvg::Options {
        resources_dir: opts.resources_dir.clone(),
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&svg, &usvg_opts).context("parse scene svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(opts.width, opts.height)
        .ok_or_else(|| ScrollmapError::validation("failed to allocate snapshot pixmap"))?;
    let bg = opts.background;
    pixmap.fill(resvg::tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
    resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image::RgbaImage::from_raw(opts.width, opts.height, data)
        .ok_or_else(|| ScrollmapError::validation("snapshot buffer size mismatch"))
}

fn write_shapes(out: &mut String, vp: &Viewport, c: &ShapeCollection, live: &LiveStyle) {
    let (opacity, fill) = live
        .opacity
        .unwrap_or((c.style.opacity, c.style.fill_opacity));
    let color = escape_attr(&c.style.color);
    let weight = format_px(c.style.weight);

    out.push_str("<g>");
    for feature in &c.features {
        match &feature.shape {
            Shape::Polygon { rings } => {
                let d = path_data(vp, rings.iter().map(Vec::as_slice), true);
                let _ = write!(
                    out,
                    r#"<path d="{d}" fill="{color}" fill-opacity="{fill}" fill-rule="evenodd" stroke="{color}" stroke-width="{weight}" stroke-opacity="{opacity}" stroke-linejoin="round"/>"#
                );
            }
            Shape::Polyline { parts } => {
                let d = path_data(vp, parts.iter().map(Vec::as_slice), false);
                let _ = write!(
                    out,
                    r#"<path d="{d}" fill="none" stroke="{color}" stroke-width="{weight}" stroke-opacity="{opacity}" stroke-linecap="round" stroke-linejoin="round"/>"#
                );
            }
            Shape::Circle {
                center,
                radius,
                fill_color,
                stroke_color,
                weight,
            } => {
                let p = vp.project(*center);
                let _ = write!(
                    out,
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{}" fill-opacity="{fill}" stroke="{}" stroke-width="{}" stroke-opacity="{opacity}"/>"#,
                    p.x,
                    p.y,
                    format_px(*radius),
                    escape_attr(fill_color),
                    escape_attr(stroke_color),
                    format_px(*weight),
                );
            }
        }
    }
    out.push_str("</g>");
}

fn write_markers(out: &mut String, vp: &Viewport, c: &MarkerCollection, live: &LiveStyle) {
    if let Some(shapes) = &c.shapes {
        write_shapes(out, vp, shapes, live);
    }
    for (i, marker) in c.markers.iter().enumerate() {
        let opacity = live.marker_opacity(i);
        let p = vp.project(marker.position);
        let x = p.x - marker.anchor.0;
        let y = p.y - marker.anchor.1;
        let size = format_px(marker.size);

        let _ = write!(out, r#"<g opacity="{opacity}">"#);
        match &marker.icon {
            IconMarkup::Inline { svg } => {
                out.push_str(&svg.replacen(
                    r#"width="100%" height="100%""#,
                    &format!(r#"x="{x}" y="{y}" width="{size}" height="{size}""#),
                    1,
                ));
            }
            IconMarkup::External { url } => {
                let _ = write!(
                    out,
                    r#"<image x="{x}" y="{y}" width="{size}" height="{size}" xlink:href="{}"/>"#,
                    escape_attr(url)
                );
            }
        }
        if let Some(label) = &marker.label {
            let _ = write!(
                out,
                r##"<text x="{}" y="{}" font-family="sans-serif" font-size="12" text-anchor="middle" fill="#222">{}</text>"##,
                p.x,
                y + marker.size + 12.0,
                escape_attr(label)
            );
        }
        out.push_str("</g>");
    }
}

fn write_route(out: &mut String, vp: &Viewport, r: &RoutePath, segments: &[Vec<LatLng>]) {
    let d = path_data(vp, segments.iter().map(Vec::as_slice), false);
    if d.is_empty() {
        return;
    }
    let _ = write!(
        out,
        r#"<path d="{d}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
        escape_attr(&r.style.color),
        format_px(r.style.weight),
        r.style.opacity,
    );
}

fn write_image(out: &mut String, vp: &Viewport, img: &FloatingImage) {
    let p = vp.project(img.position);
    let _ = write!(
        out,
        r#"<image x="{}" y="{}" width="{}" height="{}" xlink:href="{}"/>"#,
        p.x - img.width / 2.0,
        p.y - img.height / 2.0,
        format_px(img.width),
        format_px(img.height),
        escape_attr(&img.url)
    );
}

fn path_data<'a>(vp: &Viewport, parts: impl Iterator<Item = &'a [LatLng]>, close: bool) -> String {
    let mut path = BezPath::new();
    for part in parts {
        let mut points = part.iter().map(|p| vp.project(*p));
        let Some(first) = points.next() else {
            continue;
        };
        path.move_to(first);
        for p in points {
            path.line_to(p);
        }
        if close {
            path.close_path();
        }
    }
    if path.elements().is_empty() {
        String::new()
    } else {
        path.to_svg()
    }
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/surface/snapshot.rs"]
mod tests;
