//! SVG icon templates.
//!
//! An icon template is an SVG document with optional `{color}` and `{size}` tokens. Before use the
//! root element is rewritten so the graphic fills whatever box the marker gives it: intrinsic
//! `width`/`height`/`preserveAspectRatio` are dropped and replaced by `100%` sizing with
//! `xMidYMid meet`. Only the root `<svg>` tag is touched.

use std::sync::LazyLock;

use regex::Regex;

use crate::surface::renderable::format_px;

/// Color used when neither the feature, the icon nor the layer style picks one.
pub const FALLBACK_ICON_COLOR: &str = "#333";

const FILL_ATTRS: &str = r#"width="100%" height="100%" preserveAspectRatio="xMidYMid meet""#;

static SIZING_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s(width|height|preserveAspectRatio)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("sizing attribute pattern is valid")
});

static VIEWBOX_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\sviewBox\s*=").expect("viewBox pattern is valid"));

/// Rewritten icon template, ready for token substitution.
#[derive(Clone, Debug, PartialEq)]
pub struct IconTemplate {
    markup: String,
}

impl IconTemplate {
    /// Rewrite raw SVG text. Returns `None` when there is no `<svg` root element.
    pub fn parse(raw: &str) -> Option<Self> {
        let start = raw.find("<svg")?;
        let body = &raw[start..];
        let tag_end = body.find('>')?;
        let (tag, rest) = body.split_at(tag_end);
        let attrs = &tag["<svg".len()..];

        let mut width = None;
        let mut height = None;
        for caps in SIZING_ATTR.captures_iter(attrs) {
            let value = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str());
            match &caps[1] {
                "width" => width = value.and_then(parse_length),
                "height" => height = value.and_then(parse_length),
                _ => {}
            }
        }
        let mut kept = SIZING_ATTR.replace_all(attrs, "").into_owned();
        let kept_trimmed = kept.trim_end().len();
        let self_closing = kept[..kept_trimmed].ends_with('/');
        kept.truncate(kept_trimmed);
        if self_closing {
            kept.pop();
        }

        let mut root = String::from("<svg ");
        root.push_str(FILL_ATTRS);
        if !VIEWBOX_ATTR.is_match(&kept)
            && let (Some(w), Some(h)) = (width, height)
        {
            root.push_str(&format!(r#" viewBox="0 0 {} {}""#, format_px(w), format_px(h)));
        }
        root.push_str(&kept);
        if self_closing {
            root.push('/');
        }

        let mut markup = root;
        markup.push_str(rest);
        Some(Self { markup })
    }

    /// Rewritten markup with tokens still in place.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Substitute `{color}` and `{size}`.
    pub fn render(&self, color: &str, size: f64) -> String {
        self.markup
            .replace("{color}", color)
            .replace("{size}", &format_px(size))
    }

    /// Substitute tokens and pin the root to an explicit pixel size.
    pub fn render_sized(&self, color: &str, size: f64) -> String {
        let px = format_px(size);
        self.render(color, size).replacen(
            r#"width="100%" height="100%""#,
            &format!(r#"width="{px}" height="{px}""#),
            1,
        )
    }

    /// Check that the template yields a parseable SVG tree.
    pub fn validate(&self, size: f64) -> Result<(), usvg::Error> {
        let sized = self.render_sized(FALLBACK_ICON_COLOR, size);
        usvg::Tree::from_str(&sized, &usvg::Options::default()).map(|_| ())
    }
}

fn parse_length(v: &str) -> Option<f64> {
    let v = v.trim().trim_end_matches("px");
    v.parse::<f64>().ok().filter(|n| n.is_finite() && *n > 0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/layers/icon.rs"]
mod tests;
