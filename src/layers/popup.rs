use std::{fmt, sync::Arc, sync::LazyLock};

use regex::Regex;
use serde_json::{Map, Value};

use crate::layers::definition::LayerDefinition;

/// Feature properties as parsed from GeoJSON.
pub type Properties = Map<String, Value>;

/// Content function registered in code.
pub type PopupFn = Arc<dyn Fn(&Properties, &LayerDefinition) -> Option<String> + Send + Sync>;

/// How a layer builds popup content for a feature.
///
/// In JSON a strategy is `"property"`, `"none"` or `{ "template": "..." }`. Content functions can
/// only be installed from code.
#[derive(Clone, Default, serde::Deserialize)]
#[serde(from = "PopupDef")]
pub enum PopupStrategy {
    /// Content function.
    Function(PopupFn),
    /// Template with `{property}` placeholders; missing properties become empty strings.
    Template(String),
    /// `popup` property, then `name` property.
    #[default]
    Property,
    /// Never bind a popup.
    None,
}

impl fmt::Debug for PopupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Self::Property => f.write_str("Property"),
            Self::None => f.write_str("None"),
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum PopupDef {
    Keyword(PopupKeyword),
    Template { template: String },
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum PopupKeyword {
    Property,
    None,
}

impl From<PopupDef> for PopupStrategy {
    fn from(value: PopupDef) -> Self {
        match value {
            PopupDef::Keyword(PopupKeyword::Property) => Self::Property,
            PopupDef::Keyword(PopupKeyword::None) => Self::None,
            PopupDef::Template { template } => Self::Template(template),
        }
    }
}

impl PopupStrategy {
    /// Wrap a content function.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Properties, &LayerDefinition) -> Option<String> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// Resolve popup content for one feature. Empty content means no popup.
    pub fn content(&self, props: &Properties, def: &LayerDefinition) -> Option<String> {
        let out = match self {
            Self::Function(f) => f(props, def),
            Self::Template(t) => Some(render_template(t, props)),
            Self::Property => property_text(props, "popup").or_else(|| property_text(props, "name")),
            Self::None => None,
        };
        out.filter(|s| !s.trim().is_empty())
    }
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([\w\-]+)\}").expect("placeholder pattern is valid"));

/// Substitute `{key}` placeholders with feature properties.
pub fn render_template(template: &str, props: &Properties) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            property_text(props, &caps[1]).unwrap_or_default()
        })
        .into_owned()
}

/// Display text of a scalar property. Null and missing are `None`.
pub fn property_text(props: &Properties, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/popup.rs"]
mod tests;
