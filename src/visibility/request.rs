use std::collections::BTreeSet;

/// Layer names requested for a step, as written in a story.
///
/// Accepts either a comma-separated string (`"boundary, church"`) or an array of names.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum LayerRequest {
    /// Array form.
    List(Vec<String>),
    /// Comma-separated form.
    Csv(String),
}

impl LayerRequest {
    /// Trimmed, non-empty names as a set.
    pub fn names(&self) -> BTreeSet<String> {
        let clean = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        match self {
            Self::List(items) => items.iter().filter_map(|s| clean(s)).collect(),
            Self::Csv(s) => s.split(',').filter_map(clean).collect(),
        }
    }
}

impl From<&str> for LayerRequest {
    fn from(value: &str) -> Self {
        Self::Csv(value.to_string())
    }
}

impl<S: Into<String>> FromIterator<S> for LayerRequest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visibility/request.rs"]
mod tests;
