/// Convenience result type used across scrollmap.
pub type ScrollmapResult<T> = Result<T, ScrollmapError>;

/// Top-level error taxonomy used by engine APIs.
///
/// None of these are fatal to a running narrative: load failures disable a single layer, missing
/// assets trigger a fallback rendering path and unknown layers are ignored by the orchestrator.
#[derive(thiserror::Error, Debug)]
pub enum ScrollmapError {
    /// A layer source could not be fetched or parsed. The layer stays unavailable for the session.
    #[error("load failure for layer '{layer}': {reason}")]
    LoadFailure {
        /// Layer name.
        layer: String,
        /// Human-readable cause.
        reason: String,
    },

    /// An optional asset (icon template) was absent or unusable.
    #[error("asset missing for layer '{layer}': {asset}")]
    AssetMissing {
        /// Layer name.
        layer: String,
        /// Asset location that could not be used.
        asset: String,
    },

    /// A layer name has no definition or never loaded.
    #[error("unknown layer requested: '{0}'")]
    UnknownLayer(String),

    /// Invalid user-provided story or layer data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollmapError {
    /// Build a [`ScrollmapError::LoadFailure`] value.
    pub fn load_failure(layer: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::LoadFailure {
            layer: layer.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`ScrollmapError::AssetMissing`] value.
    pub fn asset_missing(layer: impl Into<String>, asset: impl Into<String>) -> Self {
        Self::AssetMissing {
            layer: layer.into(),
            asset: asset.into(),
        }
    }

    /// Build a [`ScrollmapError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollmapError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
