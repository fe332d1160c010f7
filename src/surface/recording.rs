use std::collections::BTreeSet;

use crate::{
    foundation::core::{LatLng, MapView},
    surface::{MapSurface, MarkerPart, renderable::Renderable},
};

/// One primitive call observed by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SurfaceCall {
    /// `attach`.
    Attach {
        /// Surface id.
        id: String,
        /// Renderable kind tag.
        kind: String,
    },
    /// `detach` of an attached id.
    Detach {
        /// Surface id.
        id: String,
    },
    /// `set_style`.
    SetStyle {
        /// Surface id.
        id: String,
        /// Stroke opacity.
        opacity: f64,
        /// Fill opacity.
        fill_opacity: f64,
    },
    /// `set_marker_opacity`.
    SetMarkerOpacity {
        /// Surface id.
        id: String,
        /// Marker index.
        marker: usize,
        /// Targeted element.
        part: MarkerPart,
        /// Opacity.
        opacity: f64,
    },
    /// `set_path`, summarized as per-segment point counts.
    SetPath {
        /// Surface id.
        id: String,
        /// Points per revealed segment.
        segment_lengths: Vec<usize>,
    },
    /// `fly_to`.
    FlyTo {
        /// Target view.
        view: MapView,
    },
}

/// Surface that records every call in order and tracks attachment.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    attached: BTreeSet<String>,
}

impl RecordingSurface {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Drain recorded calls.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Ids currently attached.
    pub fn attached(&self) -> impl Iterator<Item = &str> {
        self.attached.iter().map(String::as_str)
    }

    /// Number of `attach` calls for `id`.
    pub fn attach_count(&self, id: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Attach { id: i, .. } if i == id))
            .count()
    }

    /// Number of `detach` calls for `id`.
    pub fn detach_count(&self, id: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Detach { id: i } if i == id))
            .count()
    }

    /// Whether any call touched `id`.
    pub fn touched(&self, id: &str) -> bool {
        self.calls.iter().any(|c| match c {
            SurfaceCall::Attach { id: i, .. }
            | SurfaceCall::Detach { id: i }
            | SurfaceCall::SetStyle { id: i, .. }
            | SurfaceCall::SetMarkerOpacity { id: i, .. }
            | SurfaceCall::SetPath { id: i, .. } => i == id,
            SurfaceCall::FlyTo { .. } => false,
        })
    }

    /// Most recent path written to `id`, as per-segment point counts.
    pub fn last_path(&self, id: &str) -> Option<&[usize]> {
        self.calls.iter().rev().find_map(|c| match c {
            SurfaceCall::SetPath {
                id: i,
                segment_lengths,
            } if i == id => Some(segment_lengths.as_slice()),
            _ => None,
        })
    }

    /// Most recent `(opacity, fill_opacity)` written to `id`.
    pub fn last_style(&self, id: &str) -> Option<(f64, f64)> {
        self.calls.iter().rev().find_map(|c| match c {
            SurfaceCall::SetStyle {
                id: i,
                opacity,
                fill_opacity,
            } if i == id => Some((*opacity, *fill_opacity)),
            _ => None,
        })
    }
}

impl MapSurface for RecordingSurface {
    fn attach(&mut self, id: &str, renderable: &Renderable) {
        self.attached.insert(id.to_string());
        self.calls.push(SurfaceCall::Attach {
            id: id.to_string(),
            kind: renderable.kind().to_string(),
        });
    }

    fn detach(&mut self, id: &str) {
        if self.attached.remove(id) {
            self.calls.push(SurfaceCall::Detach { id: id.to_string() });
        }
    }

    fn is_attached(&self, id: &str) -> bool {
        self.attached.contains(id)
    }

    fn set_style(&mut self, id: &str, opacity: f64, fill_opacity: f64) {
        self.calls.push(SurfaceCall::SetStyle {
            id: id.to_string(),
            opacity,
            fill_opacity,
        });
    }

    fn set_marker_opacity(&mut self, id: &str, marker: usize, part: MarkerPart, opacity: f64) {
        self.calls.push(SurfaceCall::SetMarkerOpacity {
            id: id.to_string(),
            marker,
            part,
            opacity,
        });
    }

    fn set_path(&mut self, id: &str, segments: &[&[LatLng]]) {
        self.calls.push(SurfaceCall::SetPath {
            id: id.to_string(),
            segment_lengths: segments.iter().map(|s| s.len()).collect(),
        });
    }

    fn fly_to(&mut self, view: &MapView) {
        self.calls.push(SurfaceCall::FlyTo { view: *view });
    }
}
