use crate::{
    animation::ease::Ease,
    foundation::core::Millis,
    foundation::error::{ScrollmapError, ScrollmapResult},
};

/// Engine tuning knobs loaded from the `settings` block of a story.
///
/// Every field has a default, so an absent or partial block is valid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Window in which visibility requests collapse into one reconciliation.
    pub debounce_ms: Millis,
    /// Fade-in duration.
    pub show_ms: Millis,
    /// Fade-out duration.
    pub hide_ms: Millis,
    /// Number of discrete steps per fade.
    pub fade_steps: u32,
    /// Delay after a fade-out completes before the layer is detached.
    pub detach_buffer_ms: Millis,
    /// Curve applied to fade steps.
    pub fade_ease: Ease,
    /// Maximum spacing in meters between densified line points.
    pub densify_target_m: f64,
    /// Icon size in pixels when a layer does not declare one.
    pub default_icon_size: f64,
    /// Maximum popup width in pixels.
    pub popup_max_width: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            debounce_ms: Millis(30),
            show_ms: Millis(350),
            hide_ms: Millis(250),
            fade_steps: 20,
            detach_buffer_ms: Millis(30),
            fade_ease: Ease::Linear,
            densify_target_m: 2.0,
            default_icon_size: 32.0,
            popup_max_width: 300,
        }
    }
}

impl EngineSettings {
    /// Reject settings that would make fades or densification degenerate.
    pub fn validate(&self) -> ScrollmapResult<()> {
        if self.fade_steps == 0 {
            return Err(ScrollmapError::validation("settings.fade_steps must be > 0"));
        }
        if !self.densify_target_m.is_finite() || self.densify_target_m <= 0.0 {
            return Err(ScrollmapError::validation(
                "settings.densify_target_m must be finite and > 0",
            ));
        }
        if !self.default_icon_size.is_finite() || self.default_icon_size <= 0.0 {
            return Err(ScrollmapError::validation(
                "settings.default_icon_size must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/settings.rs"]
mod tests;
