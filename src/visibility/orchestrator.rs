use std::collections::{BTreeSet, HashMap};

use crate::{
    animation::timeline::{TaskHandle, Timeline},
    animation::tween::{Lerp, Tween},
    foundation::core::Millis,
    foundation::settings::EngineSettings,
    layers::registry::{LayerRegistry, LoadedLayer},
    surface::{
        MapSurface, MarkerPart,
        renderable::{MarkerCollection, Renderable},
    },
    visibility::request::LayerRequest,
};

/// Stroke and fill opacity of a layer at one point of a fade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeLevels {
    /// Stroke opacity, also applied to the markers of icon layers.
    pub opacity: f64,
    /// Fill opacity.
    pub fill_opacity: f64,
}

impl FadeLevels {
    /// Fully transparent.
    pub const ZERO: Self = Self {
        opacity: 0.0,
        fill_opacity: 0.0,
    };

    /// Levels from explicit values.
    pub const fn new(opacity: f64, fill_opacity: f64) -> Self {
        Self {
            opacity,
            fill_opacity,
        }
    }

    /// Fade-in target of a loaded layer.
    pub fn target_of(layer: &LoadedLayer) -> Self {
        match &layer.renderable {
            Renderable::Shapes(c)
            | Renderable::Markers(MarkerCollection {
                shapes: Some(c), ..
            }) => Self::new(c.style.opacity, c.style.fill_opacity),
            _ => Self::new(1.0, 1.0),
        }
    }
}

impl Lerp for FadeLevels {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            opacity: f64::lerp(&a.opacity, &b.opacity, t),
            fill_opacity: f64::lerp(&a.fill_opacity, &b.fill_opacity, t),
        }
    }
}

/// Work queued on the orchestrator's timeline.
#[derive(Clone, Debug, PartialEq)]
pub enum VisibilityTask {
    /// Debounced reconciliation against the requested names.
    Reconcile(BTreeSet<String>),
    /// One fade step.
    Apply {
        /// Layer name.
        layer: String,
        /// Levels to write.
        levels: FadeLevels,
    },
    /// Remove a faded-out layer from the surface.
    Detach {
        /// Layer name.
        layer: String,
    },
}

/// Currently visible layer names plus the pending debounced reconciliation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibilityState {
    /// Layers considered visible (fading in or fully shown).
    pub visible: BTreeSet<String>,
    /// Reconciliation waiting for the debounce window to close.
    pub pending: Option<TaskHandle>,
}

#[derive(Debug)]
struct LayerAnimation {
    tasks: Vec<TaskHandle>,
    levels: FadeLevels,
}

impl Default for LayerAnimation {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            levels: FadeLevels::ZERO,
        }
    }
}

/// Diffs requested layer sets against the visible set and cross-fades the difference.
///
/// Requests are debounced: each one replaces the pending reconciliation, so a burst collapses
/// into a single settle on the last request. Every layer has at most one fade chain; starting a
/// show or hide cancels whatever that layer had queued.
#[derive(Debug)]
pub struct VisibilityOrchestrator {
    settings: EngineSettings,
    timeline: Timeline<VisibilityTask>,
    state: VisibilityState,
    layers: HashMap<String, LayerAnimation>,
}

impl VisibilityOrchestrator {
    /// Idle orchestrator with nothing visible.
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            timeline: Timeline::new(),
            state: VisibilityState::default(),
            layers: HashMap::new(),
        }
    }

    /// Ask for exactly `request` to be visible once the debounce window closes.
    ///
    /// `None` or an empty request hides everything. Call [`Self::advance_to`] with `now` first so
    /// earlier work is not reordered behind this request.
    pub fn request_visible(&mut self, now: Millis, request: Option<&LayerRequest>) {
        if let Some(pending) = self.state.pending.take() {
            self.timeline.cancel(pending);
            tracing::debug!("superseded pending visibility request");
        }
        let names = request.map(LayerRequest::names).unwrap_or_default();
        let due = now.max(self.timeline.now()).after(self.settings.debounce_ms);
        self.state.pending = Some(self.timeline.schedule_at(due, VisibilityTask::Reconcile(names)));
    }

    /// Run every task due at or before `now`, in time order.
    pub fn advance_to(&mut self, now: Millis, registry: &LayerRegistry, surface: &mut dyn MapSurface) {
        while let Some((handle, task)) = self.timeline.pop_due(now) {
            match task {
                VisibilityTask::Reconcile(names) => {
                    self.state.pending = None;
                    self.reconcile(names, registry, surface);
                }
                VisibilityTask::Apply { layer, levels } => {
                    if let Some(anim) = self.layers.get_mut(&layer) {
                        anim.tasks.retain(|h| *h != handle);
                        anim.levels = levels;
                    }
                    if let Some(loaded) = registry.get(&layer) {
                        write_levels(surface, loaded, levels);
                    }
                }
                VisibilityTask::Detach { layer } => {
                    if let Some(anim) = self.layers.get_mut(&layer) {
                        anim.tasks.retain(|h| *h != handle);
                        anim.levels = FadeLevels::ZERO;
                    }
                    surface.detach(&layer);
                    tracing::debug!(layer = %layer, "detached hidden layer");
                }
            }
        }
        self.timeline.settle(now);
    }

    /// Whether no reconciliation or fade step is queued.
    pub fn is_settled(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Due time of the next queued task.
    pub fn next_due(&self) -> Option<Millis> {
        self.timeline.next_due()
    }

    /// Layers currently considered visible.
    pub fn visible(&self) -> &BTreeSet<String> {
        &self.state.visible
    }

    /// Visible set plus pending request handle.
    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    /// Last levels written for a layer.
    pub fn levels(&self, layer: &str) -> Option<FadeLevels> {
        self.layers.get(layer).map(|a| a.levels)
    }

    /// Orchestrator clock.
    pub fn now(&self) -> Millis {
        self.timeline.now()
    }

    #[tracing::instrument(skip_all, fields(at = self.timeline.now().0))]
    fn reconcile(
        &mut self,
        requested: BTreeSet<String>,
        registry: &LayerRegistry,
        surface: &mut dyn MapSurface,
    ) {
        let mut wanted = BTreeSet::new();
        for name in requested {
            match registry.require(&name) {
                Ok(_) => {
                    wanted.insert(name);
                }
                Err(e) => tracing::debug!(error = %e, "ignoring layer"),
            }
        }

        let to_show: Vec<String> = wanted.difference(&self.state.visible).cloned().collect();
        let to_hide: Vec<String> = self.state.visible.difference(&wanted).cloned().collect();
        if to_show.is_empty() && to_hide.is_empty() {
            tracing::debug!("requested set already visible");
            return;
        }
        tracing::debug!(show = ?to_show, hide = ?to_hide, "reconciling visible layers");

        for name in &to_show {
            if let Some(layer) = registry.get(name) {
                self.show(layer, surface);
            }
        }
        for name in &to_hide {
            self.hide(name, surface);
        }
        self.state.visible = wanted;
    }

    fn show(&mut self, layer: &LoadedLayer, surface: &mut dyn MapSurface) {
        self.cancel_chain(&layer.name);
        let from = if surface.is_attached(&layer.name) {
            self.levels(&layer.name).unwrap_or(FadeLevels::ZERO)
        } else {
            write_levels(surface, layer, FadeLevels::ZERO);
            surface.attach(&layer.name, &layer.renderable);
            FadeLevels::ZERO
        };
        self.layers.entry(layer.name.clone()).or_default().levels = from;

        let target = FadeLevels::target_of(layer);
        self.schedule_fade(&layer.name, from, target, self.settings.show_ms);
    }

    fn hide(&mut self, name: &str, surface: &mut dyn MapSurface) {
        self.cancel_chain(name);
        if !surface.is_attached(name) {
            return;
        }
        let from = self.levels(name).unwrap_or(FadeLevels::ZERO);
        self.schedule_fade(name, from, FadeLevels::ZERO, self.settings.hide_ms);

        let delay = self.settings.hide_ms.after(self.settings.detach_buffer_ms);
        let handle = self.timeline.schedule_in(
            delay,
            VisibilityTask::Detach {
                layer: name.to_string(),
            },
        );
        self.layers.entry(name.to_string()).or_default().tasks.push(handle);
    }

    fn schedule_fade(&mut self, name: &str, from: FadeLevels, to: FadeLevels, duration: Millis) {
        let tween = Tween {
            from,
            to,
            duration,
            steps: self.settings.fade_steps.max(1),
            ease: self.settings.fade_ease,
        };
        let mut handles = Vec::with_capacity(tween.steps as usize);
        for sample in tween.samples() {
            handles.push(self.timeline.schedule_in(
                sample.offset,
                VisibilityTask::Apply {
                    layer: name.to_string(),
                    levels: sample.value,
                },
            ));
        }
        self.layers
            .entry(name.to_string())
            .or_default()
            .tasks
            .extend(handles);
    }

    fn cancel_chain(&mut self, name: &str) {
        if let Some(anim) = self.layers.get_mut(name) {
            for handle in anim.tasks.drain(..) {
                self.timeline.cancel(handle);
            }
        }
    }
}

fn write_levels(surface: &mut dyn MapSurface, layer: &LoadedLayer, levels: FadeLevels) {
    match &layer.renderable {
        Renderable::Shapes(_) => surface.set_style(&layer.name, levels.opacity, levels.fill_opacity),
        Renderable::Markers(c) => {
            if c.shapes.is_some() {
                surface.set_style(&layer.name, levels.opacity, levels.fill_opacity);
            }
            for i in 0..c.markers.len() {
                surface.set_marker_opacity(&layer.name, i, MarkerPart::Icon, levels.opacity);
                surface.set_marker_opacity(&layer.name, i, MarkerPart::Graphic, levels.opacity);
            }
        }
        Renderable::Route(_) | Renderable::Image(_) => {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visibility/orchestrator.rs"]
mod tests;
