use crate::{
    foundation::core::Millis,
    foundation::error::ScrollmapResult,
    layers::{registry::LayerRegistry, source::SourceFetcher},
    narrative::story::StoryConfig,
    route::animator::RouteAnimator,
    surface::{FLOAT_IMAGE_ID, MapSurface, renderable::Renderable},
    visibility::orchestrator::VisibilityOrchestrator,
};

/// Scroll event delivered by whatever observes the reader's position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DriverEvent {
    /// A step became active.
    Enter {
        /// Event time.
        at: Millis,
        /// Step index.
        index: usize,
    },
    /// Scroll progress within a step.
    Progress {
        /// Event time.
        at: Millis,
        /// Step index.
        index: usize,
        /// Progress in `[0, 1]`.
        progress: f64,
    },
}

impl DriverEvent {
    /// Event time.
    pub fn at(&self) -> Millis {
        match self {
            Self::Enter { at, .. } | Self::Progress { at, .. } => *at,
        }
    }
}

/// A running narrative: owns the story, loaded layers, engine state and the map surface.
///
/// Timestamps passed to the event methods must be non-decreasing. Each call first runs any
/// fade or debounce work that fell due before it.
#[derive(Debug)]
pub struct Narrative<S> {
    story: StoryConfig,
    registry: LayerRegistry,
    orchestrator: VisibilityOrchestrator,
    animator: RouteAnimator,
    surface: S,
    active_step: Option<usize>,
}

impl<S: MapSurface> Narrative<S> {
    /// Wire an already loaded registry to a surface and fly to the initial view.
    pub fn new(story: StoryConfig, registry: LayerRegistry, mut surface: S) -> Self {
        if let Some(view) = story.initial_view.filter(|v| v.is_flyable()) {
            surface.fly_to(&view);
        }
        Self {
            orchestrator: VisibilityOrchestrator::new(story.settings.clone()),
            story,
            registry,
            animator: RouteAnimator::new(),
            surface,
            active_step: None,
        }
    }

    /// Validate `story`, load its layers through `fetcher` and build the narrative.
    #[tracing::instrument(skip_all, fields(layers = story.layers.len(), steps = story.steps.len()))]
    pub async fn load<F: SourceFetcher>(
        story: StoryConfig,
        fetcher: &F,
        surface: S,
    ) -> ScrollmapResult<Self> {
        story.validate()?;
        let registry =
            LayerRegistry::load_all(story.layers.clone(), fetcher, &story.settings).await;
        tracing::info!(
            loaded = registry.len(),
            failed = registry.failures().count(),
            "narrative ready"
        );
        Ok(Self::new(story, registry, surface))
    }

    /// Handle a step becoming active.
    pub fn on_step_enter(&mut self, now: Millis, index: usize) {
        self.advance_to(now);
        let Some(step) = self.story.steps.get(index) else {
            tracing::warn!(index, "ignoring enter for unknown step");
            return;
        };
        tracing::debug!(index, "step enter");
        self.active_step = Some(index);

        if let Some(view) = step.view() {
            self.surface.fly_to(&view);
        }

        self.surface.detach(FLOAT_IMAGE_ID);
        if let Some(img) = step.float_image.as_ref().and_then(|i| i.to_image()) {
            self.surface.attach(FLOAT_IMAGE_ID, &Renderable::Image(img));
        }

        self.orchestrator.request_visible(now, step.layers.as_ref());

        self.animator
            .enter_step(step.route_layer(), &self.registry, &mut self.surface);
        if !step.line_step
            && let Some(layer) = &step.line_layer
        {
            self.animator.reset(layer, &self.registry, &mut self.surface);
        }
    }

    /// Handle scroll progress within a step.
    pub fn on_step_progress(&mut self, now: Millis, index: usize, progress: f64) {
        self.advance_to(now);
        let Some(step) = self.story.steps.get(index) else {
            tracing::warn!(index, "ignoring progress for unknown step");
            return;
        };
        if let Some(layer) = step.route_layer() {
            self.animator
                .update(progress, layer, &self.registry, &mut self.surface);
        }
    }

    /// Route a [`DriverEvent`] to the matching handler.
    pub fn dispatch(&mut self, event: &DriverEvent) {
        match *event {
            DriverEvent::Enter { at, index } => self.on_step_enter(at, index),
            DriverEvent::Progress {
                at,
                index,
                progress,
            } => self.on_step_progress(at, index, progress),
        }
    }

    /// Run fades and reconciliations due at or before `now`.
    pub fn advance_to(&mut self, now: Millis) {
        self.orchestrator
            .advance_to(now, &self.registry, &mut self.surface);
    }

    /// Run all queued work to completion and return the time it finished.
    pub fn settle(&mut self) -> Millis {
        while let Some(due) = self.orchestrator.next_due() {
            self.advance_to(due);
        }
        self.orchestrator.now()
    }

    /// Index of the last entered step.
    pub fn active_step(&self) -> Option<usize> {
        self.active_step
    }

    /// Story being narrated.
    pub fn story(&self) -> &StoryConfig {
        &self.story
    }

    /// Loaded layers.
    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    /// Visibility engine state.
    pub fn orchestrator(&self) -> &VisibilityOrchestrator {
        &self.orchestrator
    }

    /// Route animator state.
    pub fn animator(&self) -> &RouteAnimator {
        &self.animator
    }

    /// Map surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable map surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Give the surface back.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narrative/driver.rs"]
mod tests;
