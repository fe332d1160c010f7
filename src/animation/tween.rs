use crate::{
    animation::ease::Ease,
    foundation::core::Millis,
    foundation::error::{ScrollmapError, ScrollmapResult},
};

/// Values that can be linearly interpolated by a [`Tween`].
pub trait Lerp: Sized {
    /// Interpolate from `a` (t=0) to `b` (t=1).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// One scheduled sample of a tween: apply `value` at `offset` after the tween started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSample<T> {
    /// 1-based step index.
    pub step: u32,
    /// Time after the tween start at which the sample applies.
    pub offset: Millis,
    /// Interpolated value.
    pub value: T,
}

/// Fixed-step interpolation between two values over a duration.
///
/// A tween does not own a clock. [`Tween::samples`] yields `steps` samples spaced
/// `duration / steps` apart; the caller schedules them on a
/// [`Timeline`](crate::Timeline). The final sample always lands exactly on
/// `to` at `offset == duration`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    /// Start value (t=0, not emitted as a sample).
    pub from: T,
    /// End value.
    pub to: T,
    /// Total duration.
    pub duration: Millis,
    /// Number of samples; must be > 0.
    pub steps: u32,
    /// Curve applied to step progress.
    pub ease: Ease,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    /// Linear tween with validated step count.
    pub fn new(from: T, to: T, duration: Millis, steps: u32) -> ScrollmapResult<Self> {
        if steps == 0 {
            return Err(ScrollmapError::validation("tween steps must be > 0"));
        }
        Ok(Self {
            from,
            to,
            duration,
            steps,
            ease: Ease::Linear,
        })
    }

    /// Replace the easing curve.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Value after `step` of `steps` (clamped).
    pub fn value_at(&self, step: u32) -> T {
        let steps = self.steps.max(1);
        if step >= steps {
            return self.to.clone();
        }
        let t = f64::from(step) / f64::from(steps);
        T::lerp(&self.from, &self.to, self.ease.apply(t))
    }

    /// Offset of `step` from the tween start.
    pub fn offset_of(&self, step: u32) -> Millis {
        let steps = u64::from(self.steps.max(1));
        let step = u64::from(step).min(steps);
        Millis(self.duration.0.saturating_mul(step) / steps)
    }

    /// All samples in order, excluding the implicit start value.
    pub fn samples(&self) -> impl Iterator<Item = TweenSample<T>> + '_ {
        (1..=self.steps).map(move |step| TweenSample {
            step,
            offset: self.offset_of(step),
            value: self.value_at(step),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
