//! One-shot entrance animations keyed by element.
//!
//! The controller is a registry of element -> [`AnimationSpec`] -> fired flag.
//! It knows nothing about rendering: callers report intersections (or hand it
//! a viewport and element rects) and read back interpolated styles.

use std::{collections::HashMap, time::Duration};

use shared::{
    domain::{ElementId, Rect, StyleDelta},
    error::AnimationSpecError,
};
use tracing::debug;

use crate::easing::Easing;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Seconds.
    pub duration: f32,
    /// Seconds.
    pub delay: f32,
    pub easing: Easing,
}

impl Timing {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            delay: 0.0,
            easing: Easing::default(),
        }
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSpec {
    initial: StyleDelta,
    target: StyleDelta,
    timing: Timing,
}

impl AnimationSpec {
    pub fn new(
        initial: StyleDelta,
        target: StyleDelta,
        timing: Timing,
    ) -> Result<Self, AnimationSpecError> {
        if !initial.same_properties(&target) {
            return Err(AnimationSpecError::PropertyMismatch);
        }
        let values_finite = initial
            .values()
            .chain(target.values())
            .all(|(_, value)| value.is_finite());
        if !values_finite || !timing.duration.is_finite() || !timing.delay.is_finite() {
            return Err(AnimationSpecError::NonFinite);
        }
        if timing.duration < 0.0 {
            return Err(AnimationSpecError::NegativeDuration(timing.duration));
        }
        if timing.delay < 0.0 {
            return Err(AnimationSpecError::NegativeDelay(timing.delay));
        }

        Ok(Self {
            initial,
            target,
            timing,
        })
    }

    pub fn initial(&self) -> &StyleDelta {
        &self.initial
    }

    pub fn target(&self) -> &StyleDelta {
        &self.target
    }

    pub fn duration(&self) -> f32 {
        self.timing.duration
    }

    pub fn delay(&self) -> f32 {
        self.timing.delay
    }

    pub fn easing(&self) -> Easing {
        self.timing.easing
    }

    /// Style `elapsed` after the animation was triggered.
    pub fn style_after(&self, elapsed: Duration) -> StyleDelta {
        let active = elapsed.as_secs_f32() - self.timing.delay;
        if active < 0.0 {
            return self.initial.clone();
        }
        if self.timing.duration <= 0.0 {
            return self.target.clone();
        }
        let progress = (active / self.timing.duration).min(1.0);
        StyleDelta::lerp(
            &self.initial,
            &self.target,
            self.timing.easing.evaluate(progress),
        )
    }

    pub fn finished_after(&self, elapsed: Duration) -> bool {
        elapsed.as_secs_f32() >= self.timing.delay + self.timing.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealTrigger {
    /// Fires on the first observed viewport intersection.
    #[default]
    InView,
    /// Fires as soon as the element is registered.
    OnMount,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealEntry {
    pub element: ElementId,
    pub spec: AnimationSpec,
    pub trigger: RevealTrigger,
    fired_at: Option<Duration>,
}

impl RevealEntry {
    pub fn fired(&self) -> bool {
        self.fired_at.is_some()
    }

    pub fn fired_at(&self) -> Option<Duration> {
        self.fired_at
    }
}

/// Emitted once per element when its animation starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealStarted {
    pub element: ElementId,
    pub started_at: Duration,
    pub delay: f32,
    pub duration: f32,
}

#[derive(Debug, Default)]
pub struct ViewportRevealController {
    entries: HashMap<ElementId, RevealEntry>,
}

impl ViewportRevealController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `element`. An element that is already registered keeps its
    /// existing entry and fired state; returns `None` in that case.
    pub fn register(
        &mut self,
        element: ElementId,
        spec: AnimationSpec,
        trigger: RevealTrigger,
        now: Duration,
    ) -> Option<RevealStarted> {
        if self.entries.contains_key(&element) {
            debug!(element = element.0, "reveal entry already registered");
            return None;
        }

        self.entries.insert(
            element,
            RevealEntry {
                element,
                spec,
                trigger,
                fired_at: None,
            },
        );

        match trigger {
            RevealTrigger::OnMount => self.fire(element, now),
            RevealTrigger::InView => None,
        }
    }

    /// Reports the visibility of one element. Only the first `true` for a
    /// pending in-view entry starts its animation.
    pub fn observe(
        &mut self,
        element: ElementId,
        intersecting: bool,
        now: Duration,
    ) -> Option<RevealStarted> {
        if !intersecting {
            return None;
        }
        let entry = self.entries.get(&element)?;
        if entry.fired() || entry.trigger != RevealTrigger::InView {
            return None;
        }
        self.fire(element, now)
    }

    /// Intersects every laid-out element with `viewport`.
    pub fn observe_viewport<'a, I>(
        &mut self,
        viewport: Rect,
        layout: I,
        now: Duration,
    ) -> Vec<RevealStarted>
    where
        I: IntoIterator<Item = (ElementId, &'a Rect)>,
    {
        layout
            .into_iter()
            .filter_map(|(element, bounds)| {
                self.observe(element, viewport.intersects(bounds), now)
            })
            .collect()
    }

    /// Forgets an element; unknown elements are ignored.
    pub fn unmount(&mut self, element: ElementId) -> Option<RevealEntry> {
        let removed = self.entries.remove(&element);
        if let Some(entry) = &removed {
            debug!(
                element = element.0,
                fired = entry.fired(),
                "reveal entry discarded"
            );
        }
        removed
    }

    pub fn style_at(&self, element: ElementId, now: Duration) -> Option<StyleDelta> {
        let entry = self.entries.get(&element)?;
        Some(match entry.fired_at {
            None => entry.spec.initial().clone(),
            Some(fired_at) => entry.spec.style_after(now.saturating_sub(fired_at)),
        })
    }

    pub fn entry(&self, element: ElementId) -> Option<&RevealEntry> {
        self.entries.get(&element)
    }

    pub fn is_fired(&self, element: ElementId) -> bool {
        self.entries
            .get(&element)
            .is_some_and(RevealEntry::fired)
    }

    pub fn pending(&self) -> usize {
        self.entries.values().filter(|entry| !entry.fired()).count()
    }

    /// True while any fired entry is still inside its delay or duration.
    pub fn is_animating(&self, now: Duration) -> bool {
        self.entries.values().any(|entry| {
            entry
                .fired_at
                .is_some_and(|fired_at| !entry.spec.finished_after(now.saturating_sub(fired_at)))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fire(&mut self, element: ElementId, now: Duration) -> Option<RevealStarted> {
        let entry = self.entries.get_mut(&element)?;
        entry.fired_at = Some(now);
        debug!(
            element = element.0,
            at_ms = now.as_millis() as u64,
            "reveal started"
        );
        Some(RevealStarted {
            element,
            started_at: now,
            delay: entry.spec.delay(),
            duration: entry.spec.duration(),
        })
    }
}

#[cfg(test)]
#[path = "tests/reveal_tests.rs"]
mod tests;
