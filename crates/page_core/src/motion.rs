//! Frame clock and the procedural hero motion.
//!
//! Object transforms are a pure function of elapsed seconds, so a frame can be
//! recomputed for any `t` without replaying earlier frames.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use futures::StreamExt;
use shared::domain::{MotionObject, ObjectTransform, Vec3};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, trace};

use crate::subscription::{Listeners, Subscription};

/// Monotonic page time fanned out to frame subscribers.
#[derive(Clone, Default)]
pub struct MotionClock {
    now: Arc<Mutex<Duration>>,
    listeners: Listeners<Duration>,
}

impl MotionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the clock forward and delivers one tick. Earlier times are ignored.
    pub fn advance_to(&self, now: Duration) {
        {
            let mut current = self.now.lock().unwrap_or_else(PoisonError::into_inner);
            if now < *current {
                trace!(
                    requested_ms = now.as_millis() as u64,
                    "ignoring clock tick from the past"
                );
                return;
            }
            *current = now;
        }
        self.listeners.emit(&now);
    }

    /// `on_frame` receives seconds elapsed since this subscription was made.
    pub fn subscribe<F>(&self, mut on_frame: F) -> Subscription
    where
        F: FnMut(f64) + Send + 'static,
    {
        let origin = self.now();
        self.listeners
            .subscribe(move |now: &Duration| on_frame(now.saturating_sub(origin).as_secs_f64()))
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Transform of `object` at `t` seconds.
pub fn evaluate(object: &MotionObject, t: f64) -> ObjectTransform {
    let wave = (t * f64::from(object.frequency) + f64::from(object.phase_offset)).sin();
    let spin = |speed: f32| (f64::from(speed) * t) as f32;
    ObjectTransform {
        id: object.id,
        position: Vec3::new(
            object.base_position.x,
            object.base_position.y + object.amplitude * wave as f32,
            object.base_position.z,
        ),
        rotation: Vec3::new(
            spin(object.angular_speed.x),
            spin(object.angular_speed.y),
            spin(object.angular_speed.z),
        ),
    }
}

pub fn evaluate_all(objects: &[MotionObject], t: f64) -> Vec<ObjectTransform> {
    objects.iter().map(|object| evaluate(object, t)).collect()
}

pub struct ProceduralMotionLoop {
    objects: Arc<[MotionObject]>,
    frame: Arc<Mutex<Vec<ObjectTransform>>>,
    frames_rendered: Arc<AtomicU64>,
    subscription: Option<Subscription>,
}

impl ProceduralMotionLoop {
    pub fn new(objects: Vec<MotionObject>) -> Self {
        let frame = evaluate_all(&objects, 0.0);
        Self {
            objects: objects.into(),
            frame: Arc::new(Mutex::new(frame)),
            frames_rendered: Arc::new(AtomicU64::new(0)),
            subscription: None,
        }
    }

    /// Starts receiving ticks from `clock`; restarting resets `t` to zero.
    pub fn start(&mut self, clock: &MotionClock) {
        self.stop();

        let objects = Arc::clone(&self.objects);
        let frame = Arc::clone(&self.frame);
        let frames_rendered = Arc::clone(&self.frames_rendered);
        self.subscription = Some(clock.subscribe(move |t| {
            let next = evaluate_all(&objects, t);
            *frame.lock().unwrap_or_else(PoisonError::into_inner) = next;
            frames_rendered.fetch_add(1, Ordering::Relaxed);
        }));
        debug!(objects = self.objects.len(), "motion loop started");
    }

    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            debug!(frames = self.frames_rendered(), "motion loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn current_frame(&self) -> Vec<ObjectTransform> {
        self.frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered.load(Ordering::Relaxed)
    }

    pub fn objects(&self) -> &[MotionObject] {
        &self.objects
    }
}

/// Background task advancing a [`MotionClock`] at a fixed frame interval.
/// The task is aborted on [`FrameDriver::stop`] or drop.
pub struct FrameDriver {
    handle: Option<JoinHandle<()>>,
}

impl FrameDriver {
    pub fn stop(mut self) {
        self.abort();
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Must be called from within a tokio runtime.
pub fn spawn_frame_driver(clock: MotionClock, frame_interval: Duration) -> FrameDriver {
    let base = clock.now();
    let handle = tokio::spawn(async move {
        let started = tokio::time::Instant::now();
        let mut interval = tokio::time::interval(frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks = IntervalStream::new(interval);
        while let Some(tick) = ticks.next().await {
            clock.advance_to(base + tick.duration_since(started));
        }
    });
    FrameDriver {
        handle: Some(handle),
    }
}

#[cfg(test)]
#[path = "tests/motion_tests.rs"]
mod tests;
