//! Scroll offset signal and the derived "scrolled" phase of the navigation bar.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

use tracing::trace;

use crate::subscription::{Listeners, Subscription};

/// Pixels from the top of the page past which the page counts as scrolled.
pub const SCROLL_THRESHOLD_PX: f64 = 50.0;

pub fn is_scrolled(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

#[derive(Clone, Default)]
pub struct ScrollSignal {
    offset: Arc<Mutex<f64>>,
    listeners: Listeners<f64>,
}

impl ScrollSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, offset: f64) {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner) = offset;
        self.listeners.emit(&offset);
    }

    pub fn offset(&self) -> f64 {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&f64) + Send + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavBarStyle {
    Transparent,
    /// Blurred card background with a bottom border.
    Elevated,
}

impl NavBarStyle {
    pub fn for_phase(scrolled: bool) -> Self {
        if scrolled {
            NavBarStyle::Elevated
        } else {
            NavBarStyle::Transparent
        }
    }
}

pub struct ScrollPhaseTracker {
    scrolled: Arc<AtomicBool>,
    subscription: Option<Subscription>,
}

impl ScrollPhaseTracker {
    /// Starts unscrolled and recomputes the phase on every scroll event;
    /// `on_change` runs synchronously with each recomputed phase.
    pub fn attach<F>(signal: &ScrollSignal, threshold: f64, mut on_change: F) -> Self
    where
        F: FnMut(bool) + Send + 'static,
    {
        let scrolled = Arc::new(AtomicBool::new(false));
        let phase = Arc::clone(&scrolled);
        let subscription = signal.subscribe(move |offset| {
            let next = is_scrolled(*offset, threshold);
            phase.store(next, Ordering::SeqCst);
            trace!(offset = *offset, scrolled = next, "scroll phase recomputed");
            on_change(next);
        });

        Self {
            scrolled,
            subscription: Some(subscription),
        }
    }

    pub fn scrolled(&self) -> bool {
        self.scrolled.load(Ordering::SeqCst)
    }

    pub fn nav_style(&self) -> NavBarStyle {
        NavBarStyle::for_phase(self.scrolled())
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}
