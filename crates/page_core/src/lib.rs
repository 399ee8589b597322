//! Behavioral core of the portfolio page: reveal orchestration, procedural
//! hero motion, scroll phase tracking and the contact form workflow.
//!
//! The components never talk to each other; the page shell owns and composes
//! them.

pub mod contact;
pub mod download;
pub mod easing;
pub mod motion;
pub mod reveal;
pub mod scroll;
pub mod subscription;

pub use contact::{
    FormError, FormPhase, FormState, FormSubmissionController, FormView, HttpMessageRelay,
    MessageRelay,
};
pub use easing::Easing;
pub use motion::{spawn_frame_driver, FrameDriver, MotionClock, ProceduralMotionLoop};
pub use reveal::{
    AnimationSpec, RevealEntry, RevealStarted, RevealTrigger, Timing, ViewportRevealController,
};
pub use scroll::{NavBarStyle, ScrollPhaseTracker, ScrollSignal, SCROLL_THRESHOLD_PX};
pub use subscription::{Listeners, Subscription};
