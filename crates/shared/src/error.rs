use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    NameRequired,
    EmailInvalid,
    MessageTooShort,
}

impl ValidationReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationReason::NameRequired => "name_required",
            ValidationReason::EmailInvalid => "email_invalid",
            ValidationReason::MessageTooShort => "message_too_short",
        }
    }
}

/// Malformed user input; recovered locally and never sent to the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("validation failed: {}", reason.as_str())]
pub struct ValidationError {
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(reason: ValidationReason) -> Self {
        Self { reason }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("message relay unreachable: {0}")]
    Transport(String),
    #[error("message relay answered with status {0}")]
    Status(u16),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationSpecError {
    #[error("initial and target styles animate different properties")]
    PropertyMismatch,
    #[error("animation duration must not be negative, got {0}")]
    NegativeDuration(f32),
    #[error("animation delay must not be negative, got {0}")]
    NegativeDelay(f32),
    #[error("animation timing must be finite")]
    NonFinite,
}
