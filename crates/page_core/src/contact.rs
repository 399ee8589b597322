//! Contact form: field state, validation, and the single-attempt submission
//! workflow (Idle -> Validating -> Submitting -> Success | Failure -> Idle).

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Client,
};
use serde::Serialize;
use shared::{
    domain::FormField,
    error::{SubmissionError, ValidationError, ValidationReason},
    protocol::{ContactPayload, Notification},
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_SUBJECT: &str = "New message from portfolio";
pub const MIN_MESSAGE_CHARS: usize = 10;

const SUBMIT_LABEL: &str = "Send Message";
const SUBMITTING_LABEL: &str = "Sending...";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub submitting: bool,
}

impl FormState {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Subject => &self.subject,
            FormField::Message => &self.message,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Subject => &mut self.subject,
            FormField::Message => &mut self.message,
        }
    }

    fn clear_fields(&mut self) {
        for field in FormField::ALL {
            self.field_mut(field).clear();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Success,
    Failure,
}

impl FormPhase {
    fn is_terminal(self) -> bool {
        matches!(self, FormPhase::Success | FormPhase::Failure)
    }
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phase: FormPhase,
    pub inputs_disabled: bool,
    pub submit_label: &'static str,
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("a submission is already in flight")]
    InFlight,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot after it
/// with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
}

/// Ordered checks, stopping at the first failure.
pub fn validate(form: &FormState) -> Result<(), ValidationError> {
    if form.name.trim().is_empty() {
        return Err(ValidationError::new(ValidationReason::NameRequired));
    }
    if !is_valid_email(&form.email) {
        return Err(ValidationError::new(ValidationReason::EmailInvalid));
    }
    if form.message.trim().chars().count() < MIN_MESSAGE_CHARS {
        return Err(ValidationError::new(ValidationReason::MessageTooShort));
    }
    Ok(())
}

pub fn build_payload(form: &FormState) -> ContactPayload {
    let subject = if form.subject.is_empty() {
        DEFAULT_SUBJECT.to_string()
    } else {
        form.subject.clone()
    };
    ContactPayload {
        name: form.name.clone(),
        email: form.email.clone(),
        subject,
        captcha: "false".to_string(),
        message: form.message.clone(),
    }
}

fn validation_notification(error: &ValidationError) -> Notification {
    match error.reason {
        ValidationReason::NameRequired => {
            Notification::destructive("Name required", "Please enter your name.")
        }
        ValidationReason::EmailInvalid => {
            Notification::destructive("Invalid email", "Please enter a valid email address.")
        }
        ValidationReason::MessageTooShort => Notification::destructive(
            "Message too short",
            "Message should be at least 10 characters.",
        ),
    }
}

fn success_notification() -> Notification {
    Notification::positive("Message sent!", "Thank you. I will get back to you soon.")
}

fn failure_notification() -> Notification {
    Notification::destructive(
        "Something went wrong",
        "Unable to send your message. Please try again later.",
    )
}

/// Outbound delivery of one contact message. Implementations make exactly one
/// attempt per call.
#[async_trait]
pub trait MessageRelay: Send + Sync {
    async fn deliver(&self, payload: &ContactPayload) -> Result<(), SubmissionError>;
}

pub struct HttpMessageRelay {
    http: Client,
    endpoint: Url,
}

impl HttpMessageRelay {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MessageRelay for HttpMessageRelay {
    async fn deliver(&self, payload: &ContactPayload) -> Result<(), SubmissionError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct FormInner {
    state: FormState,
    phase: FormPhase,
}

impl FormInner {
    fn acknowledge(&mut self) {
        if self.phase.is_terminal() {
            self.phase = FormPhase::Idle;
        }
    }
}

/// Armed while a relay call is outstanding. If the `submit` future is dropped
/// before the relay answers, the attempt is closed as a failure so the form
/// unlocks.
struct InFlightAttempt<'a> {
    inner: &'a Mutex<FormInner>,
    notifications: &'a broadcast::Sender<Notification>,
    armed: bool,
}

impl InFlightAttempt<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightAttempt<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.state.submitting = false;
        inner.phase = FormPhase::Failure;
        warn!("contact submission abandoned before the relay answered");
        let _ = self.notifications.send(failure_notification());
    }
}

pub struct FormSubmissionController<R: MessageRelay> {
    relay: R,
    inner: Mutex<FormInner>,
    notifications: broadcast::Sender<Notification>,
}

impl<R: MessageRelay> FormSubmissionController<R> {
    pub fn new(relay: R) -> Self {
        let (notifications, _) = broadcast::channel(32);
        Self {
            relay,
            inner: Mutex::new(FormInner::default()),
            notifications,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Replaces one field. Refused while a submission is in flight.
    pub async fn set_field(&self, field: FormField, value: impl Into<String>) -> bool {
        let mut inner = self.lock();
        if inner.state.submitting {
            debug!(field = field.as_str(), "edit ignored while submitting");
            return false;
        }
        inner.acknowledge();
        *inner.state.field_mut(field) = value.into();
        true
    }

    pub async fn snapshot(&self) -> FormState {
        self.lock().state.clone()
    }

    pub async fn phase(&self) -> FormPhase {
        self.lock().phase
    }

    pub async fn acknowledge(&self) {
        self.lock().acknowledge();
    }

    pub async fn view(&self) -> FormView {
        let inner = self.lock();
        let state = &inner.state;
        FormView {
            name: state.name.clone(),
            email: state.email.clone(),
            subject: state.subject.clone(),
            message: state.message.clone(),
            phase: inner.phase,
            inputs_disabled: state.submitting,
            submit_label: if state.submitting {
                SUBMITTING_LABEL
            } else {
                SUBMIT_LABEL
            },
        }
    }

    /// Runs one submission attempt. While another attempt is in flight this
    /// is a no-op returning [`FormError::InFlight`].
    pub async fn submit(&self) -> Result<(), FormError> {
        let payload = {
            let mut inner = self.lock();
            if inner.state.submitting {
                debug!("submit ignored: already submitting");
                return Err(FormError::InFlight);
            }
            inner.acknowledge();

            inner.phase = FormPhase::Validating;
            if let Err(err) = validate(&inner.state) {
                inner.phase = FormPhase::Idle;
                debug!(reason = err.reason.as_str(), "contact form rejected");
                let _ = self.notifications.send(validation_notification(&err));
                return Err(err.into());
            }

            inner.state.submitting = true;
            inner.phase = FormPhase::Submitting;
            build_payload(&inner.state)
        };

        let attempt = InFlightAttempt {
            inner: &self.inner,
            notifications: &self.notifications,
            armed: true,
        };
        let result = self.relay.deliver(&payload).await;
        attempt.disarm();

        let mut inner = self.lock();
        inner.state.submitting = false;
        match result {
            Ok(()) => {
                inner.state.clear_fields();
                inner.phase = FormPhase::Success;
                info!("contact message delivered");
                let _ = self.notifications.send(success_notification());
                Ok(())
            }
            Err(err) => {
                inner.phase = FormPhase::Failure;
                warn!(error = %err, "contact message delivery failed");
                let _ = self.notifications.send(failure_notification());
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/contact_tests.rs"]
mod tests;
