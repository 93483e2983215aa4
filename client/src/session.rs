//! The per-modality analysis session.
//!
//! A session is a plain state machine. `submit` hands out an [`Exchange`] for
//! the caller to send; the outcome comes back through `complete` together
//! with the exchange's ticket. Outcomes whose ticket is no longer in flight
//! (the session was reset in between) are dropped.

use serde::Serialize;
use shared::{AnalysisResult, Modality};
use uuid::Uuid;

use crate::capture::{
    missing_input_message, AnalysisInput, ImageCapture, InputCapture, TextCapture,
};
use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "status", content = "detail", rename_all = "camelCase")]
pub enum SessionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(AnalysisResult),
    Failed(String),
}

impl SessionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SessionState::Submitting)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            SessionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SessionState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A request the session has committed to. Send `input` to the detection
/// client and report back with `ticket`.
#[derive(Debug)]
pub struct Exchange {
    ticket: Ticket,
    input: AnalysisInput,
}

impl Exchange {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn input(&self) -> &AnalysisInput {
        &self.input
    }
}

#[derive(Debug)]
pub enum Submission {
    Started(Exchange),
    /// Client-side validation failed; the session is now `Failed`.
    Rejected,
    /// A request is already in flight; nothing changed.
    Busy,
}

pub struct AnalysisSession<I> {
    id: Uuid,
    capture: I,
    state: SessionState,
    in_flight: Option<Ticket>,
    next_ticket: u64,
}

pub type TextSession = AnalysisSession<TextCapture>;
pub type ImageSession = AnalysisSession<ImageCapture>;

impl<I: InputCapture> AnalysisSession<I> {
    pub fn new(capture: I) -> Self {
        let id = Uuid::new_v4();
        log::debug!("[session {}] created for {} input", id, I::MODALITY);
        Self {
            id,
            capture,
            state: SessionState::Idle,
            in_flight: None,
            next_ticket: 0,
        }
    }

    pub fn modality(&self) -> Modality {
        I::MODALITY
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn capture(&self) -> &I {
        &self.capture
    }

    /// Input edits never touch the session state.
    pub fn capture_mut(&mut self) -> &mut I {
        &mut self.capture
    }

    pub fn submit(&mut self, input: AnalysisInput) -> Submission {
        if self.state.is_submitting() {
            log::debug!("[session {}] submit ignored, request in flight", self.id);
            return Submission::Busy;
        }

        if input.modality() != I::MODALITY {
            return self.reject(AnalysisError::Validation(format!(
                "Expected {} input, got {}",
                I::MODALITY,
                input.modality()
            )));
        }
        if let Err(err) = input.validate() {
            return self.reject(err);
        }

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        self.state = SessionState::Submitting;
        log::info!("[session {}] submitting {} analysis", self.id, I::MODALITY);

        Submission::Started(Exchange { ticket, input })
    }

    pub fn submit_captured(&mut self) -> Submission {
        if self.state.is_submitting() {
            log::debug!("[session {}] submit ignored, request in flight", self.id);
            return Submission::Busy;
        }

        match self.capture.to_input() {
            Some(input) => self.submit(input),
            None => self.reject(AnalysisError::Validation(
                missing_input_message(I::MODALITY).to_string(),
            )),
        }
    }

    fn reject(&mut self, err: AnalysisError) -> Submission {
        log::info!("[session {}] rejected before sending: {}", self.id, err);
        self.state = SessionState::Failed(err.to_string());
        Submission::Rejected
    }

    /// Applies the outcome of an exchange. Returns false when the outcome was
    /// discarded because `ticket` is not the request in flight.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            log::debug!("[session {}] discarding stale outcome {:?}", self.id, ticket);
            return false;
        }

        self.in_flight = None;
        self.state = match outcome {
            Ok(result) => {
                log::info!(
                    "[session {}] analysis finished: is_ai={} confidence={}",
                    self.id,
                    result.is_ai,
                    result.confidence
                );
                SessionState::Succeeded(result)
            }
            Err(err) => {
                log::info!("[session {}] analysis failed: {}", self.id, err);
                SessionState::Failed(err.to_string())
            }
        };
        true
    }

    pub fn reset(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            log::debug!("[session {}] reset abandons {:?}", self.id, ticket);
        }
        self.capture.clear();
        self.state = SessionState::Idle;
    }
}

impl<I: InputCapture + Default> Default for AnalysisSession<I> {
    fn default() -> Self {
        Self::new(I::default())
    }
}
