use shared::AnalysisResult;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::capture::{AnalysisInput, ImageCapture, InputCapture, TextCapture};
use crate::detection::DetectionClient;
use crate::error::AnalysisError;
use crate::session::{AnalysisSession, SessionState, Submission, Ticket};

/// Drives one [`AnalysisSession`] against a detection client.
///
/// Cloning yields another handle to the same session. The session lock is
/// only held for state transitions, never across the network call, so input
/// edits, `state` and `reset` stay responsive while a request is in flight.
pub struct Analyzer<C, I> {
    client: Arc<C>,
    session: Arc<Mutex<AnalysisSession<I>>>,
}

pub type TextAnalyzer<C> = Analyzer<C, TextCapture>;
pub type ImageAnalyzer<C> = Analyzer<C, ImageCapture>;

fn lock<I>(session: &Mutex<AnalysisSession<I>>) -> MutexGuard<'_, AnalysisSession<I>> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

// Settles the exchange as a transport failure if the submitting future is
// dropped before the outcome arrives.
struct InFlight<'a, I: InputCapture> {
    session: &'a Mutex<AnalysisSession<I>>,
    ticket: Option<Ticket>,
}

impl<I: InputCapture> InFlight<'_, I> {
    fn finish(mut self, outcome: Result<AnalysisResult, AnalysisError>) -> SessionState {
        let mut session = lock(self.session);
        if let Some(ticket) = self.ticket.take() {
            session.complete(ticket, outcome);
        }
        session.state().clone()
    }
}

impl<I: InputCapture> Drop for InFlight<'_, I> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            log::debug!("Submission dropped before {:?} finished", ticket);
            lock(self.session).complete(
                ticket,
                Err(AnalysisError::Transport {
                    modality: I::MODALITY,
                    detail: "request abandoned by caller".to_string(),
                }),
            );
        }
    }
}

impl<C, I> Clone for Analyzer<C, I> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            session: Arc::clone(&self.session),
        }
    }
}

impl<C: DetectionClient, I: InputCapture> Analyzer<C, I> {
    pub fn new(client: C, capture: I) -> Self {
        Self::with_client(Arc::new(client), capture)
    }

    pub fn with_client(client: Arc<C>, capture: I) -> Self {
        Self {
            client,
            session: Arc::new(Mutex::new(AnalysisSession::new(capture))),
        }
    }

    pub fn state(&self) -> SessionState {
        lock(&self.session).state().clone()
    }

    pub fn read_input<R>(&self, f: impl FnOnce(&I) -> R) -> R {
        f(lock(&self.session).capture())
    }

    pub fn update_input<R>(&self, f: impl FnOnce(&mut I) -> R) -> R {
        f(lock(&self.session).capture_mut())
    }

    pub async fn submit(&self) -> SessionState {
        let submission = lock(&self.session).submit_captured();
        self.run(submission).await
    }

    pub async fn submit_input(&self, input: AnalysisInput) -> SessionState {
        let submission = lock(&self.session).submit(input);
        self.run(submission).await
    }

    pub fn reset(&self) {
        lock(&self.session).reset();
    }

    async fn run(&self, submission: Submission) -> SessionState {
        let exchange = match submission {
            Submission::Started(exchange) => exchange,
            Submission::Rejected | Submission::Busy => return self.state(),
        };

        let in_flight = InFlight {
            session: &self.session,
            ticket: Some(exchange.ticket()),
        };
        let outcome = self.client.analyze(exchange.input()).await;
        in_flight.finish(outcome)
    }
}
