//! services/summarizer/src/workflow/orchestrator.rs
//!
//! The summarization state machine. It validates input, issues exactly one
//! transport call per attempt, drives the progress estimate, honours user
//! cancellation, and turns every result into a terminal state plus a message.

use std::sync::Arc;
use summarizer_core::ports::{
    CredentialSource, PortError, PortResult, SummarizationTransport, SummaryListener,
    ValidationError,
};
use summarizer_core::progress::PROGRESS_COMPLETE;
use summarizer_core::{
    request, AccessMode, ContentKind, FailureKind, InputSelection, RequestOutcome,
    SummaryRequestConfig, SummaryResponse,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use url::Url;
use uuid::Uuid;

use crate::workflow::cancellation::CancellationController;
use crate::workflow::progress::{ProgressEstimator, ProgressHandle};
use crate::workflow::state::{OrchestratorSnapshot, OrchestratorState};

pub const NOT_SAVED_MESSAGE: &str =
    "You must be logged in to save summaries. The summary was not saved.";
pub const REJECTED_FALLBACK_MESSAGE: &str = "An error occurred while summarizing.";
pub const REJECTED_TEXT_FALLBACK_MESSAGE: &str = "An error occurred while summarizing text.";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

pub struct SummarizationOrchestrator {
    transport: Arc<dyn SummarizationTransport>,
    credentials: Arc<dyn CredentialSource>,
    listener: Option<Arc<dyn SummaryListener>>,
    access_mode: AccessMode,
    endpoint: Url,
    estimator: ProgressEstimator,
    cancellation: CancellationController,
    snapshot: Arc<watch::Sender<OrchestratorSnapshot>>,
}

impl SummarizationOrchestrator {
    /// Creates an orchestrator targeting the `access_mode` endpoint under `base_url`.
    pub fn new(
        transport: Arc<dyn SummarizationTransport>,
        credentials: Arc<dyn CredentialSource>,
        base_url: &Url,
        access_mode: AccessMode,
        estimator: ProgressEstimator,
    ) -> Result<Self, ValidationError> {
        let endpoint = access_mode
            .summarize_endpoint(base_url)
            .map_err(|_| ValidationError::InvalidEndpoint(base_url.to_string()))?;
        let (snapshot, _) = watch::channel(OrchestratorSnapshot::default());
        Ok(Self {
            transport,
            credentials,
            listener: None,
            access_mode,
            endpoint,
            estimator,
            cancellation: CancellationController::new(),
            snapshot: Arc::new(snapshot),
        })
    }

    /// Registers the party to notify after a summary has been saved.
    pub fn with_listener(mut self, listener: Arc<dyn SummaryListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn state(&self) -> OrchestratorState {
        self.snapshot.borrow().state
    }

    pub fn snapshot(&self) -> OrchestratorSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Observes every transition and progress tick.
    pub fn subscribe(&self) -> watch::Receiver<OrchestratorSnapshot> {
        self.snapshot.subscribe()
    }

    /// Runs one summarization attempt to completion.
    ///
    /// Only input problems are returned as errors, and they leave the state
    /// untouched. Every transport result becomes a terminal state and outcome.
    pub async fn submit(
        &self,
        selection: &InputSelection,
        config: SummaryRequestConfig,
    ) -> Result<RequestOutcome, ValidationError> {
        if selection.is_empty() {
            warn!("Submit ignored: no input selected.");
            return Err(ValidationError::NoInput);
        }
        let config = config.effective_for(selection);
        let request = request::build(selection, &config, &self.endpoint)?;

        let attempt = Uuid::new_v4();
        let mut armed = None;
        // The token is armed before `Running` is visible so an early cancel is not lost.
        self.snapshot.send_if_modified(|snapshot| {
            if snapshot.state.is_running() {
                return false;
            }
            armed = Some(self.cancellation.arm(attempt));
            *snapshot = OrchestratorSnapshot {
                attempt: Some(attempt),
                state: OrchestratorState::Running,
                progress: None,
                outcome: None,
            };
            true
        });
        let Some(armed) = armed else {
            warn!("Submit rejected: a request is already in progress.");
            return Err(ValidationError::AlreadyRunning);
        };

        let mut guard = AttemptGuard {
            orchestrator: self,
            attempt,
            settled: false,
        };
        let progress = self.start_progress(attempt);
        let kind = request.content_kind();

        info!(
            attempt = %attempt,
            input = selection.label(),
            kind = ?kind,
            word_count = config.word_count(),
            "Summarization started."
        );

        let credential = match self.access_mode {
            AccessMode::Authenticated => self.credentials.credential(),
            AccessMode::Public => None,
        };
        let result = self.transport.send(request, credential, armed.token).await;

        // Settle before the next await: a response that arrived must not be lost to a drop.
        let outcome = classify(result, kind);
        self.finish(attempt, outcome.clone());
        guard.settled = true;
        if let RequestOutcome::Success { notice: None, .. } = &outcome {
            self.notify_listener();
        }
        info!(attempt = %attempt, state = ?OrchestratorState::for_outcome(&outcome), "Summarization settled.");

        progress.stop().await;
        Ok(outcome)
    }

    /// Requests cancellation of the running attempt. Returns whether a signal was sent.
    ///
    /// The state only changes once the transport observes the signal, so a
    /// response that already arrived still wins.
    pub fn cancel(&self) -> bool {
        let (state, attempt) = {
            let snapshot = self.snapshot.borrow();
            (snapshot.state, snapshot.attempt)
        };
        match (state, attempt) {
            (OrchestratorState::Running, Some(attempt)) => {
                let signalled = self.cancellation.cancel(attempt);
                info!(attempt = %attempt, signalled, "Cancellation requested.");
                signalled
            }
            _ => {
                debug!("Cancel ignored: nothing is running.");
                false
            }
        }
    }

    fn start_progress(&self, attempt: Uuid) -> ProgressHandle {
        let snapshot = self.snapshot.clone();
        self.estimator.start(move |value| {
            snapshot.send_if_modified(|s| {
                if s.attempt == Some(attempt) && s.state.is_running() {
                    s.progress = Some(value);
                    true
                } else {
                    false
                }
            });
        })
    }

    /// Discards the attempt's token and publishes its terminal state.
    fn finish(&self, attempt: Uuid, outcome: RequestOutcome) {
        self.cancellation.disarm(attempt);
        let state = OrchestratorState::for_outcome(&outcome);
        let progress = (state == OrchestratorState::Succeeded).then_some(PROGRESS_COMPLETE);
        self.snapshot.send_if_modified(|s| {
            if s.attempt != Some(attempt) {
                return false;
            }
            s.state = state;
            s.progress = progress;
            s.outcome = Some(outcome);
            true
        });
    }

    /// Fire-and-forget: the attempt does not wait on the listener.
    fn notify_listener(&self) {
        if !self.access_mode.persists_result() {
            return;
        }
        if let Some(listener) = self.listener.clone() {
            tokio::spawn(async move {
                listener.on_summary_created().await;
            });
        }
    }
}

/// Settles the attempt as cancelled if `submit` is dropped mid-flight.
struct AttemptGuard<'a> {
    orchestrator: &'a SummarizationOrchestrator,
    attempt: Uuid,
    settled: bool,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(attempt = %self.attempt, "Summarization dropped before settling.");
            self.orchestrator
                .finish(self.attempt, RequestOutcome::Cancelled);
        }
    }
}

/// Maps a transport result to the outcome shown to the user.
pub fn classify(result: PortResult<SummaryResponse>, kind: ContentKind) -> RequestOutcome {
    match result {
        Ok(response) => RequestOutcome::Success {
            summary_text: response.summary,
            notice: None,
        },
        Err(PortError::Cancelled) => RequestOutcome::Cancelled,
        Err(PortError::Unauthorized {
            summary: Some(summary),
        }) => RequestOutcome::Success {
            summary_text: summary,
            notice: Some(NOT_SAVED_MESSAGE.to_string()),
        },
        Err(PortError::Unauthorized { summary: None }) => RequestOutcome::Failed {
            message: NOT_SAVED_MESSAGE.to_string(),
            kind: FailureKind::Authorization,
        },
        Err(PortError::Rejected {
            status,
            details,
            error,
        }) => {
            error!(status, "Summarization rejected by server.");
            RequestOutcome::Failed {
                message: details.or(error).unwrap_or_else(|| {
                    match kind {
                        ContentKind::Multipart => REJECTED_FALLBACK_MESSAGE,
                        ContentKind::Json => REJECTED_TEXT_FALLBACK_MESSAGE,
                    }
                    .to_string()
                }),
                kind: FailureKind::Transport,
            }
        }
        Err(e) => {
            error!("Summarization failed: {}", e);
            RequestOutcome::Failed {
                message: UNEXPECTED_MESSAGE.to_string(),
                kind: FailureKind::Transport,
            }
        }
    }
}
