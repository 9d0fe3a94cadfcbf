//! services/summarizer/src/workflow/state.rs
//!
//! Defines the orchestrator's state machine states and the snapshot it publishes.

use summarizer_core::RequestOutcome;
use uuid::Uuid;

/// An enum representing where the current summarization attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrchestratorState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Cancelled,
    Failed,
}

impl OrchestratorState {
    pub fn is_running(&self) -> bool {
        matches!(self, OrchestratorState::Running)
    }

    pub fn for_outcome(outcome: &RequestOutcome) -> Self {
        match outcome {
            RequestOutcome::Success { .. } => OrchestratorState::Succeeded,
            RequestOutcome::Cancelled => OrchestratorState::Cancelled,
            RequestOutcome::Failed { .. } => OrchestratorState::Failed,
        }
    }
}

/// Everything a view needs to render the current attempt.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrchestratorSnapshot {
    pub attempt: Option<Uuid>,
    pub state: OrchestratorState,
    /// Displayed progress: the estimate while running, 100 after success, absent otherwise.
    pub progress: Option<f64>,
    pub outcome: Option<RequestOutcome>,
}
