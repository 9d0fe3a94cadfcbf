pub mod cancellation;
pub mod collection;
pub mod orchestrator;
pub mod progress;
pub mod state;

// Re-export the two entry points the binary wires together.
pub use collection::DocumentCollectionManager;
pub use orchestrator::SummarizationOrchestrator;
pub use progress::ProgressEstimator;
pub use state::{OrchestratorSnapshot, OrchestratorState};
