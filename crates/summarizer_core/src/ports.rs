//! crates/summarizer_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the summarizer's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete HTTP client and credential storage.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{Credential, Document, DocumentId, SummaryResponse};
use crate::request::SummaryRequest;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, HTTP).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    /// The server refused the credential. A summary may still have been produced.
    #[error("Unauthorized")]
    Unauthorized { summary: Option<String> },
    /// The call was aborted through its cancellation token before it completed.
    #[error("Request cancelled")]
    Cancelled,
    /// The server answered with a non-success status.
    #[error("Request rejected with status {status}")]
    Rejected {
        status: u16,
        details: Option<String>,
        error: Option<String>,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Problems with user input that are reported before any call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please attach a document or paste some text")]
    NoInput,
    #[error("A summarization request is already in progress")]
    AlreadyRunning,
    #[error("Word count must be between 50 and 500, got {0}")]
    WordCountOutOfRange(u32),
    #[error("Cannot derive an endpoint from {0}")]
    InvalidEndpoint(String),
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait SummarizationTransport: Send + Sync {
    /// Sends one summarization request.
    ///
    /// Implementations must stop and return `PortError::Cancelled` when `cancel`
    /// fires before the response body has been fully read.
    async fn send(
        &self,
        request: SummaryRequest,
        credential: Option<Credential>,
        cancel: CancellationToken,
    ) -> PortResult<SummaryResponse>;
}

#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Lists the documents saved for the credential's owner, in server order.
    async fn list_documents(&self, credential: &Credential) -> PortResult<Vec<Document>>;

    /// Deletes one document. Deleting an already-deleted document succeeds.
    async fn delete_document(&self, credential: &Credential, id: DocumentId) -> PortResult<()>;
}

/// Supplies the current credential at call time.
pub trait CredentialSource: Send + Sync {
    fn credential(&self) -> Option<Credential>;
}

#[async_trait]
pub trait SummaryListener: Send + Sync {
    /// Called once after a summary has been saved server-side.
    async fn on_summary_created(&self);
}
