pub mod domain;
pub mod ports;
pub mod progress;
pub mod request;

pub use domain::{
    AccessMode, Credential, Document, DocumentCollection, DocumentId, FailureKind,
    InputSelection, RequestOutcome, SummaryRequestConfig, SummaryResponse,
};
pub use ports::{
    CredentialSource, DocumentService, PortError, PortResult, SummarizationTransport,
    SummaryListener, ValidationError,
};
pub use progress::ProgressEstimate;
pub use request::{ContentKind, RequestPayload, SummaryRequest};
