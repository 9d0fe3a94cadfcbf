//! services/summarizer/src/adapters/credentials.rs
//!
//! A `CredentialSource` backed by a value held in memory, typically the
//! `API_TOKEN` from the configuration.

use parking_lot::RwLock;
use summarizer_core::ports::CredentialSource;
use summarizer_core::Credential;

/// Holds the current credential. Log-in and log-out swap it at runtime.
#[derive(Default)]
pub struct StaticCredentialSource {
    credential: RwLock<Option<Credential>>,
}

impl StaticCredentialSource {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            credential: RwLock::new(credential),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn set(&self, credential: Option<Credential>) {
        *self.credential.write() = credential;
    }
}

impl CredentialSource for StaticCredentialSource {
    fn credential(&self) -> Option<Credential> {
        self.credential.read().clone()
    }
}
