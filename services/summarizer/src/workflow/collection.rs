//! services/summarizer/src/workflow/collection.rs
//!
//! Mirrors the user's saved summaries. Fetches replace the whole list, removals
//! are applied locally before the server confirms them.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use summarizer_core::ports::{CredentialSource, DocumentService, PortError, PortResult, SummaryListener};
use summarizer_core::{DocumentCollection, DocumentId};
use tracing::{error, info, warn};

pub struct DocumentCollectionManager {
    service: Arc<dyn DocumentService>,
    credentials: Arc<dyn CredentialSource>,
    collection: RwLock<DocumentCollection>,
}

impl DocumentCollectionManager {
    pub fn new(service: Arc<dyn DocumentService>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            service,
            credentials,
            collection: RwLock::new(DocumentCollection::default()),
        }
    }

    /// The collection as currently held.
    pub fn snapshot(&self) -> DocumentCollection {
        self.collection.read().clone()
    }

    /// Reloads the documents from the server and returns the resulting collection.
    ///
    /// Failures are logged and leave the previous collection in place.
    pub async fn fetch(&self) -> DocumentCollection {
        let Some(credential) = self.credentials.credential() else {
            warn!("Skipping document fetch: not logged in.");
            return self.snapshot();
        };

        match self.service.list_documents(&credential).await {
            Ok(documents) => {
                info!(count = documents.len(), "Fetched documents.");
                let mut collection = self.collection.write();
                collection.replace(documents);
                collection.clone()
            }
            Err(e) => {
                error!("Failed to fetch documents: {}", e);
                self.snapshot()
            }
        }
    }

    /// Removes a document locally, then asks the server to delete it.
    ///
    /// The local removal stands even if the server call fails; call `fetch`
    /// to resynchronise.
    pub async fn remove(&self, id: DocumentId) -> PortResult<()> {
        let removed = self.collection.write().remove(id);
        if removed.is_none() {
            warn!(document_id = id, "Removing a document that is not in the collection.");
        }

        let Some(credential) = self.credentials.credential() else {
            error!(document_id = id, "Cannot delete document: not logged in.");
            return Err(PortError::Unauthorized { summary: None });
        };

        match self.service.delete_document(&credential, id).await {
            Ok(()) => {
                info!(document_id = id, "Document deleted.");
                Ok(())
            }
            Err(e) => {
                // TODO: restore `removed` at its old position once the product decides on rollback.
                error!(document_id = id, "Failed to delete document: {}", e);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl SummaryListener for DocumentCollectionManager {
    async fn on_summary_created(&self) {
        self.fetch().await;
    }
}
