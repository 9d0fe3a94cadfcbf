//! services/summarizer/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, the concrete implementation of the
//! `SummarizationTransport` and `DocumentService` ports. It talks to the gateway
//! using `reqwest`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use summarizer_core::domain::{with_trailing_slash, Credential, Document, DocumentId, SummaryResponse};
use summarizer_core::ports::{DocumentService, PortError, PortResult, SummarizationTransport};
use summarizer_core::request::{RequestPayload, SummaryRequest};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::Config;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the transport ports over HTTP.
#[derive(Clone)]
pub struct HttpSummaryAdapter {
    client: Client,
    base_url: Url,
}

impl HttpSummaryAdapter {
    /// Creates a new `HttpSummaryAdapter` rooted at `base_url`.
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Builds a client with the configured timeout.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::new(client, config.api_base_url.clone()))
    }

    fn endpoint(&self, path: &str) -> PortResult<Url> {
        with_trailing_slash(&self.base_url)
            .join(path)
            .map_err(|e| PortError::Unexpected(format!("Invalid endpoint '{}': {}", path, e)))
    }

    /// Sends the request and reads the whole body. Dropping this future aborts the call.
    async fn execute(
        &self,
        request: SummaryRequest,
        credential: Option<Credential>,
    ) -> PortResult<SummaryResponse> {
        let builder = match request.payload {
            RequestPayload::Multipart {
                file_name,
                contents,
                word_count,
                page_limit,
            } => {
                let length = contents.len() as u64;
                let file = multipart::Part::stream_with_length(contents, length)
                    .file_name(file_name);
                let form = multipart::Form::new()
                    .part("file", file)
                    .text("wordCount", word_count.to_string())
                    .text(
                        "pageLimit",
                        page_limit.map(|l| l.to_string()).unwrap_or_default(),
                    );
                self.client.post(request.endpoint.clone()).multipart(form)
            }
            RequestPayload::Json { text } => self
                .client
                .post(request.endpoint.clone())
                .json(&TextRecord { text }),
        };

        debug!(url = %request.endpoint, "Sending summarization request");
        let response = with_credential(builder, credential.as_ref())
            .send()
            .await
            .map_err(network_error)?;
        let status = response.status();
        let body = read_body(response).await?;

        if status.is_success() {
            let record: SummaryRecord = serde_json::from_slice(&body)
                .map_err(|e| PortError::Malformed(format!("Failed to parse summary: {}", e)))?;
            return record.to_domain();
        }

        let record = ErrorRecord::parse(&body);
        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %request.endpoint, "Summarization rejected: not logged in");
            return Err(PortError::Unauthorized {
                summary: record.summary.filter(|s| !s.trim().is_empty()),
            });
        }

        error!(status = %status, url = %request.endpoint, "Summarization API error");
        Err(record.into_rejection(status))
    }
}

fn with_credential(builder: RequestBuilder, credential: Option<&Credential>) -> RequestBuilder {
    match credential {
        Some(credential) => builder.bearer_auth(credential.bearer()),
        None => builder,
    }
}

async fn read_body(response: Response) -> PortResult<bytes::Bytes> {
    response.bytes().await.map_err(network_error)
}

fn network_error(e: reqwest::Error) -> PortError {
    PortError::Network(e.to_string())
}

//=========================================================================================
// Wire Record Structs
//=========================================================================================

#[derive(serde::Serialize)]
struct TextRecord {
    text: String,
}

#[derive(Deserialize)]
struct SummaryRecord {
    summary: Option<String>,
    filename: Option<String>,
}
impl SummaryRecord {
    fn to_domain(self) -> PortResult<SummaryResponse> {
        let summary = self
            .summary
            .ok_or_else(|| PortError::Malformed("Response has no summary field".to_string()))?;
        Ok(SummaryResponse {
            summary,
            filename: self.filename,
        })
    }
}

/// Error bodies come from the gateway (`error`, `details`) or the model service (`detail`).
#[derive(Deserialize, Default)]
struct ErrorRecord {
    #[serde(alias = "detail")]
    details: Option<Value>,
    error: Option<Value>,
    summary: Option<String>,
}
impl ErrorRecord {
    fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    fn into_rejection(self, status: StatusCode) -> PortError {
        PortError::Rejected {
            status: status.as_u16(),
            details: self.details.and_then(value_text),
            error: self.error.and_then(value_text),
        }
    }
}

fn value_text(value: Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s,
        other => other.to_string(),
    };
    (!text.trim().is_empty()).then_some(text)
}

/// Accepts both the camel-case shape and the gateway's capitalised ORM fields.
#[derive(Deserialize)]
struct DocumentRecord {
    #[serde(alias = "ID")]
    id: DocumentId,
    #[serde(default, alias = "Filename")]
    filename: String,
    #[serde(default, alias = "Summary")]
    summary: String,
    #[serde(rename = "createdAt", alias = "CreatedAt", alias = "created_at")]
    created_at: DateTime<Utc>,
}
impl DocumentRecord {
    fn to_domain(self) -> Document {
        Document {
            id: self.id,
            filename: self.filename,
            summary_text: self.summary,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl SummarizationTransport for HttpSummaryAdapter {
    async fn send(
        &self,
        request: SummaryRequest,
        credential: Option<Credential>,
        cancel: CancellationToken,
    ) -> PortResult<SummaryResponse> {
        let url = request.endpoint.clone();
        // The abort signal wins any tie with a response still being read.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(url = %url, "Summarization request aborted.");
                Err(PortError::Cancelled)
            }
            result = self.execute(request, credential) => result,
        }
    }
}

#[async_trait]
impl DocumentService for HttpSummaryAdapter {
    async fn list_documents(&self, credential: &Credential) -> PortResult<Vec<Document>> {
        let url = self.endpoint("documents")?;
        let response = self
            .client
            .get(url)
            .bearer_auth(credential.bearer())
            .send()
            .await
            .map_err(network_error)?;
        let status = response.status();
        let body = read_body(response).await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(PortError::Unauthorized { summary: None });
        }
        if !status.is_success() {
            return Err(ErrorRecord::parse(&body).into_rejection(status));
        }

        let records: Vec<DocumentRecord> = serde_json::from_slice(&body)
            .map_err(|e| PortError::Malformed(format!("Failed to parse documents: {}", e)))?;
        Ok(records.into_iter().map(DocumentRecord::to_domain).collect())
    }

    async fn delete_document(&self, credential: &Credential, id: DocumentId) -> PortResult<()> {
        let url = self.endpoint(&format!("documents/{}", id))?;
        let response = self
            .client
            .delete(url)
            .bearer_auth(credential.bearer())
            .send()
            .await
            .map_err(network_error)?;
        let status = response.status();

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                debug!(document_id = id, "Document already gone; treating delete as done.");
                Ok(())
            }
            StatusCode::UNAUTHORIZED => Err(PortError::Unauthorized { summary: None }),
            _ => {
                let body = read_body(response).await?;
                Err(ErrorRecord::parse(&body).into_rejection(status))
            }
        }
    }
}
