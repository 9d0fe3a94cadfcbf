//! crates/summarizer_core/src/domain.rs
//!
//! Defines the pure, core data structures for the summarizer client.
//! These structs are independent of any transport or serialization format.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::num::NonZeroU32;
use url::Url;

use crate::ports::ValidationError;

/// Inputs longer than this many words surface the page-limit control.
pub const PAGE_LIMIT_WORD_THRESHOLD: usize = 1000;

pub const MIN_WORD_COUNT: u32 = 50;
pub const MAX_WORD_COUNT: u32 = 500;
pub const DEFAULT_WORD_COUNT: u32 = 150;

//=========================================================================================
// Input Selection
//=========================================================================================

/// The document the user wants summarized: an attached file or pasted text, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputSelection {
    File { contents: Bytes, file_name: String },
    Text { text: String },
    #[default]
    Empty,
}

impl InputSelection {
    /// Attaching a file replaces any pasted text.
    pub fn select_file(&mut self, contents: impl Into<Bytes>, file_name: impl Into<String>) {
        *self = InputSelection::File {
            contents: contents.into(),
            file_name: file_name.into(),
        };
    }

    /// Editing the text area replaces any attached file. Clearing it leaves no input.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        *self = if text.is_empty() {
            InputSelection::Empty
        } else {
            InputSelection::Text { text }
        };
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, InputSelection::Empty)
    }

    /// Number of whitespace-delimited words in pasted text.
    /// Files report zero since their length is not known client-side.
    pub fn word_count(&self) -> usize {
        match self {
            InputSelection::Text { text } => text.split_whitespace().count(),
            _ => 0,
        }
    }

    /// Whether the page-limit control should be offered for this input.
    pub fn shows_page_limit(&self) -> bool {
        match self {
            InputSelection::File { .. } => true,
            InputSelection::Text { .. } => self.word_count() > PAGE_LIMIT_WORD_THRESHOLD,
            InputSelection::Empty => false,
        }
    }

    /// A short label for logs and for the stored document name.
    pub fn label(&self) -> &str {
        match self {
            InputSelection::File { file_name, .. } => file_name,
            InputSelection::Text { .. } => "Pasted Text",
            InputSelection::Empty => "",
        }
    }
}

//=========================================================================================
// Request Configuration
//=========================================================================================

/// User-tunable knobs sent along with each submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRequestConfig {
    word_count: u32,
    page_limit: Option<NonZeroU32>,
}

impl SummaryRequestConfig {
    pub fn new(word_count: u32, page_limit: Option<NonZeroU32>) -> Result<Self, ValidationError> {
        if !(MIN_WORD_COUNT..=MAX_WORD_COUNT).contains(&word_count) {
            return Err(ValidationError::WordCountOutOfRange(word_count));
        }
        Ok(Self {
            word_count,
            page_limit,
        })
    }

    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    pub fn page_limit(&self) -> Option<NonZeroU32> {
        self.page_limit
    }

    /// The configuration as it should be transmitted for `selection`.
    /// A page limit set while the control is hidden is not sent.
    pub fn effective_for(&self, selection: &InputSelection) -> Self {
        Self {
            word_count: self.word_count,
            page_limit: self.page_limit.filter(|_| selection.shows_page_limit()),
        }
    }

    /// Once a page limit is offered the server decides precedence, so the
    /// word count becomes a hint rather than a target.
    pub fn word_count_is_advisory(&self, selection: &InputSelection) -> bool {
        selection.shows_page_limit()
    }
}

impl Default for SummaryRequestConfig {
    fn default() -> Self {
        Self {
            word_count: DEFAULT_WORD_COUNT,
            page_limit: None,
        }
    }
}

/// Whether a submission is saved to the user's history or goes through the
/// anonymous endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Authenticated,
    Public,
}

impl AccessMode {
    /// The file-summarization endpoint under `base`.
    pub fn summarize_endpoint(&self, base: &Url) -> Result<Url, url::ParseError> {
        let path = match self {
            AccessMode::Authenticated => "summarize",
            AccessMode::Public => "public/summarize",
        };
        with_trailing_slash(base).join(path)
    }

    pub fn persists_result(&self) -> bool {
        matches!(self, AccessMode::Authenticated)
    }
}

/// `Url::join` replaces the last segment unless the base ends with a slash.
pub fn with_trailing_slash(base: &Url) -> Url {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// A bearer credential attached to authenticated calls.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn bearer(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

//=========================================================================================
// Outcomes
//=========================================================================================

/// The body of a successful summarization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResponse {
    pub summary: String,
    pub filename: Option<String>,
}

/// Why an attempt failed, so callers can style the message appropriately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Authorization,
}

/// The single result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Success {
        summary_text: String,
        /// Set when a summary came back but could not be saved.
        notice: Option<String>,
    },
    Cancelled,
    Failed {
        message: String,
        kind: FailureKind,
    },
}

impl RequestOutcome {
    pub const CANCELLED_MESSAGE: &'static str = "Summarization was cancelled.";

    /// The human-readable text to show for this outcome.
    pub fn message(&self) -> &str {
        match self {
            RequestOutcome::Success { summary_text, .. } => summary_text,
            RequestOutcome::Cancelled => Self::CANCELLED_MESSAGE,
            RequestOutcome::Failed { message, .. } => message,
        }
    }

    /// Cancellation is informational, not an error.
    pub fn is_alarming(&self) -> bool {
        matches!(self, RequestOutcome::Failed { .. })
    }

    pub fn summary(&self) -> Option<&str> {
        match self {
            RequestOutcome::Success { summary_text, .. } => Some(summary_text),
            _ => None,
        }
    }
}

//=========================================================================================
// Documents
//=========================================================================================

pub type DocumentId = u64;

/// A summary previously produced and stored server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub summary_text: String,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// File name offered when exporting the summary, e.g. `report.pdf` -> `report-summary.pdf`.
    pub fn export_file_name(&self) -> String {
        let stem = match self.filename.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => self.filename.as_str(),
        };
        format!("{}-summary.pdf", stem)
    }
}

/// The user's documents, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentCollection {
    documents: Vec<Document>,
}

impl DocumentCollection {
    pub fn new(documents: Vec<Document>) -> Self {
        let mut collection = Self::default();
        collection.replace(documents);
        collection
    }

    /// Replaces the whole collection, restoring newest-first order.
    pub fn replace(&mut self, mut documents: Vec<Document>) {
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.documents = documents;
    }

    /// Removes the document with `id`, if present. Order of the rest is unchanged.
    pub fn remove(&mut self, id: DocumentId) -> Option<Document> {
        let index = self.documents.iter().position(|d| d.id == id)?;
        Some(self.documents.remove(index))
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn is_sorted_newest_first(&self) -> bool {
        self.documents
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at)
    }
}

impl<'a> IntoIterator for &'a DocumentCollection {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
