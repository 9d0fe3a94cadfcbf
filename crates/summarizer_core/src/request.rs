//! crates/summarizer_core/src/request.rs
//!
//! Turns an input selection and its configuration into a concrete request
//! description: which endpoint to call and what to send.

use bytes::Bytes;
use url::Url;

use crate::domain::{InputSelection, SummaryRequestConfig};
use crate::ports::ValidationError;

const FILE_KEYWORD: &str = "summarize";
const TEXT_KEYWORD: &str = "summarize-text";

/// How the payload is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Multipart,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPayload {
    /// Form fields `file`, `wordCount` and `pageLimit`.
    Multipart {
        file_name: String,
        contents: Bytes,
        word_count: u32,
        page_limit: Option<u32>,
    },
    /// JSON body `{ "text": ... }`; the knobs travel in the query string.
    Json { text: String },
}

/// A fully-built summarization request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub endpoint: Url,
    pub payload: RequestPayload,
}

impl SummaryRequest {
    pub fn content_kind(&self) -> ContentKind {
        match self.payload {
            RequestPayload::Multipart { .. } => ContentKind::Multipart,
            RequestPayload::Json { .. } => ContentKind::Json,
        }
    }
}

/// Builds the request for `selection`. Pure: no I/O and no logging.
///
/// Files go to `base_endpoint` as multipart. Text goes to the sibling
/// `summarize-text` endpoint as JSON, with `wordCount` and `pageLimit` in the query.
pub fn build(
    selection: &InputSelection,
    config: &SummaryRequestConfig,
    base_endpoint: &Url,
) -> Result<SummaryRequest, ValidationError> {
    let page_limit = config.page_limit().map(|limit| limit.get());
    match selection {
        InputSelection::Empty => Err(ValidationError::NoInput),
        InputSelection::File {
            contents,
            file_name,
        } => Ok(SummaryRequest {
            endpoint: base_endpoint.clone(),
            payload: RequestPayload::Multipart {
                file_name: file_name.clone(),
                contents: contents.clone(),
                word_count: config.word_count(),
                page_limit,
            },
        }),
        InputSelection::Text { text } => {
            let mut endpoint = text_endpoint(base_endpoint)?;
            endpoint
                .query_pairs_mut()
                .append_pair("wordCount", &config.word_count().to_string())
                .append_pair(
                    "pageLimit",
                    &page_limit.map(|l| l.to_string()).unwrap_or_default(),
                );
            Ok(SummaryRequest {
                endpoint,
                payload: RequestPayload::Json { text: text.clone() },
            })
        }
    }
}

/// Rewrites the final path segment's `summarize` to `summarize-text`.
fn text_endpoint(base_endpoint: &Url) -> Result<Url, ValidationError> {
    let invalid = || ValidationError::InvalidEndpoint(base_endpoint.to_string());

    let mut segments: Vec<String> = base_endpoint
        .path_segments()
        .ok_or_else(invalid)?
        .map(str::to_string)
        .collect();
    // A trailing slash yields an empty last segment.
    if segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    let last = segments.last_mut().ok_or_else(invalid)?;
    if !last.contains(FILE_KEYWORD) || last.contains(TEXT_KEYWORD) {
        return Err(invalid());
    }
    *last = last.replacen(FILE_KEYWORD, TEXT_KEYWORD, 1);

    let mut endpoint = base_endpoint.clone();
    endpoint.set_query(None);
    endpoint
        .path_segments_mut()
        .map_err(|_| invalid())?
        .clear()
        .extend(segments.iter());
    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    fn base() -> Url {
        Url::parse("http://localhost:8080/summarize").unwrap()
    }

    fn query(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = build(&InputSelection::Empty, &SummaryRequestConfig::default(), &base());
        assert_eq!(err, Err(ValidationError::NoInput));
    }

    #[test]
    fn file_goes_to_base_endpoint_as_multipart() {
        let selection = InputSelection::File {
            contents: Bytes::from_static(b"%PDF-1.7"),
            file_name: "report.pdf".to_string(),
        };
        let config = SummaryRequestConfig::new(200, None).unwrap();
        let request = build(&selection, &config, &base()).unwrap();

        assert_eq!(request.endpoint, base());
        assert_eq!(request.content_kind(), ContentKind::Multipart);
        assert_eq!(
            request.payload,
            RequestPayload::Multipart {
                file_name: "report.pdf".to_string(),
                contents: Bytes::from_static(b"%PDF-1.7"),
                word_count: 200,
                page_limit: None,
            }
        );
    }

    #[test]
    fn long_text_targets_text_endpoint_with_both_params() {
        let mut selection = InputSelection::default();
        selection.set_text("hello ".repeat(1200));
        assert!(selection.shows_page_limit());

        let config = SummaryRequestConfig::new(150, NonZeroU32::new(2))
            .unwrap()
            .effective_for(&selection);
        let request = build(&selection, &config, &base()).unwrap();

        assert_eq!(request.content_kind(), ContentKind::Json);
        assert_eq!(request.endpoint.path(), "/summarize-text");
        assert_eq!(
            query(&request.endpoint),
            vec![
                ("wordCount".to_string(), "150".to_string()),
                ("pageLimit".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn short_text_sends_empty_page_limit() {
        let selection = InputSelection::Text {
            text: "brief note".to_string(),
        };
        let request = build(&selection, &SummaryRequestConfig::default(), &base()).unwrap();
        assert_eq!(
            query(&request.endpoint),
            vec![
                ("wordCount".to_string(), "150".to_string()),
                ("pageLimit".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn rewrite_only_touches_last_segment() {
        let base = Url::parse("https://summarize.example.com/v1/public/summarize/").unwrap();
        let endpoint = text_endpoint(&base).unwrap();
        assert_eq!(
            endpoint.as_str(),
            "https://summarize.example.com/v1/public/summarize-text"
        );
    }

    #[test]
    fn base_without_keyword_is_invalid() {
        let base = Url::parse("http://localhost:8080/documents").unwrap();
        let selection = InputSelection::Text {
            text: "x".to_string(),
        };
        assert!(matches!(
            build(&selection, &SummaryRequestConfig::default(), &base),
            Err(ValidationError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn each_selection_yields_one_shape() {
        let selections = [
            InputSelection::File {
                contents: Bytes::new(),
                file_name: "a.pdf".to_string(),
            },
            InputSelection::Text {
                text: "abc".to_string(),
            },
        ];
        for selection in &selections {
            let request = build(selection, &SummaryRequestConfig::default(), &base()).unwrap();
            let is_text = request.endpoint.path().ends_with("summarize-text");
            assert_eq!(is_text, request.content_kind() == ContentKind::Json);
        }
    }
}
