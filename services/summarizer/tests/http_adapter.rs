use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use summarizer_core::ports::{DocumentService, PortError, SummarizationTransport};
use summarizer_core::{request, Credential, InputSelection, SummaryRequestConfig};
use summarizer_lib::adapters::HttpSummaryAdapter;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn adapter(server: &MockServer) -> HttpSummaryAdapter {
    let base = Url::parse(&server.uri()).unwrap();
    HttpSummaryAdapter::new(reqwest::Client::new(), base)
}

fn summarize_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/summarize", server.uri())).unwrap()
}

fn pdf_selection() -> InputSelection {
    let mut selection = InputSelection::default();
    selection.select_file(b"%PDF-1.7 fake".to_vec(), "report.pdf");
    selection
}

#[tokio::test]
async fn file_upload_is_multipart_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .and(header("authorization", "Bearer secret"))
        .and(body_string_contains("name=\"wordCount\""))
        .and(body_string_contains("200"))
        .and(body_string_contains("filename=\"report.pdf\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "filename": "report.pdf", "summary": "Quarterly numbers." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = SummaryRequestConfig::new(200, None).unwrap();
    let req = request::build(&pdf_selection(), &config, &summarize_url(&server)).unwrap();
    let response = adapter(&server)
        .send(req, Some(Credential::new("secret")), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(response.summary, "Quarterly numbers.");
    assert_eq!(response.filename.as_deref(), Some("report.pdf"));
}

#[tokio::test]
async fn text_is_json_with_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize-text"))
        .and(query_param("wordCount", "150"))
        .and(query_param("pageLimit", ""))
        .and(body_json(json!({ "text": "A short paragraph to condense." })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "summary": "Condensed." })))
        .expect(1)
        .mount(&server)
        .await;

    let selection = InputSelection::Text {
        text: "A short paragraph to condense.".to_string(),
    };
    let req = request::build(&selection, &SummaryRequestConfig::default(), &summarize_url(&server))
        .unwrap();
    let response = adapter(&server)
        .send(req, None, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(response.summary, "Condensed.");
}

#[tokio::test]
async fn unauthorized_keeps_any_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": "Unauthorized", "summary": "Made anyway." })),
        )
        .mount(&server)
        .await;

    let req = request::build(
        &pdf_selection(),
        &SummaryRequestConfig::default(),
        &summarize_url(&server),
    )
    .unwrap();
    let err = adapter(&server)
        .send(req, None, CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PortError::Unauthorized {
            summary: Some("Made anyway.".to_string())
        }
    );
}

#[tokio::test]
async fn server_error_carries_detail_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            json!({ "error": "AI service returned an error", "details": "{\"detail\":\"model offline\"}" }),
        ))
        .mount(&server)
        .await;

    let req = request::build(
        &pdf_selection(),
        &SummaryRequestConfig::default(),
        &summarize_url(&server),
    )
    .unwrap();
    let err = adapter(&server)
        .send(req, None, CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PortError::Rejected {
            status: 500,
            details: Some("{\"detail\":\"model offline\"}".to_string()),
            error: Some("AI service returned an error".to_string()),
        }
    );
}

#[tokio::test]
async fn cancellation_aborts_a_slow_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "summary": "too late" }))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let req = request::build(
        &pdf_selection(),
        &SummaryRequestConfig::default(),
        &summarize_url(&server),
    )
    .unwrap();
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        adapter(&server).send(req, None, token),
    )
    .await
    .expect("cancellation should end the call promptly");
    assert_eq!(result, Err(PortError::Cancelled));
}

#[tokio::test]
async fn already_cancelled_token_never_sends() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "summary": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let req = request::build(
        &pdf_selection(),
        &SummaryRequestConfig::default(),
        &summarize_url(&server),
    )
    .unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let result = adapter(&server).send(req, None, token).await;
    assert_eq!(result, Err(PortError::Cancelled));
}

#[tokio::test]
async fn lists_documents_in_either_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "ID": 1, "CreatedAt": "2024-03-01T09:00:00Z", "Filename": "old.pdf", "Summary": "Old.", "UserID": 3 },
            { "id": 2, "createdAt": "2024-03-05T09:00:00+01:00", "filename": "new.pdf", "summary": "New." }
        ])))
        .mount(&server)
        .await;

    let documents = adapter(&server)
        .list_documents(&Credential::new("secret"))
        .await
        .unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].filename, "old.pdf");
    assert_eq!(documents[1].summary_text, "New.");
    assert_eq!(documents[1].created_at.to_rfc3339(), "2024-03-05T08:00:00+00:00");
}

#[tokio::test]
async fn listing_without_valid_credential_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = adapter(&server)
        .list_documents(&Credential::new("expired"))
        .await
        .unwrap_err();
    assert_eq!(err, PortError::Unauthorized { summary: None });
}

#[tokio::test]
async fn delete_treats_missing_document_as_done() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/documents/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/documents/8"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/documents/9"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "db down" })))
        .mount(&server)
        .await;

    let adapter = Arc::new(adapter(&server));
    let credential = Credential::new("secret");
    assert!(adapter.delete_document(&credential, 7).await.is_ok());
    assert!(adapter.delete_document(&credential, 8).await.is_ok());
    assert_eq!(
        adapter.delete_document(&credential, 9).await,
        Err(PortError::Rejected {
            status: 500,
            details: None,
            error: Some("db down".to_string()),
        })
    );
}
