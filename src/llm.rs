use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Failure of one completion call. Only [`GenerateError::QuotaExhausted`] is
/// worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl GenerateError {
    pub fn is_quota(&self) -> bool {
        matches!(self, GenerateError::QuotaExhausted(_))
    }
}

/// A text-completion backend. `Ok(None)` means the service answered but
/// produced no text.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GenerateError>;
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Google Gemini `generateContent` over REST.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(client: Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl SummaryGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, GenerateError> {
        let body = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
        };

        let res = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(classify_failure(status, body));
        }

        let json: GenerateResponse = res.json().await?;
        Ok(json.into_text())
    }
}

/// 429s and `RESOURCE_EXHAUSTED` payloads are quota problems, everything
/// else is a plain service error.
fn classify_failure(status: StatusCode, body: String) -> GenerateError {
    if status == StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED") {
        GenerateError::QuotaExhausted(body)
    } else {
        GenerateError::Service { status: status.as_u16(), body }
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    const PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
        GeminiClient::new(Client::new(), &server.url(), "gemini-1.5-flash", "test-key")
    }

    #[tokio::test]
    async fn text_parts_are_joined() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{ "parts": [{ "text": "summarize me" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r###"{"candidates":[{"content":{"role":"model","parts":[{"text":"## Key ideas\n"},{"text":"- one"}]},"finishReason":"STOP"}]}"###,
            )
            .create_async()
            .await;

        let text = client_for(&server).generate("summarize me").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text.as_deref(), Some("## Key ideas\n- one"));
    }

    #[tokio::test]
    async fn empty_candidates_mean_no_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let text = client_for(&server).generate("x").await.unwrap();
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn too_many_requests_is_a_quota_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).generate("x").await.unwrap_err();
        assert!(err.is_quota());
    }

    #[tokio::test]
    async fn server_errors_are_not_quota_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":{"code":400,"status":"INVALID_ARGUMENT"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).generate("x").await.unwrap_err();
        assert!(matches!(err, GenerateError::Service { status: 400, .. }));
    }

    #[test]
    fn resource_exhausted_body_counts_as_quota() {
        let err = classify_failure(StatusCode::FORBIDDEN, "RESOURCE_EXHAUSTED".into());
        assert!(err.is_quota());
    }
}
