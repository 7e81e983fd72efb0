use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

#[cfg(test)]
use mockall::automock;

use crate::error::{Result, SiteGenError};
use crate::models::{GeminiRequest, GeminiResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// The generative model collaborator. One call, one round trip, no retries.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Gemini `generateContent` over HTTPS.
pub struct GeminiTransport {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl std::fmt::Debug for GeminiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiTransport")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiTransport {
    pub fn new(api_key: String, base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(SiteGenError::Config(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SiteGenError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!(
                "{}/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
        })
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start_time = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GeminiRequest::from_text(prompt))
            .send()
            .await
            .map_err(|e| {
                SiteGenError::GenerationFailed(format!("Failed to send request to Gemini API: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            SiteGenError::GenerationFailed(format!("Failed to read Gemini API response: {e}"))
        })?;

        if !status.is_success() {
            let message = extract_error_message(&body).unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "no error body".to_string()
                } else {
                    body.clone()
                }
            });
            return Err(SiteGenError::GenerationFailed(format!(
                "Gemini API error ({}): {}",
                status.as_u16(),
                message
            )));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            SiteGenError::GenerationFailed(format!("Failed to parse Gemini API response: {e}"))
        })?;

        let text = parsed.text();
        tracing::info!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            response_len = text.len(),
            "Gemini generation complete"
        );
        Ok(text)
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok()?;

    if let Some(msg) = parsed
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
    {
        return Some(msg.to_string());
    }

    parsed
        .get("message")
        .and_then(|message| message.as_str())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const PATH: &str = "/models/gemini-test:generateContent";

    fn transport_for(server: &mockito::ServerGuard) -> GeminiTransport {
        GeminiTransport::new(
            "fake-key".to_string(),
            &format!("{}/", server.url()),
            "gemini-test",
            Duration::from_secs(5),
        )
        .expect("transport should build")
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = GeminiTransport::new(String::new(), "http://localhost", "m", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, SiteGenError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let t = GeminiTransport::new("super-secret".into(), "http://localhost", "m", Duration::from_secs(1))
            .unwrap();
        assert!(!format!("{t:?}").contains("super-secret"));
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header(API_KEY_HEADER, "fake-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{"parts": [{"text": "make a site"}]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"```html\n<p>hi</p>\n```"}]}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let text = transport_for(&server).generate("make a site").await.unwrap();
        assert_eq!(text, "```html\n<p>hi</p>\n```");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_generation_failed_without_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .with_status(500)
            .with_body(r#"{"error":{"code":500,"message":"backend overloaded"}}"#)
            .expect(1)
            .create_async()
            .await;

        let err = transport_for(&server).generate("x").await.unwrap_err();
        match err {
            SiteGenError::GenerationFailed(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("backend overloaded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body_is_generation_failed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = transport_for(&server).generate("x").await.unwrap_err();
        assert!(matches!(err, SiteGenError::GenerationFailed(_)));
    }

    #[tokio::test]
    async fn test_no_candidates_yields_empty_text() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let text = transport_for(&server).generate("x").await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_generation_failed() {
        let transport = GeminiTransport::new(
            "k".into(),
            "http://127.0.0.1:1",
            "m",
            Duration::from_secs(1),
        )
        .unwrap();
        let err = transport.generate("x").await.unwrap_err();
        assert!(matches!(err, SiteGenError::GenerationFailed(_)));
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"API key not valid"}}"#).as_deref(),
            Some("API key not valid")
        );
        assert_eq!(extract_error_message(r#"{"message":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(extract_error_message("<html>502</html>"), None);
    }
}
