use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request body for website generation. A missing prompt deserializes as empty
/// and is rejected by validation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Request body for the simulated deployment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeployRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub prompt: String,
}

/// A complete HTML document produced from one model response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedDocument {
    pub html: String,
    #[serde(rename = "prompt")]
    pub source_prompt: String,
    #[serde(rename = "timestamp")]
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "model")]
    pub model_id: String,
}

/// Result of a simulated deployment. No hosting action backs this record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentRecord {
    #[serde(rename = "deployment_id")]
    pub id: String,
    pub url: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub message: String,
    pub simulated: bool,
}

/// Outcome of a connectivity probe against the model service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCheck {
    pub success: bool,
    pub model: String,
    pub test_response: String,
}

// Gemini generateContent request format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
}

impl GeminiRequest {
    pub fn from_text(text: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: text.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

// Gemini generateContent response format
#[derive(Debug, Deserialize, Default)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// Text of the first candidate, parts joined. Empty when the model produced nothing.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
