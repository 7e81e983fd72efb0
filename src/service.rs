use chrono::Utc;
use std::sync::Arc;

use crate::assembler;
use crate::config::Config;
use crate::deploy::DeploymentIdentifier;
use crate::error::{Result, SiteGenError};
use crate::models::{DeploymentRecord, GeneratedDocument, ModelCheck};
use crate::prompt;
use crate::transport::{GeminiTransport, Transport};
use crate::validation::{LOG_PREVIEW_CHARS, preview};

const CHECK_PROMPT: &str = "Say \"Hello World\" in HTML";
const CHECK_PREVIEW_CHARS: usize = 200;

/// Generation and packaging pipeline shared by every adapter.
pub struct WebsiteService {
    transport: Option<Arc<dyn Transport>>,
    model: String,
    identifier: DeploymentIdentifier,
}

impl WebsiteService {
    /// Build from configuration. A missing API key leaves the service without a
    /// model transport; generation then reports a configuration error.
    pub fn new(cfg: &Config) -> Result<Self> {
        let transport = match cfg.gemini.api_key.clone() {
            Some(api_key) => {
                let transport = GeminiTransport::new(
                    api_key,
                    &cfg.gemini.base_url,
                    &cfg.gemini.model,
                    cfg.get_request_timeout(),
                )?;
                tracing::info!("Website generator initialized with {}", cfg.gemini.model);
                Some(Arc::new(transport) as Arc<dyn Transport>)
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set - generation is unavailable");
                None
            }
        };

        let identifier = DeploymentIdentifier::new(cfg.deploy.url_template.clone())
            .unwrap_or_else(|e| {
                tracing::warn!("{} - using the default deployment URL template", e);
                DeploymentIdentifier::default()
            });

        Ok(Self {
            transport,
            model: cfg.gemini.model.clone(),
            identifier,
        })
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        model: impl Into<String>,
        identifier: DeploymentIdentifier,
    ) -> Self {
        Self {
            transport: Some(transport),
            model: model.into(),
            identifier,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.transport.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn transport(&self) -> Result<&Arc<dyn Transport>> {
        self.transport
            .as_ref()
            .ok_or_else(|| SiteGenError::Config("GEMINI_API_KEY not configured".to_string()))
    }

    /// Compile the prompt, call the model once and assemble the document.
    pub async fn generate(&self, user_prompt: &str) -> Result<GeneratedDocument> {
        let compiled = prompt::compile(user_prompt)?;
        let transport = self.transport()?;

        tracing::info!(
            "Generating website for prompt: {}",
            preview(user_prompt, LOG_PREVIEW_CHARS)
        );

        let raw = transport.generate(compiled.as_str()).await.map_err(|e| {
            tracing::error!("Error generating website: {}", e);
            e
        })?;

        let document = assembler::assemble(&raw, user_prompt, &self.model)?;
        tracing::info!(html_len = document.html.len(), "Website generated successfully");
        Ok(document)
    }

    /// Simulated deployment of previously generated code.
    pub fn deploy(&self, code: &str, prompt: &str) -> Result<DeploymentRecord> {
        self.identifier.identify(code, prompt, Utc::now())
    }

    /// Send a trivial prompt to confirm the model service answers.
    pub async fn check_model(&self) -> Result<ModelCheck> {
        let transport = self.transport()?;
        let text = transport.generate(CHECK_PROMPT).await?;
        Ok(ModelCheck {
            success: true,
            model: self.model.clone(),
            test_response: if text.is_empty() {
                "No response".to_string()
            } else {
                text.chars().take(CHECK_PREVIEW_CHARS).collect()
            },
        })
    }
}
