use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::deploy::DEFAULT_URL_TEMPLATE;

const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Main configuration structure for the website generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub deploy: DeployConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    /// host:port for the HTTP adapter
    pub bind: String,
    /// CORS origins; "*" allows any
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Synthetic hosting URL, `{id}` is replaced by the deployment id
    pub url_template: String,
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = ["../.env", ".env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::warn!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("SITEGEN_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match Self::from_file(&config_path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", config_path);
                    config
                }
                Err(e) => {
                    tracing::error!("{} - using defaults", e);
                    Self::default()
                }
            }
        } else {
            tracing::warn!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok());

        for warning in config.validate() {
            tracing::warn!("Config validation warning: {} - continuing anyway", warning);
        }

        config
    }

    /// Parse a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
        serde_yaml::from_str::<Config>(&contents)
            .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))
    }

    /// Apply overrides from a key lookup (the process environment in production)
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(bind) = lookup("SITEGEN_HTTP_BIND") {
            self.server.bind = bind;
        }
        if let Some(origins) = lookup("SITEGEN_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        // Gemini overrides
        if let Some(api_key) = lookup("GEMINI_API_KEY") {
            let api_key = api_key.trim().to_string();
            self.gemini.api_key = (!api_key.is_empty()).then_some(api_key);
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Some(timeout) = lookup("GEMINI_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.gemini.timeout_seconds = secs;
            }
        }

        // Deploy overrides
        if let Some(template) = lookup("SITEGEN_DEPLOY_URL_TEMPLATE") {
            self.deploy.url_template = template;
        }
    }

    /// Validate configuration, returning every problem found
    fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.bind.parse::<SocketAddr>().is_err() {
            warnings.push(format!(
                "server.bind must be host:port, got {}",
                self.server.bind
            ));
        }

        if self.gemini.api_key.is_none() {
            warnings.push("GEMINI_API_KEY environment variable must be set".to_string());
        }

        if self.gemini.timeout_seconds == 0 {
            warnings.push(format!(
                "gemini.timeout_seconds cannot be 0, using {}s",
                DEFAULT_TIMEOUT_SECONDS
            ));
        }

        if !self.deploy.url_template.contains("{id}") {
            warnings.push(format!(
                "deploy.url_template must contain {{id}}, using {}",
                DEFAULT_URL_TEMPLATE
            ));
        }

        warnings
    }

    /// Get model request timeout as Duration; zero falls back to the default
    pub fn get_request_timeout(&self) -> Duration {
        match self.gemini.timeout_seconds {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            secs => Duration::from_secs(secs),
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.server.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "sitegen".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                bind: "127.0.0.1:8000".to_string(),
                allowed_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:3001".to_string(),
                ],
            },
            gemini: GeminiConfig {
                api_key: None,
                model: "gemini-2.5-flash".to_string(),
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            },
            deploy: DeployConfig {
                url_template: DEFAULT_URL_TEMPLATE.to_string(),
            },
        }
    }
}
