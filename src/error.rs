use thiserror::Error;

/// Errors produced by the generation and deployment pipeline.
///
/// Every variant is terminal for the current request. Nothing is retried.
#[derive(Debug, Error)]
pub enum SiteGenError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Empty response from model: {0}")]
    EmptyResponse(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SiteGenError {
    /// Stable tag used by transports when reporting the error.
    pub fn kind(&self) -> &'static str {
        match self {
            SiteGenError::Validation(_) => "validation",
            SiteGenError::EmptyResponse(_) => "empty_response",
            SiteGenError::GenerationFailed(_) => "generation_failed",
            SiteGenError::Config(_) => "configuration",
        }
    }

    /// True when the caller sent bad input, false when a dependency or setting failed.
    pub fn is_input_error(&self) -> bool {
        matches!(self, SiteGenError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, SiteGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(SiteGenError::Validation("x".into()).kind(), "validation");
        assert_eq!(SiteGenError::EmptyResponse("x".into()).kind(), "empty_response");
        assert_eq!(
            SiteGenError::GenerationFailed("x".into()).kind(),
            "generation_failed"
        );
        assert_eq!(SiteGenError::Config("x".into()).kind(), "configuration");
    }

    #[test]
    fn test_only_validation_is_input_error() {
        assert!(SiteGenError::Validation("prompt".into()).is_input_error());
        assert!(!SiteGenError::EmptyResponse("".into()).is_input_error());
        assert!(!SiteGenError::GenerationFailed("timeout".into()).is_input_error());
        assert!(!SiteGenError::Config("GEMINI_API_KEY".into()).is_input_error());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = SiteGenError::GenerationFailed("connection refused".into());
        assert_eq!(err.to_string(), "Generation failed: connection refused");
    }
}
