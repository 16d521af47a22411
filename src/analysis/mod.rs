//! Journal analysis via a local language model.
//!
//! Provides the [`Analyzer`] trait and an Ollama implementation. The analyzer
//! is created via [`create_analyzer`] from configuration. Callers that want the
//! user-facing behaviour go through [`analyze_or_fallback`], which never fails.

pub mod ollama;

use async_trait::async_trait;

use crate::config::AnalysisConfig;

/// System instruction sent with every analysis request.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful journal analysis assistant. Analyze the journal entry and provide insights.";

/// Text shown in place of an analysis when the model cannot be reached.
pub const FALLBACK_MESSAGE: &str =
    "Error connecting to Ollama. Make sure Ollama is running locally.";

/// Wrap the entry body in the user prompt template.
pub fn user_prompt(text: &str) -> String {
    format!("Please analyze this journal entry and provide insights: {text}")
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis request failed: {0}")]
    Request(String),
    #[error("analysis service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("analysis response could not be decoded: {0}")]
    Decode(String),
}

/// Something that turns a journal entry into free-text (markdown) insights.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<String, AnalysisError>;
}

/// Create an analyzer from config.
///
/// Currently only `"ollama"` is supported.
pub fn create_analyzer(config: &AnalysisConfig) -> anyhow::Result<Box<dyn Analyzer>> {
    match config.provider.as_str() {
        "ollama" => Ok(Box::new(ollama::OllamaAnalyzer::new(config)?)),
        other => anyhow::bail!("unknown analysis provider: {other}. Supported: ollama"),
    }
}

/// Run an analysis, replacing any failure with [`FALLBACK_MESSAGE`].
pub async fn analyze_or_fallback(analyzer: &dyn Analyzer, text: &str) -> String {
    match analyzer.analyze(text).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "journal analysis failed");
            FALLBACK_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl Analyzer for Failing {
        async fn analyze(&self, _text: &str) -> Result<String, AnalysisError> {
            Err(AnalysisError::Request("connection refused".into()))
        }
    }

    struct Echo;

    #[async_trait]
    impl Analyzer for Echo {
        async fn analyze(&self, text: &str) -> Result<String, AnalysisError> {
            Ok(format!("echo: {text}"))
        }
    }

    #[test]
    fn prompt_wraps_text() {
        assert_eq!(
            user_prompt("slept well"),
            "Please analyze this journal entry and provide insights: slept well"
        );
    }

    #[tokio::test]
    async fn failure_becomes_fallback() {
        assert_eq!(analyze_or_fallback(&Failing, "hi").await, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert_eq!(analyze_or_fallback(&Echo, "hi").await, "echo: hi");
    }

    #[test]
    fn unknown_provider_rejected() {
        let config = AnalysisConfig {
            provider: "carrier-pigeon".into(),
            ..AnalysisConfig::default()
        };
        let err = create_analyzer(&config).err().unwrap();
        assert!(err.to_string().contains("unknown analysis provider"));
    }
}
