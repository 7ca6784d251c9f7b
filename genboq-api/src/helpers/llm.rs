use crate::config::ApiConfig;
use genboq_core::BoqError;
use genboq_llm_sdk::client::LlmClient;
use genboq_llm_sdk::gemini::GeminiClient;
use std::sync::Arc;

/// Builds the Gemini client. A missing key is a configuration error the caller must
/// treat as fatal.
pub fn create_llm_client(config: &ApiConfig) -> Result<Arc<dyn LlmClient>, BoqError> {
    let api_key = config.gemini_api_key().ok_or_else(|| {
        BoqError::Configuration(
            "API key is not configured. Set gemini_api_key in the config file or the GEMINI_API_KEY environment variable.".to_string(),
        )
    })?;

    let mut client = GeminiClient::new(api_key)
        .map_err(|e| BoqError::Configuration(format!("Failed to create Gemini client: {e}")))?;
    if let Some(model) = config.llm.model.as_deref().filter(|m| !m.trim().is_empty()) {
        client = client.with_model(model);
    }

    tracing::info!(provider = "Google", model = client.default_model(), "LLM client ready");
    Ok(Arc::new(client))
}
