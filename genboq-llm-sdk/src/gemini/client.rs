use super::types::*;
use crate::error::LlmError;
use crate::models::gemini::GEMINI_2_5_PRO;
use crate::types::{CompletionRequest, CompletionResponse, ContentBlock, ResponseFormat, Role, Usage};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::authentication("API key cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::Network { source: e })?;

        Ok(Self {
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: GEMINI_2_5_PRO.to_string(),
            http_client,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Model used when a request does not name one
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn default_model(&self) -> &str {
        &self.model
    }

    pub async fn generate_content(
        &self,
        model: impl Into<String>,
        request: GeminiGenerateContentRequest,
    ) -> Result<GeminiGenerateContentResponse, LlmError> {
        let model = model.into();
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| LlmError::authentication(format!("Invalid API key format: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(model = %model, "Sending Gemini generateContent request");

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&error_body) {
                return Err(Self::map_error(
                    error_response.error.code,
                    error_response.error.message,
                ));
            }

            return Err(LlmError::api_error(status.as_u16(), error_body));
        }

        let generate_response = response
            .json::<GeminiGenerateContentResponse>()
            .await
            .map_err(|e| LlmError::internal(format!("Failed to parse response: {}", e)))?;

        Ok(generate_response)
    }

    fn map_error(status: u16, message: String) -> LlmError {
        match status {
            400 => LlmError::invalid_request(message),
            401 | 403 => LlmError::Authentication { message },
            429 => LlmError::rate_limit(message, None),
            _ => LlmError::api_error(status, message),
        }
    }

    pub fn message_builder(&self) -> super::builder::MessageBuilder<'_> {
        super::builder::MessageBuilder::new(self)
    }
}

#[async_trait]
impl crate::client::LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut builder = self.message_builder().max_output_tokens(request.max_tokens);

        if !request.model.is_empty() {
            builder = builder.model(request.model);
        }
        if let Some(system) = request.system {
            builder = builder.system(system);
        }
        if let Some(temperature) = request.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(top_p) = request.top_p {
            builder = builder.top_p(top_p);
        }
        if let Some(stop) = request.stop_sequences {
            builder = builder.stop_sequences(stop);
        }
        builder = match request.response_format {
            Some(ResponseFormat::JsonObject) => builder.response_mime_type("application/json"),
            Some(ResponseFormat::JsonSchema { schema }) => builder.response_json_schema(schema),
            Some(ResponseFormat::Text) | None => builder,
        };

        for message in request.messages {
            let text = message
                .content
                .into_iter()
                .map(|block| match block {
                    ContentBlock::Text { text } => text,
                })
                .collect::<Vec<_>>()
                .join("\n");

            builder = match message.role {
                Role::User => builder.user_message(text),
                Role::Assistant => builder.model_message(text),
                Role::System => {
                    return Err(LlmError::invalid_request(
                        "System messages should be provided via the system parameter",
                    ));
                }
            };
        }

        let response = builder.send().await?;

        let candidate = response.candidates.first();
        let text = response.text().ok_or_else(|| {
            LlmError::no_candidate(candidate.and_then(|c| c.finish_reason.clone()))
        })?;
        let usage = response.usage_metadata.clone().unwrap_or_default();

        Ok(CompletionResponse {
            content: vec![ContentBlock::Text { text }],
            role: Role::Assistant,
            usage: Usage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
            stop_reason: candidate.and_then(|c| c.finish_reason.clone()),
        })
    }

    fn provider_name(&self) -> &str {
        "Google"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmClient;

    #[test]
    fn test_client_creation() {
        let client = GeminiClient::new("test-key");
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_creation_empty_key() {
        let client = GeminiClient::new("");
        assert!(client.is_err());
    }

    #[test]
    fn test_with_model_overrides_default() {
        let client = GeminiClient::new("test-key")
            .unwrap()
            .with_model("gemini-2.5-flash");
        assert_eq!(client.model_name(), "gemini-2.5-flash");
        assert_eq!(client.provider_name(), "Google");
    }

    #[test]
    fn test_map_error_statuses() {
        assert!(matches!(
            GeminiClient::map_error(403, "denied".to_string()),
            LlmError::Authentication { .. }
        ));
        assert!(matches!(
            GeminiClient::map_error(429, "slow down".to_string()),
            LlmError::RateLimit { .. }
        ));
        assert!(matches!(
            GeminiClient::map_error(503, "overloaded".to_string()),
            LlmError::Api { status: 503, .. }
        ));
    }
}
