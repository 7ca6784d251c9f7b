use crate::error::BoqError;
use crate::prompts::{generation_prompt, refinement_prompt, response_schema, SYSTEM_INSTRUCTION};
use crate::store::validate_client_details;
use genboq_llm_sdk::client::LlmClient;
use genboq_llm_sdk::types::{CompletionRequest, Message, ResponseFormat};
use serde::Deserialize;
use serde_json::Value;
use shared_types::{BoqItem, ClientDetails, Room};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Sampling and model settings for generation calls
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Empty means the client's default model
    pub model: String,
    pub generation_temperature: f32,
    /// Lower than generation so refinements stay conservative
    pub refinement_temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: String::new(),
            generation_temperature: 0.2,
            refinement_temperature: 0.1,
            max_output_tokens: 32768,
        }
    }
}

/// Room as returned by the model, before identifiers are assigned
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRoom {
    pub name: String,
    #[serde(default)]
    pub requirements: String,
    pub boq: Vec<BoqItem>,
}

impl GeneratedRoom {
    fn into_room(self, id: String) -> Room {
        Room {
            id,
            name: self.name,
            requirements: self.requirements,
            boq: self.boq,
        }
    }
}

pub fn new_room_id() -> String {
    format!("room-{}", Uuid::new_v4())
}

/// Generates and refines BOQs through the model
pub struct BoqGenerator {
    client: Arc<dyn LlmClient>,
    settings: GenerationSettings,
}

impl BoqGenerator {
    pub fn new(client: Arc<dyn LlmClient>, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Fresh rooms for the given requirements. Every room gets a new identifier.
    pub async fn generate(
        &self,
        requirements: &str,
        client_details: &ClientDetails,
    ) -> Result<Vec<Room>, BoqError> {
        if requirements.trim().is_empty() {
            return Err(BoqError::InvalidRequest(
                "Requirements text cannot be empty".to_string(),
            ));
        }
        validate_client_details(client_details)?;

        let prompt = generation_prompt(requirements, client_details);
        let text = self
            .call_model(prompt, self.settings.generation_temperature)
            .await?;
        let generated = parse_rooms(&text)?;

        tracing::info!(rooms = generated.len(), "Generated BOQ");
        Ok(assign_new_ids(generated))
    }

    /// Full replacement of `current` after applying `instruction`.
    ///
    /// Identifiers are reconciled by position, see [`reconcile_ids`].
    pub async fn refine(&self, current: &[Room], instruction: &str) -> Result<Vec<Room>, BoqError> {
        if current.is_empty() {
            return Err(BoqError::empty_state(
                "Cannot refine an empty BOQ. Please generate a BOQ first.",
            ));
        }
        if instruction.trim().is_empty() {
            return Err(BoqError::InvalidRequest(
                "Refinement instruction cannot be empty".to_string(),
            ));
        }

        let prompt = refinement_prompt(current, instruction)
            .map_err(|e| BoqError::InvalidRequest(format!("Failed to serialize rooms: {e}")))?;
        let text = self
            .call_model(prompt, self.settings.refinement_temperature)
            .await?;
        let generated = parse_rooms(&text)?;

        if generated.len() != current.len() {
            tracing::warn!(
                before = current.len(),
                after = generated.len(),
                "Refinement changed the number of rooms; identifiers matched by position"
            );
        }
        Ok(reconcile_ids(current, generated))
    }

    async fn call_model(&self, prompt: String, temperature: f32) -> Result<String, BoqError> {
        let request = CompletionRequest {
            messages: vec![Message::user(prompt)],
            max_tokens: self.settings.max_output_tokens,
            model: self.settings.model.clone(),
            system: Some(SYSTEM_INSTRUCTION.to_string()),
            temperature: Some(temperature),
            top_p: None,
            stop_sequences: None,
            response_format: Some(ResponseFormat::JsonSchema {
                schema: response_schema(),
            }),
        };

        let start = Instant::now();
        let response = self.client.complete(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                provider = self.client.provider_name(),
                retryable = e.is_retryable(),
                "Generation call failed"
            );
            BoqError::from(e)
        })?;

        tracing::debug!(
            provider = self.client.provider_name(),
            model = self.client.model_name(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Generation call completed"
        );

        Ok(response.text())
    }
}

/// Strictly parse a model response. Anything that does not match the schema fails as a whole.
pub fn parse_rooms(text: &str) -> Result<Vec<GeneratedRoom>, BoqError> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| {
        tracing::error!(error = %e, "Model response is not valid JSON");
        BoqError::malformed(format!("response is not valid JSON: {e}"))
    })?;

    let rooms = value
        .get("rooms")
        .and_then(Value::as_array)
        .ok_or_else(|| BoqError::malformed("expected a top-level `rooms` array"))?;

    rooms
        .iter()
        .enumerate()
        .map(|(index, room)| {
            let mut room: GeneratedRoom = serde_json::from_value(room.clone())
                .map_err(|e| BoqError::malformed(format!("room {}: {e}", index + 1)))?;
            validate_room(index, &mut room)?;
            Ok(room)
        })
        .collect()
}

fn validate_room(index: usize, room: &mut GeneratedRoom) -> Result<(), BoqError> {
    for (line, item) in room.boq.iter_mut().enumerate() {
        if !item.unit_price.is_finite() || item.unit_price < 0.0 {
            return Err(BoqError::malformed(format!(
                "room {}, item {}: unit price must be a non-negative number",
                index + 1,
                line + 1
            )));
        }
        if item
            .image_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            item.image_url = None;
        }
    }
    Ok(())
}

pub fn assign_new_ids(generated: Vec<GeneratedRoom>) -> Vec<Room> {
    generated
        .into_iter()
        .map(|room| room.into_room(new_room_id()))
        .collect()
}

/// The i-th generated room takes the identifier of the i-th existing room, when there is one.
///
/// Positional only: if the model reorders, merges or drops rooms, identity silently
/// degrades to fresh identifiers for the unmatched tail.
pub fn reconcile_ids(existing: &[Room], generated: Vec<GeneratedRoom>) -> Vec<Room> {
    generated
        .into_iter()
        .enumerate()
        .map(|(index, room)| {
            let id = existing
                .get(index)
                .map(|r| r.id.clone())
                .unwrap_or_else(new_room_id);
            room.into_room(id)
        })
        .collect()
}
