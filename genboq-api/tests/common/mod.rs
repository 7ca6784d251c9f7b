#![allow(dead_code)]

use actix_web::{test, web, App};
use genboq_api::routes::configure_routes;
use genboq_api::state::AppState;
use genboq_core::{BoqGenerator, ExchangeRates, GenerationSettings};
use genboq_llm_sdk::client::LlmClient;
use genboq_llm_sdk::error::LlmError;
use genboq_llm_sdk::types::{
    CompletionRequest, CompletionResponse, ContentBlock, Role, Usage,
};
use shared_types::RateTable;
use std::sync::{Arc, Mutex};

pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<Result<String, LlmError>>>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
    pub call_count: Arc<Mutex<usize>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        MockLlmClient {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn push_response(&self, text: &str) {
        self.responses.lock().unwrap().push(Ok(text.to_string()));
    }

    pub fn push_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push(Err(error));
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_prompt(&self) -> Option<String> {
        let requests = self.requests.lock().unwrap();
        let request = requests.last()?;
        Some(
            request
                .messages
                .iter()
                .flat_map(|m| m.content.iter())
                .map(|block| match block {
                    ContentBlock::Text { text } => text.as_str(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        *self.call_count.lock().unwrap() += 1;
        self.requests.lock().unwrap().push(request);

        let next = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                None
            } else {
                Some(responses.remove(0))
            }
        };
        let text = next.unwrap_or_else(|| Ok(r#"{"rooms": []}"#.to_string()))?;

        Ok(CompletionResponse {
            content: vec![ContentBlock::Text { text }],
            role: Role::Assistant,
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
            },
            stop_reason: Some("STOP".to_string()),
        })
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

pub fn sample_rates() -> ExchangeRates {
    ExchangeRates::from_table(RateTable::from([
        (shared_types::Currency::Eur, 0.93),
        (shared_types::Currency::Gbp, 0.79),
        (shared_types::Currency::Inr, 83.45),
    ]))
}

pub fn setup_state(mock: Arc<MockLlmClient>, rates: Option<ExchangeRates>) -> web::Data<AppState> {
    let client: Arc<dyn LlmClient> = mock;
    let state = AppState::new(BoqGenerator::new(client, GenerationSettings::default()));
    if let Some(rates) = rates {
        state.install_rates(rates).unwrap();
    }
    web::Data::new(state)
}

pub async fn setup_test_app(
    state: web::Data<AppState>,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(App::new().app_data(state).configure(configure_routes)).await
}

pub fn room_json(name: &str, items: &[(&str, u32, f64)]) -> serde_json::Value {
    let boq: Vec<serde_json::Value> = items
        .iter()
        .map(|(item_name, quantity, unit_price)| {
            serde_json::json!({
                "category": "Audio",
                "itemName": item_name,
                "brand": "Shure",
                "modelNumber": "MXA920",
                "description": "Ceiling array microphone",
                "quantity": quantity,
                "unitPrice": unit_price,
                "imageUrl": "",
                "notes": ""
            })
        })
        .collect();
    serde_json::json!({
        "name": name,
        "requirements": "Hybrid meetings",
        "boq": boq
    })
}

pub fn rooms_body(rooms: Vec<serde_json::Value>) -> String {
    serde_json::json!({ "rooms": rooms }).to_string()
}
