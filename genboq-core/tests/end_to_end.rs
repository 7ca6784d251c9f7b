use async_trait::async_trait;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use genboq_core::{
    default_questionnaire, compile_requirements, load_rates, BoqError, BoqGenerator,
    Completion, FixedRateSource, GenerationSettings, Session,
};
use genboq_llm_sdk::client::LlmClient;
use genboq_llm_sdk::error::LlmError;
use genboq_llm_sdk::types::{CompletionRequest, CompletionResponse, ContentBlock, Role, Usage};
use shared_types::{Answer, Answers, ClientDetails, Currency};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

struct ScriptedClient {
    responses: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let prompt = request
            .messages
            .iter()
            .flat_map(|m| m.content.iter())
            .map(|ContentBlock::Text { text }| text.clone())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::internal("no scripted response left"));
        }
        Ok(CompletionResponse {
            content: vec![ContentBlock::Text {
                text: responses.remove(0),
            }],
            role: Role::Assistant,
            usage: Usage::default(),
            stop_reason: Some("STOP".to_string()),
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

const HUDDLE_ROOM: &str = r#"{
  "rooms": [{
    "name": "Huddle Room",
    "requirements": "4 person huddle room with video conferencing",
    "boq": [
      {"category": "Video Conferencing", "itemName": "Video Bar", "brand": "Poly",
       "modelNumber": "Studio X30", "description": "All-in-one video bar", "quantity": 1,
       "unitPrice": 2500.0, "imageUrl": "https://example.com/x30.png", "notes": ""},
      {"category": "Display", "itemName": "55\" Display", "brand": "Samsung",
       "modelNumber": "QM55C", "description": "4K commercial display", "quantity": 1,
       "unitPrice": 1200.0, "imageUrl": "", "notes": ""},
      {"category": "Cabling", "itemName": "HDMI Cable", "brand": "Extron",
       "modelNumber": "HDMI Pro", "description": "3m cable", "quantity": 2,
       "unitPrice": 25.0, "imageUrl": "", "notes": ""}
    ]
  }]
}"#;

fn answers() -> Answers {
    Answers::from([
        ("roomType".to_string(), Answer::Single("huddle".to_string())),
        ("capacity".to_string(), Answer::Single("4".to_string())),
        (
            "connectivity".to_string(),
            Answer::Multiple(vec!["wireless".to_string(), "hdmi".to_string()]),
        ),
    ])
}

#[tokio::test]
async fn test_huddle_room_generation_edit_and_export() -> anyhow::Result<()> {
    let client = Arc::new(ScriptedClient::new(&[HUDDLE_ROOM]));
    let llm: Arc<dyn LlmClient> = client.clone();
    let generator = BoqGenerator::new(llm, GenerationSettings::default());

    let mut session = Session::with_rates(load_rates(&FixedRateSource).await);
    session.set_client_details(ClientDetails {
        project_name: "Acme HQ".to_string(),
        client_name: "Acme".to_string(),
        budget: Some(5000.0),
        ..Default::default()
    })?;

    let requirements = compile_requirements(&default_questionnaire(), &answers());
    assert!(requirements.contains("Huddle Room"));

    let ticket = session.begin_request()?;
    let result = generator
        .generate(&requirements, session.client_details())
        .await;
    assert_eq!(session.complete_request(ticket, result)?, Completion::Applied);

    let prompt = client.prompts.lock().unwrap()[0].clone();
    assert!(prompt.starts_with("Client Requirements:\nGenerate a Bill of Quantities"));
    assert!(prompt.contains("approximate budget of $5000"));

    assert_eq!(session.rooms().len(), 1);
    let room_id = session.rooms()[0].id.clone();
    assert!(room_id.starts_with("room-"));
    assert_eq!(session.room_total(&room_id)?, 3750.0);
    assert_eq!(session.grand_total(), 3750.0);

    session.set_currency(Currency::Gbp)?;
    assert_eq!(session.grand_total(), 3750.0);
    assert!((session.display_grand_total() - 3750.0 * 0.79).abs() < 1e-9);

    let exported = session.export()?;
    assert_eq!(exported.file_name, "Acme HQ - Huddle Room BOQ.xlsx");
    assert_eq!(
        exported.sheet_names,
        vec!["Version", "Scope", "Terms", "Summary", "Huddle Room"]
    );

    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(exported.bytes))?;
    assert_eq!(workbook.sheet_names().len(), 5);
    let version = workbook.worksheet_range("Version")?;
    assert_eq!(
        version.get_value((2, 1)),
        Some(&Data::String("Acme HQ".to_string()))
    );
    let summary = workbook.worksheet_range("Summary")?;
    match summary.get_value((1, 2)) {
        Some(Data::Float(total)) => assert!((total - 3750.0 * 0.79).abs() < 1e-9),
        other => panic!("unexpected summary cell: {other:?}"),
    }

    assert_eq!(session.grand_total(), 3750.0);
    Ok(())
}

#[tokio::test]
async fn test_malformed_refinement_keeps_previous_rooms() -> anyhow::Result<()> {
    let client = Arc::new(ScriptedClient::new(&[HUDDLE_ROOM, "not json", r#"{"foo": 1}"#]));
    let llm: Arc<dyn LlmClient> = client.clone();
    let generator = BoqGenerator::new(llm, GenerationSettings::default());
    let mut session = Session::with_rates(load_rates(&FixedRateSource).await);

    let ticket = session.begin_request()?;
    let rooms = generator
        .generate("Huddle room for four", session.client_details())
        .await;
    session.complete_request(ticket, rooms)?;
    let before = session.rooms().to_vec();

    for _ in 0..2 {
        let ticket = session.begin_request()?;
        let result = generator
            .refine(session.rooms(), "Use Shure microphones")
            .await;
        let err = session.complete_request(ticket, result).unwrap_err();
        assert!(matches!(err, BoqError::MalformedResponse(_)));
        assert_eq!(session.rooms(), before.as_slice());
        assert!(!session.is_busy());
    }

    Ok(())
}

#[tokio::test]
async fn test_free_text_huddle_room_without_budget() -> anyhow::Result<()> {
    let client = Arc::new(ScriptedClient::new(&[HUDDLE_ROOM]));
    let llm: Arc<dyn LlmClient> = client.clone();
    let generator = BoqGenerator::new(llm, GenerationSettings::default());

    let mut session = Session::with_rates(load_rates(&FixedRateSource).await);
    session.set_client_details(ClientDetails {
        project_name: "Acme HQ".to_string(),
        ..Default::default()
    })?;

    let ticket = session.begin_request()?;
    let result = generator
        .generate(
            "Small huddle room for 4 people, wireless presentation",
            session.client_details(),
        )
        .await;
    assert_eq!(session.complete_request(ticket, result)?, Completion::Applied);

    let prompt = client.prompts.lock().unwrap()[0].clone();
    assert_eq!(
        prompt,
        "Client Requirements:\nSmall huddle room for 4 people, wireless presentation"
    );
    assert!(!prompt.contains("budget"));

    let room_id = session.rooms()[0].id.clone();
    assert_eq!(session.room_total(&room_id)?, 3750.0);

    session.set_currency(Currency::Eur)?;
    assert_eq!(session.grand_total(), 3750.0);

    let exported = session.export()?;
    assert_eq!(
        exported.sheet_names,
        vec!["Version", "Scope", "Terms", "Summary", "Huddle Room"]
    );
    Ok(())
}
