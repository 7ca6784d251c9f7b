mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{room_json, rooms_body, setup_state, setup_test_app, MockLlmClient};
use genboq_llm_sdk::error::LlmError;
use serde_json::{json, Value};
use std::sync::Arc;

#[actix_rt::test]
async fn test_generate_boq_returns_rooms_with_ids() {
    let mock = Arc::new(MockLlmClient::new());
    mock.push_response(&rooms_body(vec![room_json("Huddle", &[("Mic", 1, 2000.0)])]));
    let app = setup_test_app(setup_state(mock.clone(), None)).await;

    let req = test::TestRequest::post()
        .uri("/api/generate-boq")
        .set_json(json!({
            "requirements": "Huddle room for 4",
            "clientDetails": {"projectName": "Acme", "budget": 8000}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let rooms = body["rooms"].as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert!(rooms[0]["id"].as_str().unwrap().starts_with("room-"));
    assert_eq!(rooms[0]["boq"][0]["unitPrice"], 2000.0);

    let prompt = mock.last_prompt().unwrap();
    assert!(prompt.contains("Client Requirements:\nHuddle room for 4"));
    assert!(prompt.contains("budget of $8000"));
}

#[actix_rt::test]
async fn test_generate_boq_missing_fields() {
    let mock = Arc::new(MockLlmClient::new());
    let app = setup_test_app(setup_state(mock.clone(), None)).await;

    for body in [
        json!({"requirements": "Huddle"}),
        json!({"clientDetails": {}}),
        json!({"requirements": "  ", "clientDetails": {}}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/generate-boq")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["error"],
            "Missing requirements or clientDetails in request body"
        );
    }
    assert_eq!(mock.get_call_count(), 0);
}

#[actix_rt::test]
async fn test_non_post_is_method_not_allowed() {
    let mock = Arc::new(MockLlmClient::new());
    let app = setup_test_app(setup_state(mock, None)).await;

    for uri in ["/api/generate-boq", "/api/refine-boq"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Method Not Allowed");
    }
}

#[actix_rt::test]
async fn test_malformed_model_output_is_bad_gateway() {
    let mock = Arc::new(MockLlmClient::new());
    mock.push_response("not json");
    mock.push_response(r#"{"foo": 1}"#);
    let app = setup_test_app(setup_state(mock, None)).await;

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/generate-boq")
            .set_json(json!({"requirements": "Boardroom", "clientDetails": {}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("unexpected format"));
    }
}

#[actix_rt::test]
async fn test_transport_failure_hides_details() {
    let mock = Arc::new(MockLlmClient::new());
    mock.push_error(LlmError::api_error(503, "upstream overloaded".to_string()));
    let app = setup_test_app(setup_state(mock, None)).await;

    let req = test::TestRequest::post()
        .uri("/api/generate-boq")
        .set_json(json!({"requirements": "Boardroom", "clientDetails": {}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert!(!body["error"].as_str().unwrap().contains("overloaded"));
}

#[actix_rt::test]
async fn test_refine_boq_preserves_ids_by_position() {
    let mock = Arc::new(MockLlmClient::new());
    mock.push_response(&rooms_body(vec![
        room_json("A", &[("Mic", 2, 10.0)]),
        room_json("B", &[]),
        room_json("C", &[]),
    ]));
    let app = setup_test_app(setup_state(mock.clone(), None)).await;

    let req = test::TestRequest::post()
        .uri("/api/refine-boq")
        .set_json(json!({
            "existingRooms": [
                {"id": "room-a", "name": "A", "requirements": "", "boq": []},
                {"id": "room-b", "name": "B", "requirements": "", "boq": []}
            ],
            "refinementPrompt": "Add a lobby"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["rooms"][0]["id"], "room-a");
    assert_eq!(body["rooms"][1]["id"], "room-b");
    let third = body["rooms"][2]["id"].as_str().unwrap();
    assert!(third.starts_with("room-") && third != "room-a" && third != "room-b");

    assert!(mock
        .last_prompt()
        .unwrap()
        .contains("apply the following refinement: \"Add a lobby\""));
}

#[actix_rt::test]
async fn test_refine_boq_validation() {
    let mock = Arc::new(MockLlmClient::new());
    let app = setup_test_app(setup_state(mock.clone(), None)).await;

    let req = test::TestRequest::post()
        .uri("/api/refine-boq")
        .set_json(json!({"existingRooms": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/refine-boq")
        .set_json(json!({"existingRooms": [], "refinementPrompt": "Use Biamp"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Cannot refine an empty BOQ. Please generate a BOQ first."
    );

    assert_eq!(mock.get_call_count(), 0);
}

#[actix_rt::test]
async fn test_invalid_json_body_is_bad_request() {
    let mock = Arc::new(MockLlmClient::new());
    let app = setup_test_app(setup_state(mock, None)).await;

    let req = test::TestRequest::post()
        .uri("/api/generate-boq")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[actix_rt::test]
async fn test_questionnaire_and_compile() {
    let mock = Arc::new(MockLlmClient::new());
    let app = setup_test_app(setup_state(mock, None)).await;

    let req = test::TestRequest::get().uri("/api/questionnaire").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let sections = body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 4);
    assert_eq!(sections[0]["title"], "Room Details");
    assert_eq!(sections[0]["questions"][0]["type"], "select");

    let req = test::TestRequest::post()
        .uri("/api/questionnaire/compile")
        .set_json(json!({"answers": {"audioNeeds": ["table_mics", "speech"]}}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let requirements = body["requirements"].as_str().unwrap();
    assert!(requirements.contains("- Section: Audio & Conferencing"));
    assert!(requirements.contains(
        "(Speech Reinforcement), Tabletop microphones for flexibility"
    ));

    let req = test::TestRequest::post()
        .uri("/api/questionnaire/compile")
        .set_json(json!({"answers": {}}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["requirements"], "");
}

#[actix_rt::test]
async fn test_rates_and_health() {
    let mock = Arc::new(MockLlmClient::new());
    let state = setup_state(mock, None);
    let app = setup_test_app(state.clone()).await;

    let req = test::TestRequest::get().uri("/api/rates").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["loaded"], false);
    assert_eq!(body["rates"]["INR"], 1.0);

    state.install_rates(common::sample_rates()).unwrap();

    let req = test::TestRequest::get().uri("/api/rates").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["base"], "USD");
    assert_eq!(body["loaded"], true);
    assert_eq!(body["rates"]["INR"], 83.45);
    let currencies = body["currencies"].as_array().unwrap();
    assert_eq!(currencies.len(), 4);
    assert!(currencies.iter().all(|c| c["available"] == true));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["rates_loaded"], true);
}

#[actix_rt::test]
async fn test_generate_boq_rejects_unusable_budget() {
    let mock = Arc::new(MockLlmClient::new());
    let app = setup_test_app(setup_state(mock.clone(), None)).await;

    for budget in [json!(-100), json!(1e20)] {
        let req = test::TestRequest::post()
            .uri("/api/generate-boq")
            .set_json(json!({
                "requirements": "Boardroom for 12",
                "clientDetails": {"projectName": "Acme", "budget": budget}
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("budget"));
    }
    assert_eq!(mock.get_call_count(), 0);
}
