use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use shared_types::{GenerateBoqRequest, RefineBoqRequest, RoomsResponse};
use tracing::info;

/// `POST /api/generate-boq`
pub async fn generate_boq(
    state: web::Data<AppState>,
    req: web::Json<GenerateBoqRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    let (requirements, client_details) = match (req.requirements, req.client_details) {
        (Some(requirements), Some(details)) if !requirements.trim().is_empty() => {
            (requirements, details)
        }
        _ => {
            return Err(ApiError::InvalidRequest(
                "Missing requirements or clientDetails in request body".to_string(),
            ))
        }
    };

    info!(
        requirements_len = requirements.len(),
        has_budget = client_details.budget.is_some(),
        "Generating BOQ"
    );

    let rooms = state
        .generator
        .generate(&requirements, &client_details)
        .await?;
    Ok(HttpResponse::Ok().json(RoomsResponse { rooms }))
}

/// `POST /api/refine-boq`
pub async fn refine_boq(
    state: web::Data<AppState>,
    req: web::Json<RefineBoqRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    let (existing_rooms, instruction) = match (req.existing_rooms, req.refinement_prompt) {
        (Some(rooms), Some(prompt)) if !prompt.trim().is_empty() => (rooms, prompt),
        _ => {
            return Err(ApiError::InvalidRequest(
                "Missing existingRooms or refinementPrompt in request body".to_string(),
            ))
        }
    };

    info!(rooms = existing_rooms.len(), "Refining BOQ");

    let rooms = state.generator.refine(&existing_rooms, &instruction).await?;
    Ok(HttpResponse::Ok().json(RoomsResponse { rooms }))
}
