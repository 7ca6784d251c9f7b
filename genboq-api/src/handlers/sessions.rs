use crate::error::{ApiError, ApiResult};
use crate::state::{lock_session, AppState, InFlightGuard, SharedSession};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use genboq_core::{compile_requirements, default_questionnaire, BoqError, Completion};
use shared_types::{
    AddItemRequest, AddRoomRequest, ClientDetails, ItemFieldUpdate, RenameRoomRequest,
    ReplaceItemsRequest, ReplaceRoomsRequest, Room, SessionGenerateRequest,
    SessionRefineRequest, SetCurrencyRequest,
};
use tracing::info;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn view(id: &str, session: &SharedSession) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(lock_session(session)?.view(id)))
}

/// Runs one edit under the session lock and returns the updated view
fn edit<T>(
    state: &AppState,
    id: &str,
    apply: impl FnOnce(&mut genboq_core::Session) -> Result<T, BoqError>,
) -> ApiResult<HttpResponse> {
    let session = state.sessions.get(id)?;
    let mut guard = lock_session(&session)?;
    apply(&mut guard)?;
    Ok(HttpResponse::Ok().json(guard.view(id)))
}

pub async fn create_session(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let (id, session) = state.create_session()?;
    let view = lock_session(&session)?.view(&id);
    Ok(HttpResponse::Created().json(view))
}

pub async fn get_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let session = state.sessions.get(&id)?;
    view(&id, &session)
}

pub async fn delete_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.sessions.remove(&path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn set_client_details(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ClientDetails>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    edit(&state, &id, |s| s.set_client_details(req.into_inner()))
}

pub async fn set_currency(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<SetCurrencyRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    edit(&state, &id, |s| s.set_currency(req.currency))
}

enum ModelCall {
    Generate {
        requirements: String,
        client_details: ClientDetails,
    },
    Refine {
        rooms: Vec<Room>,
        instruction: String,
    },
}

/// Marks the session busy, makes the call without holding the lock, then hands the
/// result back under the lock again.
async fn run_model_call(
    state: &AppState,
    id: &str,
    prepare: impl FnOnce(&genboq_core::Session) -> Result<ModelCall, BoqError>,
) -> ApiResult<HttpResponse> {
    let session = state.sessions.get(id)?;

    let (call, mut in_flight) = {
        let mut guard = lock_session(&session)?;
        let call = prepare(&guard)?;
        let ticket = guard.begin_request()?;
        (call, InFlightGuard::new(session.clone(), ticket))
    };

    let result = match call {
        ModelCall::Generate {
            requirements,
            client_details,
        } => state.generator.generate(&requirements, &client_details).await,
        ModelCall::Refine { rooms, instruction } => {
            state.generator.refine(&rooms, &instruction).await
        }
    };

    let mut guard = lock_session(&session)?;
    in_flight.disarm();
    match guard.complete_request(in_flight.ticket(), result)? {
        Completion::Applied => Ok(HttpResponse::Ok().json(guard.view(id))),
        Completion::Discarded => Err(ApiError::SessionNotFound(id.to_string())),
    }
}

pub async fn generate(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<SessionGenerateRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let req = req.into_inner();

    let requirements = match (req.requirements, req.answers) {
        (Some(text), _) if !text.trim().is_empty() => text,
        (_, Some(answers)) => compile_requirements(&default_questionnaire(), &answers),
        _ => String::new(),
    };
    if requirements.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "Provide requirements text or at least one questionnaire answer".to_string(),
        ));
    }

    info!(session_id = %id, requirements_len = requirements.len(), "Generating BOQ for session");
    run_model_call(&state, &id, |session| {
        Ok(ModelCall::Generate {
            requirements,
            client_details: session.client_details().clone(),
        })
    })
    .await
}

pub async fn refine(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<SessionRefineRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let instruction = req.into_inner().instruction;

    info!(session_id = %id, "Refining BOQ for session");
    run_model_call(&state, &id, |session| {
        if session.rooms().is_empty() {
            return Err(BoqError::empty_state(
                "Cannot refine an empty BOQ. Please generate a BOQ first.",
            ));
        }
        if instruction.trim().is_empty() {
            return Err(BoqError::InvalidRequest(
                "Refinement instruction cannot be empty".to_string(),
            ));
        }
        Ok(ModelCall::Refine {
            rooms: session.rooms().to_vec(),
            instruction,
        })
    })
    .await
}

pub async fn replace_rooms(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ReplaceRoomsRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    edit(&state, &id, |s| s.replace_rooms(req.into_inner().rooms))
}

pub async fn add_room(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<AddRoomRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let session = state.sessions.get(&id)?;
    let mut guard = lock_session(&session)?;
    guard.add_room(&req.name, &req.requirements)?;
    Ok(HttpResponse::Created().json(guard.view(&id)))
}

pub async fn rename_room(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    req: web::Json<RenameRoomRequest>,
) -> ApiResult<HttpResponse> {
    let (id, room_id) = path.into_inner();
    edit(&state, &id, |s| s.rename_room(&room_id, &req.name))
}

pub async fn delete_room(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (id, room_id) = path.into_inner();
    edit(&state, &id, |s| s.delete_room(&room_id))
}

pub async fn add_item(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    req: web::Json<AddItemRequest>,
) -> ApiResult<HttpResponse> {
    let (id, room_id) = path.into_inner();
    let session = state.sessions.get(&id)?;
    let mut guard = lock_session(&session)?;
    guard.add_item(&room_id, req.into_inner().item)?;
    Ok(HttpResponse::Created().json(guard.view(&id)))
}

pub async fn replace_items(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    req: web::Json<ReplaceItemsRequest>,
) -> ApiResult<HttpResponse> {
    let (id, room_id) = path.into_inner();
    edit(&state, &id, |s| s.replace_items(&room_id, req.into_inner().items))
}

pub async fn update_item(
    state: web::Data<AppState>,
    path: web::Path<(String, String, usize)>,
    req: web::Json<ItemFieldUpdate>,
) -> ApiResult<HttpResponse> {
    let (id, room_id, index) = path.into_inner();
    edit(&state, &id, |s| {
        s.update_item(&room_id, index, req.into_inner()).map(|_| ())
    })
}

pub async fn delete_item(
    state: web::Data<AppState>,
    path: web::Path<(String, String, usize)>,
) -> ApiResult<HttpResponse> {
    let (id, room_id, index) = path.into_inner();
    edit(&state, &id, |s| s.delete_item(&room_id, index))
}

pub async fn export(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let session = state.sessions.get(&id)?;
    let workbook = lock_session(&session)?.export()?;

    info!(session_id = %id, file_name = %workbook.file_name, "Exporting workbook");

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(workbook.file_name)],
        })
        .body(workbook.bytes))
}
