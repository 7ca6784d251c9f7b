use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ServerStatus {
    pub status: String,
    pub version: String,
    pub uptime: u64,
    pub sessions: usize,
    pub rates_loaded: bool,
}

pub async fn health_check(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let uptime = state
        .start_time
        .elapsed()
        .map_err(|e| ApiError::Internal(format!("Failed to calculate uptime: {e}")))?
        .as_secs();

    Ok(HttpResponse::Ok().json(ServerStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime,
        sessions: state.sessions.len(),
        rates_loaded: state.rates()?.is_loaded(),
    }))
}
