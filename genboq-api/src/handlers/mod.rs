pub mod boq;
pub mod health;
pub mod questionnaire;
pub mod rates;
pub mod sessions;

use crate::error::{ApiError, ApiResult};
use actix_web::HttpResponse;

pub async fn method_not_allowed() -> ApiResult<HttpResponse> {
    Err(ApiError::MethodNotAllowed)
}
