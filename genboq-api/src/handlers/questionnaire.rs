use crate::error::ApiResult;
use actix_web::{web, HttpResponse};
use genboq_core::{compile_requirements, default_questionnaire};
use shared_types::{CompileQuestionnaireRequest, CompileQuestionnaireResponse};

pub async fn get_questionnaire() -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(default_questionnaire()))
}

pub async fn compile_questionnaire(
    req: web::Json<CompileQuestionnaireRequest>,
) -> ApiResult<HttpResponse> {
    let requirements = compile_requirements(&default_questionnaire(), &req.answers);
    Ok(HttpResponse::Ok().json(CompileQuestionnaireResponse { requirements }))
}
