//! Route table shared by the server and the integration tests.

use crate::handlers::{self, boq, health, questionnaire, rates, sessions};
use actix_web::{error::InternalError, web, HttpResponse};
use shared_types::ErrorResponse;

/// JSON extractor config that reports bad bodies as `{ "error": ... }` with status 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(4 * 1024 * 1024)
        .error_handler(|err, _req| {
            let body = ErrorResponse {
                error: format!("Invalid request body: {err}"),
            };
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/rates", web::get().to(rates::get_rates))
            .route("/questionnaire", web::get().to(questionnaire::get_questionnaire))
            .route(
                "/questionnaire/compile",
                web::post().to(questionnaire::compile_questionnaire),
            )
            .service(
                web::resource("/generate-boq")
                    .route(web::post().to(boq::generate_boq))
                    .default_service(web::to(handlers::method_not_allowed)),
            )
            .service(
                web::resource("/refine-boq")
                    .route(web::post().to(boq::refine_boq))
                    .default_service(web::to(handlers::method_not_allowed)),
            )
            .service(
                web::scope("/sessions")
                    .route("", web::post().to(sessions::create_session))
                    .route("/{id}", web::get().to(sessions::get_session))
                    .route("/{id}", web::delete().to(sessions::delete_session))
                    .route(
                        "/{id}/client-details",
                        web::put().to(sessions::set_client_details),
                    )
                    .route("/{id}/currency", web::put().to(sessions::set_currency))
                    .route("/{id}/generate", web::post().to(sessions::generate))
                    .route("/{id}/refine", web::post().to(sessions::refine))
                    .route("/{id}/export", web::get().to(sessions::export))
                    .route("/{id}/rooms", web::post().to(sessions::add_room))
                    .route("/{id}/rooms", web::put().to(sessions::replace_rooms))
                    .route(
                        "/{id}/rooms/{room_id}",
                        web::patch().to(sessions::rename_room),
                    )
                    .route(
                        "/{id}/rooms/{room_id}",
                        web::delete().to(sessions::delete_room),
                    )
                    .route(
                        "/{id}/rooms/{room_id}/items",
                        web::post().to(sessions::add_item),
                    )
                    .route(
                        "/{id}/rooms/{room_id}/items",
                        web::put().to(sessions::replace_items),
                    )
                    .route(
                        "/{id}/rooms/{room_id}/items/{index}",
                        web::patch().to(sessions::update_item),
                    )
                    .route(
                        "/{id}/rooms/{room_id}/items/{index}",
                        web::delete().to(sessions::delete_item),
                    ),
            ),
    );
}
