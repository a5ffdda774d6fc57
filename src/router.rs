use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::common::service::JwtService;
use crate::common::types::{DecodeRequest, EncodeRequest, ErrorResponse, VerifyRequest};
use crate::config::Config;

/// Builds the full application: the JSON API plus the browser UI.
pub fn create_router(config: &Config) -> Router {
    create_router_with_service(config, JwtService::new())
}

pub fn create_router_with_service(config: &Config, service: JwtService) -> Router {
    let index = config.static_dir.join("index.html");

    Router::new()
        .nest("/api", api_router(service))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .route_service("/", ServeFile::new(index))
        .layer(TraceLayer::new_for_http())
}

/// The three JSON endpoints, without static assets.
pub fn api_router(service: JwtService) -> Router {
    Router::new()
        .route("/decode", post(handle_decode))
        .route("/encode", post(handle_encode))
        .route("/verify", post(handle_verify))
        .with_state(service)
}

fn invalid_request(reason: impl std::fmt::Display) -> Response {
    debug!(%reason, "rejecting request");
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::invalid_request())).into_response()
}

async fn handle_decode(
    State(service): State<JwtService>,
    request: Result<Json<DecodeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    if let Err(reason) = request.validate() {
        return invalid_request(reason);
    }

    Json(service.decode(&request.token)).into_response()
}

async fn handle_encode(
    State(service): State<JwtService>,
    request: Result<Json<EncodeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    if let Err(reason) = request.validate() {
        return invalid_request(reason);
    }

    Json(service.encode(&request)).into_response()
}

async fn handle_verify(
    State(service): State<JwtService>,
    request: Result<Json<VerifyRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };
    if let Err(reason) = request.validate() {
        return invalid_request(reason);
    }

    let response = service.verify(&request);
    debug!(valid = response.valid, message = %response.message, "verified token");
    Json(response).into_response()
}
