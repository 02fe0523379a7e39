// Route exports
pub mod api;
pub mod pages;

use crate::config::DashboardSettings;
use crate::models::ErrorResponse;
use crate::services::{SpotifyAuth, SpotifyClient, SpotifyError};
use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Serialize;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub spotify: Arc<SpotifyClient>,
    pub auth: Arc<SpotifyAuth>,
    pub dashboard: DashboardSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(api::health_check))
        .configure(pages::configure)
        .service(web::scope("/api").configure(api::configure));
}

pub(crate) fn respond<T: Serialize>(status: u16, body: T) -> HttpResponse {
    HttpResponse::build(StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
        .json(body)
}

pub(crate) fn error_body(status: u16, error: &str, message: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status,
    }
}

pub(crate) fn error_response(status: u16, error: &str, message: impl Into<String>) -> HttpResponse {
    respond(status, error_body(status, error, message))
}

/// Access token for the logged-in user, or a 401 response
pub(crate) async fn access_token(state: &AppState) -> Result<String, HttpResponse> {
    state
        .auth
        .cached_token()
        .await
        .ok_or_else(|| error_response(401, "Not authenticated", "Log in at /login first"))
}

/// Error body for an upstream failure, logging it
pub(crate) fn upstream_body(context: &str, err: SpotifyError) -> ErrorResponse {
    tracing::error!("{}: {}", context, err);

    match err {
        SpotifyError::Unauthorized => error_body(401, "Not authenticated", err.to_string()),
        SpotifyError::NotFound(_) => error_body(404, context, err.to_string()),
        _ => error_body(500, context, err.to_string()),
    }
}

/// Map an upstream failure to a response
pub(crate) fn upstream_error(context: &str, err: SpotifyError) -> HttpResponse {
    let body = upstream_body(context, err);
    respond(body.status_code, body)
}
