// Route exports
pub mod account;
pub mod location;
pub mod search;

use actix_web::{web, HttpRequest, HttpResponse};
use crate::core::RestaurantSearch;
use crate::models::ErrorResponse;
use crate::services::{ReverseGeocoder, Session, SessionProvider, SupabaseClient, SupabaseError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub search: RestaurantSearch,
    pub supabase: Arc<SupabaseClient>,
    pub geocoder: Arc<ReverseGeocoder>,
    pub sessions: Arc<SessionProvider>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(search::configure)
            .configure(location::configure)
            .configure(account::configure),
    );
}

pub(crate) fn error_response(status_code: u16, error: &str, message: impl Into<String>) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    };

    match status_code {
        400 => HttpResponse::BadRequest().json(body),
        401 => HttpResponse::Unauthorized().json(body),
        404 => HttpResponse::NotFound().json(body),
        409 => HttpResponse::Conflict().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

pub(crate) fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    error_response(400, "Validation failed", errors.to_string())
}

/// Map a row store failure onto a generic user-facing error
pub(crate) fn persistence_error(err: SupabaseError, message: &str) -> HttpResponse {
    match err {
        SupabaseError::NotFound(detail) => {
            tracing::debug!("{}: {}", message, detail);
            error_response(404, "not_found", message)
        }
        SupabaseError::Conflict(detail) => {
            tracing::info!("{}: conflict {}", message, detail);
            error_response(409, "conflict", message)
        }
        other => {
            tracing::error!("{}: {}", message, other);
            error_response(500, "persistence_error", message)
        }
    }
}

pub(crate) fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Resolve the caller's session or produce a 401
pub(crate) async fn require_session(state: &AppState, req: &HttpRequest) -> Result<Session, HttpResponse> {
    state
        .sessions
        .authenticate(bearer_token(req))
        .await
        .map_err(|e| {
            tracing::debug!("Rejected request to {}: {}", req.path(), e);
            error_response(401, "unauthorized", e.to_string())
        })
}
