use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{assistant, classify_query, GREETING};
use crate::models::{ChatRequest, ChatResponse, HealthResponse, ParseQueryRequest, SearchRequest, SearchResponse};
use super::{error_response, validation_error, AppState};

/// Configure health, search and chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/preferences/parse", web::post().to(parse_preferences))
        .route("/search", web::post().to(search))
        .route("/search/natural", web::post().to(natural_search))
        .route("/restaurants/{id}", web::get().to(restaurant_details))
        .route("/chat/greeting", web::get().to(chat_greeting))
        .route("/chat", web::post().to(chat));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let backend_healthy = state.supabase.health_check().await.unwrap_or(false);

    let status = if backend_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Classify free text into preferences
///
/// POST /api/v1/preferences/parse
///
/// Request body:
/// ```json
/// { "query": "cheap vegan thai near me" }
/// ```
async fn parse_preferences(req: web::Json<ParseQueryRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    HttpResponse::Ok().json(classify_query(&req.query))
}

/// Search with structured preferences
///
/// POST /api/v1/search
async fn search(state: web::Data<AppState>, req: web::Json<SearchRequest>) -> impl Responder {
    let restaurants = state.search.search(&req.preferences).await;

    tracing::info!("Search returned {} restaurants", restaurants.len());

    HttpResponse::Ok().json(SearchResponse {
        preferences: None,
        total_results: restaurants.len(),
        restaurants,
    })
}

/// Classify a free-text query and search with the result
///
/// POST /api/v1/search/natural
async fn natural_search(
    state: web::Data<AppState>,
    req: web::Json<ParseQueryRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let mut preferences = classify_query(&req.query);
    preferences.search_query = Some(req.query.clone());

    let restaurants = state.search.search(&preferences).await;

    tracing::info!(
        "Natural search for {:?} returned {} restaurants",
        req.query,
        restaurants.len()
    );

    HttpResponse::Ok().json(SearchResponse {
        preferences: Some(preferences),
        total_results: restaurants.len(),
        restaurants,
    })
}

/// GET /api/v1/restaurants/{id}
async fn restaurant_details(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match state.search.details(&id).await {
        Some(restaurant) => HttpResponse::Ok().json(restaurant),
        None => error_response(404, "not_found", format!("Restaurant {} not found", id)),
    }
}

async fn chat_greeting() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "reply": GREETING }))
}

/// One chat turn
///
/// POST /api/v1/chat
///
/// The reply's preference update is merged into the caller's preferences;
/// a search runs only when the message asks for one.
async fn chat(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let ChatRequest { message, mut preferences } = req.into_inner();
    let reply = assistant::respond(&message);

    preferences.apply(reply.update.clone());

    let restaurants = if reply.trigger_search {
        Some(state.search.search(&preferences).await)
    } else {
        None
    };

    HttpResponse::Ok().json(ChatResponse {
        reply: reply.message,
        update: reply.update,
        preferences,
        search_triggered: reply.trigger_search,
        restaurants,
    })
}
