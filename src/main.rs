use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use dinefine::config::{LogFormat, Settings};
use dinefine::core::RestaurantSearch;
use dinefine::routes::{self, AppState};
use dinefine::services::{AuthEvent, MockRestaurantProvider, ReverseGeocoder, SessionProvider, SupabaseClient, SupabaseTables};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(settings: &Settings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let format = std::env::var("LOG_FORMAT")
        .map(|name| LogFormat::parse(&name))
        .unwrap_or_else(|_| settings.logging.log_format());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Plain => subscriber.init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_logging(&settings);

    info!("Starting DineFine restaurant discovery service...");

    let tables = SupabaseTables {
        profiles: settings.tables.profiles.clone(),
        saved_restaurants: settings.tables.saved_restaurants.clone(),
        user_tags: settings.tables.user_tags.clone(),
        restaurant_tags: settings.tables.restaurant_tags.clone(),
        app_feedback: settings.tables.app_feedback.clone(),
    };

    let supabase = SupabaseClient::new(
        settings.supabase.url.clone(),
        settings.supabase.service_key.clone(),
        tables,
        Duration::from_secs(settings.supabase.timeout_secs.unwrap_or(30)),
    )
    .map_err(|e| {
        error!("Failed to build row store client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    info!("Row store client initialized for {}", settings.supabase.url);

    let geocoding = &settings.geocoding;
    let geocoder = ReverseGeocoder::new(
        geocoding.endpoint.clone(),
        &geocoding.user_agent,
        Duration::from_secs(geocoding.timeout_secs),
        geocoding.cache_size,
        Duration::from_secs(geocoding.cache_ttl_secs),
    )
    .map_err(|e| {
        error!("Failed to build geocoding client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let sessions = Arc::new(SessionProvider::new(
        settings.supabase.jwt_secret.as_bytes(),
        &settings.supabase.jwt_audience,
        Duration::from_secs(settings.session.leeway_secs),
        settings.session.profile_cache_size,
        Duration::from_secs(settings.session.profile_cache_ttl_secs),
    ));

    // Auth event listener
    let mut auth_events = sessions.subscribe();
    actix_web::rt::spawn(async move {
        loop {
            match auth_events.recv().await {
                Ok(AuthEvent::SignedIn { user_id }) => info!("Auth state changed: {} signed in", user_id),
                Ok(AuthEvent::SignedOut { user_id }) => info!("Auth state changed: {} signed out", user_id),
                Err(RecvError::Lagged(skipped)) => warn!("Auth event listener skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let provider = MockRestaurantProvider::new(Duration::from_millis(settings.search.mock_delay_ms));
    info!("Restaurant source: mock catalog ({} ms simulated latency)", settings.search.mock_delay_ms);

    let app_state = AppState {
        search: RestaurantSearch::new(Arc::new(provider)),
        supabase: Arc::new(supabase),
        geocoder: Arc::new(geocoder),
        sessions,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
