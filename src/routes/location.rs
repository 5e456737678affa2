use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::GeolocationError;
use crate::models::{AddressResponse, Coordinates, LocationErrorBody, LocationResponse, ResolveLocationRequest, ReverseGeocodeRequest};
use super::{error_response, validation_error, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/location/reverse", web::post().to(reverse_geocode))
        .route("/location/resolve", web::post().to(resolve_location));
}

/// POST /api/v1/location/reverse
async fn reverse_geocode(
    state: web::Data<AppState>,
    req: web::Json<ReverseGeocodeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let address = state
        .geocoder
        .reverse(Coordinates { lat: req.lat, lng: req.lng })
        .await;

    HttpResponse::Ok().json(AddressResponse { address })
}

/// Turn a client-side geolocation outcome into display state
///
/// POST /api/v1/location/resolve
///
/// Either `coordinates` (a position was obtained) or `errorCode` (the W3C
/// error code) must be present. An error code wins if both are sent.
async fn resolve_location(
    state: web::Data<AppState>,
    req: web::Json<ResolveLocationRequest>,
) -> impl Responder {
    if let Some(code) = req.error_code {
        let error = GeolocationError::from_code(code);
        tracing::info!("Client geolocation failed: {}", error.kind());

        return HttpResponse::Ok().json(LocationResponse {
            coordinates: None,
            address: None,
            error: Some(LocationErrorBody {
                kind: error.kind().to_string(),
                message: error.message().to_string(),
            }),
        });
    }

    match req.coordinates {
        Some(coords) => {
            let address = state.geocoder.reverse(coords).await;
            HttpResponse::Ok().json(LocationResponse {
                coordinates: Some(coords),
                address: Some(address),
                error: None,
            })
        }
        None => error_response(
            400,
            "Validation failed",
            "Either coordinates or errorCode is required",
        ),
    }
}
