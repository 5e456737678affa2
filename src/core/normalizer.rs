use crate::models::{Coordinates, PriceLevel, RawRestaurant, Restaurant};

/// Image shown when the provider has none
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1517248135467-4c7edcad34c4?q=80&w=2070&auto=format&fit=crop";

pub const DEFAULT_RATING: f64 = 4.0;
pub const DEFAULT_CUISINE: &str = "Restaurant";
pub const UNKNOWN_ADDRESS: &str = "Address unavailable";
pub const UNKNOWN_DISTANCE: &str = "Distance unknown";
pub const UNNAMED_RESTAURANT: &str = "Unnamed restaurant";

const METERS_PER_MILE: f64 = 1609.0;

/// Normalize provider records into canonical restaurants, one-to-one and in order
pub fn normalize_results(records: Vec<RawRestaurant>) -> Vec<Restaurant> {
    records.into_iter().map(normalize_record).collect()
}

pub fn normalize_record(raw: RawRestaurant) -> Restaurant {
    let price_level = raw
        .price
        .as_ref()
        .and_then(|p| PriceLevel::from_raw(&p.to_string()))
        .unwrap_or_default();

    let cuisine_type = raw
        .categories
        .first()
        .and_then(|c| c.title.clone())
        .unwrap_or_else(|| DEFAULT_CUISINE.to_string());

    let address = raw
        .location
        .and_then(|l| l.address1)
        .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string());

    let hours: Vec<String> = raw
        .hours
        .first()
        .map(|block| {
            block
                .open
                .iter()
                .map(|period| format!("{}: {}-{}", period.day, period.start, period.end))
                .collect()
        })
        .unwrap_or_default();

    Restaurant {
        id: raw.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        name: raw.name.unwrap_or_else(|| UNNAMED_RESTAURANT.to_string()),
        image_url: raw.image_url.unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        cuisine_type,
        rating: raw.rating.map(|r| r.clamp(0.0, 5.0)).unwrap_or(DEFAULT_RATING),
        price_level,
        address,
        distance: format_distance(raw.distance),
        dietary_options: Vec::new(),
        pros: Vec::new(),
        cons: Vec::new(),
        phone: raw.phone,
        website: raw.url,
        hours: Some(hours),
        allergy_info: Vec::new(),
        coordinates: raw.coordinates.map(|c| Coordinates {
            lat: c.latitude,
            lng: c.longitude,
        }),
    }
}

/// Format a raw meter distance as miles with one decimal
pub fn format_distance(meters: Option<f64>) -> String {
    match meters {
        Some(m) if m.is_finite() => format!("{:.1} miles", m / METERS_PER_MILE),
        _ => UNKNOWN_DISTANCE.to_string(),
    }
}
