// Core pipeline exports
pub mod assistant;
pub mod classifier;
pub mod location;
pub mod normalizer;
pub mod params;
pub mod search;

pub use assistant::{respond, AssistantReply, GREETING};
pub use classifier::classify_query;
pub use location::{coordinate_fallback_address, GeolocationError};
pub use normalizer::{format_distance, normalize_record, normalize_results};
pub use params::{build_search_params, SearchParams, DEFAULT_LOCATION, DEFAULT_RADIUS_METERS};
pub use search::RestaurantSearch;
