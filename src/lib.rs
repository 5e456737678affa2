//! DineFine - restaurant discovery service
//!
//! Turns free-text dining requests into structured preferences, searches a
//! restaurant source with them and normalizes the results. Also serves the
//! chat assistant, location helpers and the account features (profile,
//! saved restaurants, tags, feedback) backed by a hosted row store.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_search_params, classify_query, normalize_results, RestaurantSearch, SearchParams};
pub use models::{PriceLevel, Restaurant, UserPreferences};
