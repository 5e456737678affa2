// Unit tests for DineFine

use dinefine::core::{
    assistant::respond,
    build_search_params, classify_query,
    location::{coordinate_fallback_address, GeolocationError},
    normalizer::{normalize_record, UNKNOWN_DISTANCE},
};
use dinefine::models::{Coordinates, PriceLevel, RawRestaurant, RawScalar, UserPreferences};
use dinefine::services::diff_tag_selection;

fn raw_with_price(price: RawScalar) -> RawRestaurant {
    RawRestaurant {
        id: Some("r-1".to_string()),
        name: Some("Test Kitchen".to_string()),
        price: Some(price),
        ..Default::default()
    }
}

#[test]
fn test_italian_keywords_any_case() {
    for query in ["Italian please", "PASTA night", "a pIzZa place", "spaghetti or pasta with sushi"] {
        assert_eq!(classify_query(query).cuisine_type.as_deref(), Some("Italian"), "query: {}", query);
    }
}

#[test]
fn test_cuisine_order_first_match_wins() {
    // Japanese comes before Thai in the rule order
    assert_eq!(classify_query("thai or sushi").cuisine_type.as_deref(), Some("Japanese"));
    assert_eq!(classify_query("spicy thai").cuisine_type.as_deref(), Some("Indian"));
    assert_eq!(classify_query("a nice dinner").cuisine_type, None);
}

#[test]
fn test_gluten_free_added_once() {
    let prefs = classify_query("gluten free, really gluten free, gluten-free only");
    let count = prefs
        .dietary_restrictions
        .iter()
        .filter(|d| d.as_str() == "Gluten-Free")
        .count();
    assert_eq!(count, 1);
}

#[test]
fn test_gluten_without_free_is_not_dietary() {
    let prefs = classify_query("is there gluten in this");
    assert!(!prefs.dietary_restrictions.contains(&"Gluten-Free".to_string()));
}

#[test]
fn test_peanut_patterns_add_peanuts_once() {
    for query in ["no peanuts", "I have a peanut allergy", "peanut-free please", "no peanuts, peanut allergy, peanut-free"] {
        let prefs = classify_query(query);
        let count = prefs.allergies.iter().filter(|a| a.as_str() == "Peanuts").count();
        assert_eq!(count, 1, "query: {}", query);
    }
}

#[test]
fn test_dietary_restrictions_independent() {
    let prefs = classify_query("vegan halal kosher dairy free");
    assert_eq!(prefs.dietary_restrictions, vec!["Vegan", "Halal", "Kosher", "Dairy-Free"]);
    assert_eq!(prefs.cuisine_type.as_deref(), Some("Vegetarian"));
}

#[test]
fn test_price_detection() {
    assert_eq!(classify_query("something cheap").price_range, Some(PriceLevel::Inexpensive));
    assert_eq!(classify_query("mid-range bistro").price_range, Some(PriceLevel::Moderate));
    assert_eq!(classify_query("high-end steak").price_range, Some(PriceLevel::Expensive));
    assert_eq!(classify_query("luxury tasting menu").price_range, Some(PriceLevel::VeryExpensive));
    assert_eq!(classify_query("dinner").price_range, None);
}

#[test]
fn test_unrecognized_query_yields_defaults() {
    let prefs = classify_query("hello there");
    assert_eq!(prefs, UserPreferences::default());
    assert!(prefs.use_current_location);
}

#[test]
fn test_price_string_and_tier_normalize_identically() {
    let symbol = normalize_record(raw_with_price(RawScalar::Text("$$".to_string())));
    let tier = normalize_record(raw_with_price(RawScalar::Text("2".to_string())));

    assert_eq!(symbol.price_level, PriceLevel::Moderate);
    assert_eq!(symbol.price_level, tier.price_level);
}

#[test]
fn test_numeric_price_normalizes() {
    let restaurant = normalize_record(raw_with_price(RawScalar::Number(3.0)));
    assert_eq!(restaurant.price_level, PriceLevel::Expensive);
}

#[test]
fn test_unknown_price_defaults_to_moderate() {
    let restaurant = normalize_record(raw_with_price(RawScalar::Text("7".to_string())));
    assert_eq!(restaurant.price_level, PriceLevel::Moderate);
}

#[test]
fn test_price_four_without_rating() {
    let restaurant = normalize_record(raw_with_price(RawScalar::Text("4".to_string())));

    assert_eq!(restaurant.price_level, PriceLevel::VeryExpensive);
    assert_eq!(restaurant.rating, 4.0);
}

#[test]
fn test_absent_distance_is_unknown() {
    let restaurant = normalize_record(RawRestaurant::default());
    assert_eq!(restaurant.distance, UNKNOWN_DISTANCE);
}

#[test]
fn test_coordinates_params_have_no_location() {
    let prefs = UserPreferences {
        coordinates: Some(Coordinates { lat: 1.0, lng: 2.0 }),
        ..Default::default()
    };

    let params = build_search_params(&prefs);

    assert_eq!(params.get("latitude"), Some("1"));
    assert_eq!(params.get("longitude"), Some("2"));
    assert!(!params.contains_key("location"));
}

#[test]
fn test_default_location_params() {
    let params = build_search_params(&UserPreferences::default());

    assert_eq!(params.get("location"), Some("San Francisco"));
    assert_eq!(params.get("radius"), Some("2000"));
    assert!(!params.contains_key("categories"));
    assert!(!params.contains_key("price"));
    assert!(!params.contains_key("attributes"));
}

#[test]
fn test_full_params() {
    let prefs = UserPreferences {
        location: Some("Oakland".to_string()),
        cuisine_type: Some("Thai".to_string()),
        price_range: Some(PriceLevel::Expensive),
        dietary_restrictions: vec!["Vegan".to_string(), "Gluten-Free".to_string()],
        ..Default::default()
    };

    let params = build_search_params(&prefs);

    assert_eq!(params.get("location"), Some("Oakland"));
    assert_eq!(params.get("categories"), Some("thai"));
    assert_eq!(params.get("price"), Some("3"));
    assert_eq!(params.get("attributes"), Some("vegan,gluten-free"));
}

#[test]
fn test_chat_find_triggers_search_without_update() {
    let reply = respond("find me something");
    assert!(reply.trigger_search);
    assert!(reply.update.is_empty());
}

#[test]
fn test_chat_cuisine_branch_beats_search() {
    let reply = respond("find me pizza");
    assert!(!reply.trigger_search);
    assert_eq!(reply.update.cuisine_type.as_deref(), Some("Italian"));
}

#[test]
fn test_geolocation_error_copy() {
    assert_eq!(
        GeolocationError::from_code(1).message(),
        "Location permission denied. Please allow location access."
    );
    assert_eq!(GeolocationError::from_code(42), GeolocationError::Unknown);
}

#[test]
fn test_fallback_address() {
    let coords = Coordinates { lat: -33.868820, lng: 151.209296 };
    assert_eq!(coordinate_fallback_address(&coords), "Location found (-33.8688, 151.2093)");
}

#[test]
fn test_tag_diff_no_change() {
    let current = vec!["a".to_string(), "b".to_string()];
    let (to_add, to_remove) = diff_tag_selection(&current, &current);
    assert!(to_add.is_empty());
    assert!(to_remove.is_empty());
}
