use crate::models::UserPreferences;

/// Location used when the preferences carry neither coordinates nor an address
pub const DEFAULT_LOCATION: &str = "San Francisco";

/// Search radius in meters
pub const DEFAULT_RADIUS_METERS: u32 = 2000;

/// Ordered key-value query parameters for a restaurant search provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render as an `application/x-www-form-urlencoded` query string
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Build provider query parameters from search preferences
///
/// Coordinates take precedence over a free-text location; with neither,
/// the default location is used. The radius is always emitted.
pub fn build_search_params(preferences: &UserPreferences) -> SearchParams {
    let mut params = SearchParams::new();

    match (&preferences.coordinates, &preferences.location) {
        (Some(coords), _) => {
            params.append("latitude", coords.lat.to_string());
            params.append("longitude", coords.lng.to_string());
        }
        (None, Some(location)) => params.append("location", location.as_str()),
        (None, None) => params.append("location", DEFAULT_LOCATION),
    }

    params.append("radius", DEFAULT_RADIUS_METERS.to_string());

    if let Some(cuisine) = &preferences.cuisine_type {
        params.append("categories", cuisine.to_lowercase());
    }

    if let Some(price) = preferences.price_range {
        params.append("price", price.tier().to_string());
    }

    if !preferences.dietary_restrictions.is_empty() {
        params.append(
            "attributes",
            preferences.dietary_restrictions.join(",").to_lowercase(),
        );
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, PriceLevel};

    #[test]
    fn test_coordinates_take_precedence() {
        let prefs = UserPreferences {
            coordinates: Some(Coordinates { lat: 37.7749, lng: -122.4194 }),
            location: Some("Berkeley".to_string()),
            ..Default::default()
        };

        let params = build_search_params(&prefs);
        assert_eq!(params.get("latitude"), Some("37.7749"));
        assert_eq!(params.get("longitude"), Some("-122.4194"));
        assert!(!params.contains_key("location"));
    }

    #[test]
    fn test_free_text_location() {
        let prefs = UserPreferences {
            location: Some("Mission District".to_string()),
            ..Default::default()
        };

        let params = build_search_params(&prefs);
        assert_eq!(params.get("location"), Some("Mission District"));
        assert_eq!(params.get("radius"), Some("2000"));
    }

    #[test]
    fn test_full_parameter_order() {
        let prefs = UserPreferences {
            cuisine_type: Some("Japanese".to_string()),
            price_range: Some(PriceLevel::Expensive),
            dietary_restrictions: vec!["Gluten-Free".to_string(), "Halal".to_string()],
            ..Default::default()
        };

        let params = build_search_params(&prefs);
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["location", "radius", "categories", "price", "attributes"]);
        assert_eq!(params.get("categories"), Some("japanese"));
        assert_eq!(params.get("price"), Some("3"));
        assert_eq!(params.get("attributes"), Some("gluten-free,halal"));
    }

    #[test]
    fn test_query_string_is_encoded() {
        let prefs = UserPreferences {
            location: Some("Noe Valley, SF".to_string()),
            ..Default::default()
        };

        assert_eq!(
            build_search_params(&prefs).to_query_string(),
            "location=Noe%20Valley%2C%20SF&radius=2000"
        );
    }
}
