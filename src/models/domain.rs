use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Four-level ordinal price scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriceLevel {
    #[serde(rename = "$")]
    Inexpensive,
    #[default]
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Expensive,
    #[serde(rename = "$$$$")]
    VeryExpensive,
}

impl PriceLevel {
    pub const ALL: [PriceLevel; 4] = [
        PriceLevel::Inexpensive,
        PriceLevel::Moderate,
        PriceLevel::Expensive,
        PriceLevel::VeryExpensive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceLevel::Inexpensive => "$",
            PriceLevel::Moderate => "$$",
            PriceLevel::Expensive => "$$$",
            PriceLevel::VeryExpensive => "$$$$",
        }
    }

    /// Numeric tier (1-4) used by provider APIs
    pub fn tier(&self) -> u8 {
        self.as_str().len() as u8
    }

    /// Parse either dollar notation or the 1-4 numeric notation
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "$" | "1" => Some(PriceLevel::Inexpensive),
            "$$" | "2" => Some(PriceLevel::Moderate),
            "$$$" | "3" => Some(PriceLevel::Expensive),
            "$$$$" | "4" => Some(PriceLevel::VeryExpensive),
            _ => None,
        }
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Structured dining search intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceLevel>,
    #[serde(deserialize_with = "unique_labels")]
    pub dietary_restrictions: Vec<String>,
    #[serde(deserialize_with = "unique_labels")]
    pub allergies: Vec<String>,
    pub use_current_location: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            search_query: None,
            cuisine_type: None,
            price_range: None,
            dietary_restrictions: Vec::new(),
            allergies: Vec::new(),
            use_current_location: true,
            location: None,
            coordinates: None,
        }
    }
}

impl UserPreferences {
    /// Returns false if the restriction was already present
    pub fn add_dietary_restriction(&mut self, label: impl Into<String>) -> bool {
        push_unique(&mut self.dietary_restrictions, label)
    }

    /// Returns false if the allergy was already present
    pub fn add_allergy(&mut self, label: impl Into<String>) -> bool {
        push_unique(&mut self.allergies, label)
    }

    /// Overwrite every field carried by the update, leave the rest untouched
    pub fn apply(&mut self, update: PreferenceUpdate) {
        if let Some(query) = update.search_query {
            self.search_query = Some(query);
        }
        if let Some(cuisine) = update.cuisine_type {
            self.cuisine_type = Some(cuisine);
        }
        if let Some(price) = update.price_range {
            self.price_range = Some(price);
        }
        if let Some(dietary) = update.dietary_restrictions {
            self.dietary_restrictions.clear();
            for label in dietary {
                self.add_dietary_restriction(label);
            }
        }
        if let Some(allergies) = update.allergies {
            self.allergies.clear();
            for label in allergies {
                self.add_allergy(label);
            }
        }
        if let Some(use_current) = update.use_current_location {
            self.use_current_location = use_current;
        }
        if let Some(location) = update.location {
            self.location = Some(location);
        }
        if let Some(coordinates) = update.coordinates {
            self.coordinates = Some(coordinates);
        }
    }
}

/// Partial preferences produced by the chat assistant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_current_location: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl PreferenceUpdate {
    pub fn is_empty(&self) -> bool {
        *self == PreferenceUpdate::default()
    }
}

/// Append a label unless an equal one is already present
pub fn push_unique(labels: &mut Vec<String>, label: impl Into<String>) -> bool {
    let label = label.into();
    if labels.contains(&label) {
        return false;
    }
    labels.push(label);
    true
}

pub(crate) fn unique_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut labels = Vec::with_capacity(raw.len());
    for label in raw {
        push_unique(&mut labels, label);
    }
    Ok(labels)
}

pub(crate) fn unique_labels_opt<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(raw.map(|raw| {
        let mut labels = Vec::with_capacity(raw.len());
        for label in raw {
            push_unique(&mut labels, label);
        }
        labels
    }))
}

/// Canonical restaurant returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub cuisine_type: String,
    pub rating: f64,
    pub price_level: PriceLevel,
    pub address: String,
    pub distance: String,
    #[serde(default)]
    pub dietary_options: Vec<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Vec<String>>,
    #[serde(default)]
    pub allergy_info: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Scalar that providers send either as a string or as a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Number(f64),
    Text(String),
}

impl fmt::Display for RawScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawScalar::Number(n) => write!(f, "{}", n),
            RawScalar::Text(s) => f.write_str(s),
        }
    }
}

/// Provider-shaped restaurant record prior to normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRestaurant {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub categories: Vec<RawCategory>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price: Option<RawScalar>,
    #[serde(default)]
    pub location: Option<RawLocation>,
    /// Meters from the search origin
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hours: Vec<RawHours>,
    #[serde(default)]
    pub coordinates: Option<RawCoordinates>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub address1: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHours {
    #[serde(default)]
    pub open: Vec<RawOpenPeriod>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOpenPeriod {
    pub day: RawScalar,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Row in the `profiles` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub dietary_preferences: Option<Vec<String>>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
}

/// Partial update for the `profiles` table; absent fields are left as stored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
}

/// Row in the `saved_restaurants` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRestaurant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub restaurant_id: String,
    pub restaurant_data: Restaurant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub const DEFAULT_TAG_COLOR: &str = "#3B82F6";

/// Row in the `user_tags` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTag {
    pub id: String,
    pub user_id: String,
    pub tag_name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Insert payload for the `user_tags` table
#[derive(Debug, Clone, Serialize)]
pub struct NewUserTag {
    pub user_id: String,
    pub tag_name: String,
    pub color: String,
}

/// Row in the `restaurant_tags` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantTag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub restaurant_id: String,
    pub tag_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    Bug,
    Feature,
    Improvement,
    General,
}

/// Row in the `app_feedback` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppFeedback {
    pub user_id: Option<String>,
    pub feedback_type: FeedbackType,
    pub subject: String,
    pub message: String,
    pub rating: Option<u8>,
    pub user_email: Option<String>,
}
