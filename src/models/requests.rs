use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{unique_labels, unique_labels_opt, Coordinates, FeedbackType, Restaurant, UserPreferences, DEFAULT_TAG_COLOR};

/// Request to turn free text into preferences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ParseQueryRequest {
    #[validate(length(min = 1, max = 1000))]
    pub query: String,
}

/// Request to search with structured preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub preferences: UserPreferences,
}

/// Chat message plus the preferences the client currently holds
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 1000))]
    pub message: String,
    #[serde(default)]
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReverseGeocodeRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

/// Outcome of a client-side geolocation attempt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveLocationRequest {
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default, alias = "error_code", rename = "errorCode")]
    pub error_code: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50))]
    #[serde(default)]
    pub username: Option<String>,
    #[validate(length(max = 32))]
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default, alias = "dietaryPreferences", deserialize_with = "unique_labels_opt")]
    pub dietary_preferences: Option<Vec<String>>,
    #[serde(default, deserialize_with = "unique_labels_opt")]
    pub allergies: Option<Vec<String>>,
}

/// Persist the dietary part of the current search preferences to the profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavePreferencesRequest {
    #[serde(default, alias = "dietary_restrictions", rename = "dietaryRestrictions", deserialize_with = "unique_labels")]
    pub dietary_restrictions: Vec<String>,
    #[serde(default, deserialize_with = "unique_labels")]
    pub allergies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRestaurantRequest {
    pub restaurant: Restaurant,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50))]
    #[serde(alias = "tagName", rename = "tag_name")]
    pub tag_name: String,
    #[serde(default = "default_tag_color")]
    pub color: String,
}

fn default_tag_color() -> String {
    DEFAULT_TAG_COLOR.to_string()
}

/// Full desired tag selection for one saved restaurant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRestaurantTagsRequest {
    #[serde(default, alias = "tag_ids", rename = "tagIds")]
    pub tag_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedListQuery {
    #[serde(default, alias = "tag_id", rename = "tagId")]
    pub tag_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[serde(alias = "feedbackType", rename = "feedback_type")]
    pub feedback_type: FeedbackType,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
    #[validate(range(min = 1, max = 5))]
    #[serde(default)]
    pub rating: Option<u8>,
    #[validate(email)]
    #[serde(default, alias = "userEmail", rename = "user_email")]
    pub user_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_rejected() {
        let req = ParseQueryRequest { query: String::new() };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_feedback_rating_bounds() {
        let mut req = FeedbackRequest {
            feedback_type: FeedbackType::Bug,
            subject: "Map".to_string(),
            message: "Pins are off".to_string(),
            rating: Some(5),
            user_email: Some("diner@example.com".to_string()),
        };
        assert!(req.validate().is_ok());

        req.rating = Some(6);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_profile_labels_deduplicated() {
        let req: UpdateProfileRequest = serde_json::from_str(
            r#"{"dietaryPreferences":["Vegan","Halal","Vegan"],"allergies":["Soy","Soy"]}"#,
        )
        .unwrap();
        assert_eq!(req.dietary_preferences, Some(vec!["Vegan".to_string(), "Halal".to_string()]));
        assert_eq!(req.allergies, Some(vec!["Soy".to_string()]));

        let req: UpdateProfileRequest = serde_json::from_str(r#"{"username":"sam"}"#).unwrap();
        assert_eq!(req.allergies, None);

        let req: SavePreferencesRequest = serde_json::from_str(
            r#"{"dietaryRestrictions":["Kosher","Kosher"],"allergies":["Eggs","Fish","Eggs"]}"#,
        )
        .unwrap();
        assert_eq!(req.dietary_restrictions, vec!["Kosher"]);
        assert_eq!(req.allergies, vec!["Eggs", "Fish"]);
    }

    #[test]
    fn test_tag_color_defaults() {
        let req: CreateTagRequest = serde_json::from_str(r#"{"tagName":"Date night"}"#).unwrap();
        assert_eq!(req.color, DEFAULT_TAG_COLOR);
    }
}
