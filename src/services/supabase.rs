use crate::models::{AppFeedback, NewUserTag, Profile, ProfileUpdate, Restaurant, RestaurantTag, SavedRestaurant, UserTag};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the hosted row store
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the row store
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub profiles: String,
    pub saved_restaurants: String,
    pub user_tags: String,
    pub restaurant_tags: String,
    pub app_feedback: String,
}

impl Default for SupabaseTables {
    fn default() -> Self {
        Self {
            profiles: "profiles".to_string(),
            saved_restaurants: "saved_restaurants".to_string(),
            user_tags: "user_tags".to_string(),
            restaurant_tags: "restaurant_tags".to_string(),
            app_feedback: "app_feedback".to_string(),
        }
    }
}

/// Query filter in PostgREST syntax
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, String),
    In(&'static str, Vec<String>),
    OrderAsc(&'static str),
}

impl Filter {
    fn to_pair(&self) -> (String, String) {
        match self {
            Filter::Eq(column, value) => (column.to_string(), format!("eq.{}", value)),
            Filter::In(column, values) => {
                let quoted = values
                    .iter()
                    .map(|v| format!("\"{}\"", v.replace('"', "\\\"")))
                    .collect::<Vec<_>>()
                    .join(",");
                (column.to_string(), format!("in.({})", quoted))
            }
            Filter::OrderAsc(column) => ("order".to_string(), format!("{}.asc", column)),
        }
    }
}

/// Row store API client
///
/// Handles all persistence for the app:
/// - Profiles and saved dietary preferences
/// - Saved restaurants
/// - User tags and restaurant tag assignments
/// - App feedback
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: SupabaseTables,
}

impl SupabaseClient {
    /// Create a new row store client
    pub fn new(
        base_url: String,
        api_key: String,
        tables: SupabaseTables,
        timeout: Duration,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str, filters: &[Filter]) -> String {
        let mut query = vec![format!("select={}", urlencoding::encode("*"))];
        for filter in filters {
            let (key, value) = filter.to_pair();
            query.push(format!("{}={}", urlencoding::encode(&key), urlencoding::encode(&value)));
        }

        format!(
            "{}/rest/v1/{}?{}",
            self.base_url.trim_end_matches('/'),
            table,
            query.join("&")
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Map non-success statuses onto error variants
    async fn check(response: Response, context: &str) -> Result<Response, SupabaseError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());

        tracing::debug!("{} failed: {} - {}", context, status, body);

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SupabaseError::Unauthorized,
            StatusCode::NOT_FOUND => SupabaseError::NotFound(context.to_string()),
            StatusCode::CONFLICT => SupabaseError::Conflict(body),
            _ => SupabaseError::ApiError(format!("{}: {}", context, status)),
        })
    }

    /// Select rows matching all filters
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> Result<Vec<T>, SupabaseError> {
        let url = self.table_url(table, filters);

        tracing::debug!("Selecting from: {}", url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check(response, &format!("select {}", table)).await?;

        response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse {} rows: {}", table, e)))
    }

    /// Insert one row or an array of rows, returning the stored representation
    pub async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        rows: &B,
    ) -> Result<Vec<T>, SupabaseError> {
        let url = self.table_url(table, &[]);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        let response = Self::check(response, &format!("insert into {}", table)).await?;

        response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse inserted {} rows: {}", table, e)))
    }

    /// Patch rows matching all filters
    pub async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &B,
    ) -> Result<Vec<T>, SupabaseError> {
        let url = self.table_url(table, filters);

        let response = self
            .authorized(self.client.patch(&url))
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        let response = Self::check(response, &format!("update {}", table)).await?;

        response
            .json()
            .await
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse updated {} rows: {}", table, e)))
    }

    /// Delete rows matching all filters
    pub async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), SupabaseError> {
        let url = self.table_url(table, filters);

        let response = self.authorized(self.client.delete(&url)).send().await?;
        Self::check(response, &format!("delete from {}", table)).await?;

        Ok(())
    }

    /// Check that the REST endpoint answers
    pub async fn health_check(&self) -> Result<bool, SupabaseError> {
        let url = format!("{}/rest/v1/", self.base_url.trim_end_matches('/'));
        let response = self.authorized(self.client.get(&url)).send().await?;
        Ok(response.status().is_success())
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, SupabaseError> {
        tracing::debug!("Fetching profile for user: {}", user_id);

        self.select::<Profile>(&self.tables.profiles, &[Filter::Eq("id", user_id.to_string())])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound(format!("Profile not found for user {}", user_id)))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, SupabaseError> {
        self.update::<_, Profile>(
            &self.tables.profiles,
            &[Filter::Eq("id", user_id.to_string())],
            update,
        )
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| SupabaseError::NotFound(format!("Profile not found for user {}", user_id)))
    }

    /// Saved restaurants, optionally restricted to those carrying a tag
    pub async fn list_saved(
        &self,
        user_id: &str,
        tag_id: Option<&str>,
    ) -> Result<Vec<Restaurant>, SupabaseError> {
        let mut filters = vec![Filter::Eq("user_id", user_id.to_string())];

        if let Some(tag_id) = tag_id {
            let tagged: Vec<RestaurantTag> = self
                .select(
                    &self.tables.restaurant_tags,
                    &[
                        Filter::Eq("user_id", user_id.to_string()),
                        Filter::Eq("tag_id", tag_id.to_string()),
                    ],
                )
                .await?;

            if tagged.is_empty() {
                return Ok(Vec::new());
            }

            filters.push(Filter::In(
                "restaurant_id",
                tagged.into_iter().map(|t| t.restaurant_id).collect(),
            ));
        }

        let rows: Vec<SavedRestaurant> = self.select(&self.tables.saved_restaurants, &filters).await?;

        Ok(rows.into_iter().map(|row| row.restaurant_data).collect())
    }

    pub async fn is_saved(&self, user_id: &str, restaurant_id: &str) -> Result<bool, SupabaseError> {
        let rows: Vec<serde_json::Value> = self
            .select(
                &self.tables.saved_restaurants,
                &[
                    Filter::Eq("user_id", user_id.to_string()),
                    Filter::Eq("restaurant_id", restaurant_id.to_string()),
                ],
            )
            .await?;

        Ok(!rows.is_empty())
    }

    pub async fn save_restaurant(
        &self,
        user_id: &str,
        restaurant: &Restaurant,
    ) -> Result<(), SupabaseError> {
        let row = SavedRestaurant {
            id: None,
            user_id: user_id.to_string(),
            restaurant_id: restaurant.id.clone(),
            restaurant_data: restaurant.clone(),
            created_at: None,
        };

        let _: Vec<serde_json::Value> = self.insert(&self.tables.saved_restaurants, &row).await?;

        tracing::debug!("Saved restaurant {} for user {}", restaurant.id, user_id);
        Ok(())
    }

    pub async fn remove_saved(&self, user_id: &str, restaurant_id: &str) -> Result<(), SupabaseError> {
        self.delete(
            &self.tables.saved_restaurants,
            &[
                Filter::Eq("user_id", user_id.to_string()),
                Filter::Eq("restaurant_id", restaurant_id.to_string()),
            ],
        )
        .await
    }

    /// Tags of a user, oldest first
    pub async fn list_tags(&self, user_id: &str) -> Result<Vec<UserTag>, SupabaseError> {
        self.select(
            &self.tables.user_tags,
            &[
                Filter::Eq("user_id", user_id.to_string()),
                Filter::OrderAsc("created_at"),
            ],
        )
        .await
    }

    /// Create a tag; a duplicate name for the same user yields `Conflict`
    pub async fn create_tag(&self, tag: &NewUserTag) -> Result<UserTag, SupabaseError> {
        self.insert::<_, UserTag>(&self.tables.user_tags, tag)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::InvalidResponse("Insert returned no tag".to_string()))
    }

    pub async fn delete_tag(&self, user_id: &str, tag_id: &str) -> Result<(), SupabaseError> {
        self.delete(
            &self.tables.user_tags,
            &[
                Filter::Eq("id", tag_id.to_string()),
                Filter::Eq("user_id", user_id.to_string()),
            ],
        )
        .await
    }

    pub async fn restaurant_tags(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> Result<Vec<RestaurantTag>, SupabaseError> {
        self.select(
            &self.tables.restaurant_tags,
            &[
                Filter::Eq("user_id", user_id.to_string()),
                Filter::Eq("restaurant_id", restaurant_id.to_string()),
            ],
        )
        .await
    }

    /// Replace the tag selection of a saved restaurant
    ///
    /// Only the difference is written: removed tags are deleted in one call,
    /// new ones inserted in another. Returns the resulting tag ids.
    pub async fn set_restaurant_tags(
        &self,
        user_id: &str,
        restaurant_id: &str,
        desired: &[String],
    ) -> Result<Vec<String>, SupabaseError> {
        let current: Vec<String> = self
            .restaurant_tags(user_id, restaurant_id)
            .await?
            .into_iter()
            .map(|t| t.tag_id)
            .collect();

        let (to_add, to_remove) = diff_tag_selection(&current, desired);

        if !to_remove.is_empty() {
            self.delete(
                &self.tables.restaurant_tags,
                &[
                    Filter::Eq("user_id", user_id.to_string()),
                    Filter::Eq("restaurant_id", restaurant_id.to_string()),
                    Filter::In("tag_id", to_remove.clone()),
                ],
            )
            .await?;
        }

        if !to_add.is_empty() {
            let rows: Vec<RestaurantTag> = to_add
                .iter()
                .map(|tag_id| RestaurantTag {
                    id: None,
                    user_id: user_id.to_string(),
                    restaurant_id: restaurant_id.to_string(),
                    tag_id: tag_id.clone(),
                })
                .collect();

            let _: Vec<serde_json::Value> = self.insert(&self.tables.restaurant_tags, &rows).await?;
        }

        tracing::debug!(
            "Updated tags for {} / {}: +{} -{}",
            user_id,
            restaurant_id,
            to_add.len(),
            to_remove.len()
        );

        Ok(current
            .into_iter()
            .filter(|id| !to_remove.contains(id))
            .chain(to_add)
            .collect())
    }

    pub async fn submit_feedback(&self, feedback: &AppFeedback) -> Result<(), SupabaseError> {
        let _: Vec<serde_json::Value> = self.insert(&self.tables.app_feedback, feedback).await?;
        Ok(())
    }
}

/// Tags to insert and tags to delete to move from `current` to `desired`
pub fn diff_tag_selection(current: &[String], desired: &[String]) -> (Vec<String>, Vec<String>) {
    let mut to_add: Vec<String> = Vec::new();
    for id in desired {
        if !current.contains(id) && !to_add.contains(id) {
            to_add.push(id.clone());
        }
    }

    let to_remove = current
        .iter()
        .filter(|id| !desired.contains(id))
        .cloned()
        .collect();

    (to_add, to_remove)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> SupabaseClient {
        SupabaseClient::new(
            base_url.to_string(),
            "test_key".to_string(),
            SupabaseTables::default(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_supabase_client_creation() {
        let client = test_client("https://project.supabase.test/");

        assert_eq!(client.base_url, "https://project.supabase.test/");
        assert_eq!(client.api_key, "test_key");
    }

    #[test]
    fn test_table_url_encodes_filters() {
        let client = test_client("https://project.supabase.test/");

        let url = client.table_url(
            "saved_restaurants",
            &[
                Filter::Eq("user_id", "u-1".to_string()),
                Filter::In("restaurant_id", vec!["real-1".to_string(), "a,b".to_string()]),
            ],
        );

        assert_eq!(
            url,
            "https://project.supabase.test/rest/v1/saved_restaurants?select=%2A&user_id=eq.u-1&restaurant_id=in.%28%22real-1%22%2C%22a%2Cb%22%29"
        );
    }

    #[test]
    fn test_diff_tag_selection() {
        let current = vec!["t1".to_string(), "t2".to_string()];
        let desired = vec!["t2".to_string(), "t3".to_string(), "t3".to_string()];

        let (to_add, to_remove) = diff_tag_selection(&current, &desired);

        assert_eq!(to_add, vec!["t3"]);
        assert_eq!(to_remove, vec!["t1"]);
    }
}
