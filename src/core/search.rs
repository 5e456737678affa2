use crate::core::{normalizer::normalize_results, params::build_search_params};
use crate::models::{Restaurant, UserPreferences};
use crate::services::provider::RestaurantSource;
use std::sync::Arc;

/// Search orchestrator: parameters, provider fetch, normalization
///
/// Failures never reach the caller; a failed fetch is logged and reported as
/// an empty result list, indistinguishable from zero matches.
#[derive(Clone)]
pub struct RestaurantSearch {
    source: Arc<dyn RestaurantSource>,
}

impl RestaurantSearch {
    pub fn new(source: Arc<dyn RestaurantSource>) -> Self {
        Self { source }
    }

    /// Find restaurants matching the given preferences
    pub async fn search(&self, preferences: &UserPreferences) -> Vec<Restaurant> {
        let params = build_search_params(preferences);

        tracing::debug!("Searching restaurants with parameters: {}", params.to_query_string());

        match self.source.fetch(&params).await {
            Ok(records) => {
                let restaurants = normalize_results(records);
                tracing::debug!("Normalized {} restaurants", restaurants.len());
                restaurants
            }
            Err(e) => {
                tracing::error!("Error searching restaurants: {}", e);
                Vec::new()
            }
        }
    }

    /// Full details for one restaurant; lookup failures read as not found
    pub async fn details(&self, id: &str) -> Option<Restaurant> {
        match self.source.details(id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::error!("Error getting restaurant details for {}: {}", id, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for RestaurantSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestaurantSearch").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::SearchParams;
    use crate::models::RawRestaurant;
    use crate::services::provider::{MockRestaurantProvider, ProviderError};
    use async_trait::async_trait;

    struct BrokenSource;

    #[async_trait]
    impl RestaurantSource for BrokenSource {
        async fn fetch(&self, _params: &SearchParams) -> Result<Vec<RawRestaurant>, ProviderError> {
            Err(ProviderError::ApiError("503 Service Unavailable".to_string()))
        }

        async fn details(&self, _id: &str) -> Result<Option<Restaurant>, ProviderError> {
            Err(ProviderError::InvalidResponse("truncated body".to_string()))
        }
    }

    #[tokio::test]
    async fn test_search_returns_normalized_mock_results() {
        let search = RestaurantSearch::new(Arc::new(MockRestaurantProvider::instant()));

        let results = search.search(&UserPreferences::default()).await;

        assert_eq!(results.len(), 5);
        assert_eq!(results[1].name, "Sakura Sushi");
        assert_eq!(results[1].distance, "0.5 miles");
    }

    #[tokio::test]
    async fn test_failed_fetch_becomes_empty() {
        let search = RestaurantSearch::new(Arc::new(BrokenSource));

        assert!(search.search(&UserPreferences::default()).await.is_empty());
        assert!(search.details("real-1").await.is_none());
    }
}
