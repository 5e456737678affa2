use crate::core::coordinate_fallback_address;
use crate::models::Coordinates;
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Shown when the lookup succeeds but names no place
pub const ADDRESS_NOT_FOUND: &str = "Address not found";

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Geocoder returned error: {0}")]
    ApiError(String),
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

/// Reverse geocoder backed by a Nominatim-compatible endpoint
///
/// Lookups are cached by coordinates rounded to 4 decimals (about 11 m).
pub struct ReverseGeocoder {
    endpoint: String,
    client: Client,
    cache: Cache<(i64, i64), String>,
}

impl ReverseGeocoder {
    pub fn new(
        endpoint: String,
        user_agent: &str,
        timeout: Duration,
        cache_size: u64,
        cache_ttl: Duration,
    ) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        let cache = moka::future::CacheBuilder::new(cache_size)
            .time_to_live(cache_ttl)
            .build();

        Ok(Self {
            endpoint,
            client,
            cache,
        })
    }

    /// Human-readable address for a position
    ///
    /// Never fails: lookup errors degrade to the coordinate string.
    pub async fn reverse(&self, coords: Coordinates) -> String {
        let key = cache_key(&coords);

        if let Some(address) = self.cache.get(&key).await {
            tracing::trace!("Geocode cache hit: {:?}", key);
            return address;
        }

        match self.lookup(&coords).await {
            Ok(address) => {
                self.cache.insert(key, address.clone()).await;
                address
            }
            Err(e) => {
                tracing::warn!("Reverse geocoding failed for ({}, {}): {}", coords.lat, coords.lng, e);
                coordinate_fallback_address(&coords)
            }
        }
    }

    async fn lookup(&self, coords: &Coordinates) -> Result<String, GeocodingError> {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}&zoom=18&addressdetails=1",
            self.endpoint.trim_end_matches('/'),
            coords.lat,
            coords.lng
        );

        tracing::debug!("Reverse geocoding: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GeocodingError::ApiError(response.status().to_string()));
        }

        let body: ReverseResponse = response.json().await?;

        Ok(body
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| ADDRESS_NOT_FOUND.to_string()))
    }
}

fn cache_key(coords: &Coordinates) -> (i64, i64) {
    (
        (coords.lat * 10_000.0).round() as i64,
        (coords.lng * 10_000.0).round() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geocoder(endpoint: String) -> ReverseGeocoder {
        ReverseGeocoder::new(
            endpoint,
            "dinefine-test",
            Duration::from_secs(2),
            100,
            Duration::from_secs(60),
        )
        .unwrap()
    }

    #[test]
    fn test_cache_key_rounds() {
        let a = cache_key(&Coordinates { lat: 37.77491, lng: -122.41942 });
        let b = cache_key(&Coordinates { lat: 37.77489, lng: -122.41938 });
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_reverse_uses_display_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/reverse")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("format".into(), "json".into()),
                mockito::Matcher::UrlEncoded("zoom".into(), "18".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"display_name":"1 Market St, San Francisco"}"#)
            .expect(1)
            .create_async()
            .await;

        let geocoder = geocoder(server.url());
        let coords = Coordinates { lat: 37.7936, lng: -122.3950 };

        assert_eq!(geocoder.reverse(coords).await, "1 Market St, San Francisco");
        // second call is served from cache
        assert_eq!(geocoder.reverse(coords).await, "1 Market St, San Francisco");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reverse_missing_name() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let geocoder = geocoder(server.url());
        let address = geocoder.reverse(Coordinates { lat: 0.0, lng: 0.0 }).await;
        assert_eq!(address, ADDRESS_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reverse_falls_back_on_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let geocoder = geocoder(server.url());
        let address = geocoder.reverse(Coordinates { lat: 48.8566, lng: 2.3522 }).await;
        assert_eq!(address, "Location found (48.8566, 2.3522)");
    }
}
