use crate::core::params::SearchParams;
use crate::models::{Coordinates, PriceLevel, RawCategory, RawCoordinates, RawLocation, RawRestaurant, RawScalar, Restaurant};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a restaurant data source
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Source of raw restaurant records
///
/// This is the seam where a real places provider plugs in; it receives the
/// query parameters built from the user's preferences.
#[async_trait]
pub trait RestaurantSource: Send + Sync {
    /// Fetch raw records for a search
    async fn fetch(&self, params: &SearchParams) -> Result<Vec<RawRestaurant>, ProviderError>;

    /// Look up full details for one restaurant
    async fn details(&self, id: &str) -> Result<Option<Restaurant>, ProviderError>;
}

/// Stand-in provider that serves a fixed catalog after a simulated network delay
///
/// Search parameters are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct MockRestaurantProvider {
    delay: Duration,
}

impl MockRestaurantProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Provider with no simulated latency
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for MockRestaurantProvider {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl RestaurantSource for MockRestaurantProvider {
    async fn fetch(&self, params: &SearchParams) -> Result<Vec<RawRestaurant>, ProviderError> {
        tracing::debug!("Mock provider called with parameters: {}", params.to_query_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(mock_search_results())
    }

    async fn details(&self, id: &str) -> Result<Option<Restaurant>, ProviderError> {
        Ok(mock_restaurant_details(id))
    }
}

/// One restaurant in the mock catalog
struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    image: &'static str,
    category: &'static str,
    rating: f64,
    price: &'static str,
    address: &'static str,
    distance_meters: f64,
    phone: &'static str,
    slug: &'static str,
    coordinates: (f64, f64),
}

const MOCK_CATALOG: [CatalogEntry; 5] = [
    CatalogEntry {
        id: "real-1",
        name: "The Local Trattoria",
        image: "photo-1579684947550-22e945225d9a",
        category: "Italian",
        rating: 4.8,
        price: "$$",
        address: "123 Main St, Nearby Town",
        distance_meters: 1200.0,
        phone: "+1-555-123-4567",
        slug: "local-trattoria",
        coordinates: (37.7749, -122.4194),
    },
    CatalogEntry {
        id: "real-2",
        name: "Sakura Sushi",
        image: "photo-1579871494447-9811cf80d66c",
        category: "Japanese",
        rating: 4.5,
        price: "$$$",
        address: "456 Oak St, Nearby Town",
        distance_meters: 800.0,
        phone: "+1-555-987-6543",
        slug: "sakura-sushi",
        coordinates: (37.7739, -122.4312),
    },
    CatalogEntry {
        id: "real-3",
        name: "Green Garden Vegan",
        image: "photo-1546241072-48010ad2862c",
        category: "Vegetarian",
        rating: 4.7,
        price: "$$",
        address: "789 Pine Ave, Nearby Town",
        distance_meters: 1500.0,
        phone: "+1-555-789-0123",
        slug: "green-garden",
        coordinates: (37.7831, -122.4100),
    },
    CatalogEntry {
        id: "real-4",
        name: "Spice Paradise",
        image: "photo-1535850836387-0f9dfce30846",
        category: "Indian",
        rating: 4.6,
        price: "$$",
        address: "321 Curry Lane, Nearby Town",
        distance_meters: 1100.0,
        phone: "+1-555-456-7890",
        slug: "spice-paradise",
        coordinates: (37.7712, -122.4231),
    },
    CatalogEntry {
        id: "real-5",
        name: "Taco Fiesta",
        image: "photo-1565299585323-38d6b0865b47",
        category: "Mexican",
        rating: 4.3,
        price: "$",
        address: "567 Salsa Street, Nearby Town",
        distance_meters: 950.0,
        phone: "+1-555-234-5678",
        slug: "taco-fiesta",
        coordinates: (37.7792, -122.4153),
    },
];

impl CatalogEntry {
    fn to_raw(&self) -> RawRestaurant {
        RawRestaurant {
            id: Some(self.id.to_string()),
            name: Some(self.name.to_string()),
            image_url: Some(format!(
                "https://images.unsplash.com/{}?q=80&w=2070&auto=format&fit=crop",
                self.image
            )),
            categories: vec![RawCategory { title: Some(self.category.to_string()) }],
            rating: Some(self.rating),
            price: Some(RawScalar::Text(self.price.to_string())),
            location: Some(RawLocation { address1: Some(self.address.to_string()) }),
            distance: Some(self.distance_meters),
            phone: Some(self.phone.to_string()),
            url: Some(format!("https://example.com/{}", self.slug)),
            hours: Vec::new(),
            coordinates: Some(RawCoordinates {
                latitude: self.coordinates.0,
                longitude: self.coordinates.1,
            }),
        }
    }
}

/// The five records the mock search endpoint always returns
pub fn mock_search_results() -> Vec<RawRestaurant> {
    MOCK_CATALOG.iter().map(CatalogEntry::to_raw).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Detail pages available in the mock catalog
pub fn mock_restaurant_details(id: &str) -> Option<Restaurant> {
    let base = mock_search_results()
        .into_iter()
        .find(|r| r.id.as_deref() == Some(id))?;

    let (distance, dietary, pros, cons, hours, allergy) = match id {
        "real-1" => (
            "0.7 miles",
            strings(&["Vegetarian Options", "Gluten-Free Options"]),
            strings(&["Authentic Italian cuisine", "Homemade pasta", "Great wine selection", "Cozy atmosphere"]),
            strings(&["Can be busy on weekends", "Limited parking nearby"]),
            strings(&[
                "Monday - Thursday: 11:00 AM - 10:00 PM",
                "Friday - Saturday: 11:00 AM - 11:00 PM",
                "Sunday: 12:00 PM - 9:00 PM",
            ]),
            strings(&["Contains: Wheat, Dairy", "Ask server for complete allergen information"]),
        ),
        "real-2" => (
            "0.5 miles",
            strings(&["Vegetarian Options", "Gluten-Free Options Available"]),
            strings(&["Fresh fish daily", "Authentic Japanese techniques", "Great sake selection", "Elegant ambiance"]),
            strings(&["Higher price point", "Wait times on weekends"]),
            strings(&[
                "Monday - Thursday: 12:00 PM - 10:00 PM",
                "Friday - Saturday: 12:00 PM - 11:00 PM",
                "Sunday: 1:00 PM - 9:00 PM",
            ]),
            strings(&["Contains: Fish, Shellfish, Soy", "Ask server about cross-contamination concerns"]),
        ),
        "real-3" => (
            "0.9 miles",
            strings(&["Vegan", "Gluten-Free", "Organic", "Nut-Free Options"]),
            strings(&["100% plant-based menu", "Locally sourced ingredients", "Great atmosphere", "Friendly staff"]),
            strings(&["Limited parking", "Can get crowded during peak hours"]),
            strings(&["Monday - Friday: 10:00 AM - 9:00 PM", "Saturday - Sunday: 9:00 AM - 10:00 PM"]),
            strings(&["Nut-free options available", "Kitchen handles wheat products", "Ask about soy allergies"]),
        ),
        _ => return None,
    };

    Some(Restaurant {
        id: id.to_string(),
        name: base.name.unwrap_or_default(),
        image_url: base.image_url.unwrap_or_default(),
        cuisine_type: base
            .categories
            .into_iter()
            .next()
            .and_then(|c| c.title)
            .unwrap_or_default(),
        rating: base.rating.unwrap_or_default(),
        price_level: base
            .price
            .and_then(|p| PriceLevel::from_raw(&p.to_string()))
            .unwrap_or_default(),
        address: base.location.and_then(|l| l.address1).unwrap_or_default(),
        distance: distance.to_string(),
        dietary_options: dietary,
        pros,
        cons,
        phone: base.phone,
        website: base.url,
        hours: Some(hours),
        allergy_info: allergy,
        coordinates: base.coordinates.map(|c| Coordinates { lat: c.latitude, lng: c.longitude }),
    })
}
