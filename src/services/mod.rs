// Service exports
pub mod geocoding;
pub mod provider;
pub mod session;
pub mod supabase;

pub use geocoding::{GeocodingError, ReverseGeocoder, ADDRESS_NOT_FOUND};
pub use provider::{MockRestaurantProvider, ProviderError, RestaurantSource};
pub use session::{AuthEvent, Claims, Session, SessionError, SessionProvider};
pub use supabase::{diff_tag_selection, Filter, SupabaseClient, SupabaseError, SupabaseTables};
