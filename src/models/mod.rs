// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    push_unique, AppFeedback, Coordinates, FeedbackType, NewUserTag, PreferenceUpdate, PriceLevel,
    Profile, ProfileUpdate, RawCategory, RawCoordinates, RawHours, RawLocation, RawOpenPeriod,
    RawRestaurant, RawScalar, Restaurant, RestaurantTag, SavedRestaurant, UserPreferences, UserTag,
    DEFAULT_TAG_COLOR,
};
pub use requests::{
    ChatRequest, CreateTagRequest, FeedbackRequest, ParseQueryRequest, ResolveLocationRequest,
    ReverseGeocodeRequest, SavePreferencesRequest, SaveRestaurantRequest, SavedListQuery,
    SearchRequest, UpdateProfileRequest, UpdateRestaurantTagsRequest,
};
pub use responses::{
    AddressResponse, ChatResponse, ErrorResponse, HealthResponse, LocationErrorBody,
    LocationResponse, SavedStatusResponse, SearchResponse, SuccessResponse,
};
