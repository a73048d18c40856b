use crate::error::{GeocodeError, SuggestionError};
use crate::geo::types::LocationSuggestion;
use crate::models::Coordinates;
use async_trait::async_trait;

/// Turns free-text addresses into coordinates.
/// Implemented over HTTP by [`crate::geo::GoogleGeocoder`]; tests supply fakes.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;

    /// Get the name of the geocoding provider
    fn provider_name(&self) -> &'static str;
}

/// Completes partial place names typed into the location box
#[async_trait]
pub trait PlaceAutocomplete: Send + Sync {
    async fn autocomplete(&self, input: &str) -> Result<Vec<LocationSuggestion>, SuggestionError>;

    fn provider_name(&self) -> &'static str;
}
