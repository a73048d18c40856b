pub mod distance;
pub mod geocoding;
pub mod places;
pub mod traits;
pub mod types;

pub use distance::{calculate_distance, format_distance, BoundingBox, EARTH_RADIUS_MILES};
pub use geocoding::{GoogleGeocoder, LocationResolver};
pub use places::{GooglePlacesClient, SuggestionLookup, MIN_SUGGESTION_CHARS};
pub use traits::{Geocoder, PlaceAutocomplete};
pub use types::{LocationSuggestion, StructuredFormatting};
