//! Proximity search for DroidBRB robot rental listings.
//!
//! [`search::SearchEngine`] filters listings by text, category, price and
//! distance from a geocoded or explicit origin. [`geo`] holds the distance
//! math and the geocoding and place-autocomplete clients.

pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod search;

pub use config::{AppConfig, ConfigLoader};
pub use error::{GeocodeError, SearchError, SuggestionError};
pub use geo::{calculate_distance, format_distance, LocationResolver, SuggestionLookup};
pub use models::{Category, Coordinates, Listing, RankedListing};
pub use search::{ListingStore, SearchEngine, SearchFilters};
