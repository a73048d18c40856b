//! Robot search: text, category and price filters combined with an optional
//! radius filter that also orders results nearest first.

pub mod store;
pub mod traits;
pub mod types;

pub use store::{InMemoryListingStore, JsonFileListingStore};
pub use traits::ListingStore;
pub use types::{SearchFilters, ALL_CATEGORIES};

use crate::error::{Result, SearchError};
use crate::geo::{calculate_distance, BoundingBox, Geocoder, LocationResolver};
use crate::models::{Coordinates, Listing, RankedListing};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Runs searches against a listing store, geocoding location text on demand.
///
/// Holds no per-search state; share it behind an `Arc` across tasks.
#[derive(Clone)]
pub struct SearchEngine {
    store: Arc<dyn ListingStore>,
    resolver: LocationResolver,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn ListingStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            store,
            resolver: LocationResolver::new(geocoder),
        }
    }

    pub async fn search_robots(&self, filters: &SearchFilters) -> Result<Vec<Listing>> {
        Ok(self
            .search_robots_with_distance(filters)
            .await?
            .into_iter()
            .map(|r| r.listing)
            .collect())
    }

    /// Same result list as [`Self::search_robots`], each hit carrying its
    /// distance from the origin when a radius filter was applied.
    pub async fn search_robots_with_distance(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<RankedListing>> {
        info!("Searching {} listings with {:?}", self.store.source_name(), filters);

        let listings = self.store.fetch_available_listings().await.map_err(|e| {
            error!("Listing fetch from {} failed: {:#}", self.store.source_name(), e);
            SearchError::Storage(e.into())
        })?;
        debug!("Fetched {} available listings", listings.len());

        let mut results: Vec<RankedListing> =
            listings.into_iter().map(RankedListing::unranked).collect();

        if let Some(query) = filters.query() {
            let needle = query.to_lowercase();
            results.retain(|r| r.listing.matches_query(&needle));
            debug!("{} listings match query {:?}", results.len(), query);
        }

        if let Some((origin, max_distance)) = self.distance_origin(filters).await {
            results = rank_by_distance(results, origin, max_distance);
            debug!("{} listings within {} miles", results.len(), max_distance);
        }

        if let Some(category) = filters.category() {
            results.retain(|r| r.listing.category.as_str().eq_ignore_ascii_case(category));
        }

        if let Some(min_price) = filters.min_price {
            results.retain(|r| r.listing.price >= min_price);
        }

        if let Some(max_price) = filters.max_price {
            results.retain(|r| r.listing.price <= max_price);
        }

        // Label match applies on top of any radius filter.
        if let Some(location) = filters.location() {
            let needle = location.to_lowercase();
            results.retain(|r| r.listing.location.to_lowercase().contains(&needle));
        }

        if let Some(is_available) = filters.is_available {
            results.retain(|r| r.listing.is_available == is_available);
        }

        info!("Search returned {} listings", results.len());
        Ok(results)
    }

    /// Origin and radius for the distance filter, if any.
    ///
    /// Location text with a radius is geocoded and never falls back to the
    /// explicit coordinates, even when geocoding fails.
    async fn distance_origin(&self, filters: &SearchFilters) -> Option<(Coordinates, f64)> {
        if let (Some(location), Some(max_distance)) = (filters.location(), filters.max_distance) {
            return self
                .resolver
                .get_coordinates_from_address(location)
                .await
                .map(|origin| (origin, max_distance));
        }

        match (
            filters.user_latitude,
            filters.user_longitude,
            filters.max_distance,
        ) {
            (Some(latitude), Some(longitude), Some(max_distance)) => {
                Some((Coordinates::new(latitude, longitude), max_distance))
            }
            _ => None,
        }
    }
}

/// Keep listings with coordinates within `max_distance` miles of `origin`,
/// nearest first. Ties keep their incoming order.
pub fn rank_by_distance(
    listings: Vec<RankedListing>,
    origin: Coordinates,
    max_distance: f64,
) -> Vec<RankedListing> {
    let bounds = BoundingBox::around(origin, max_distance);

    let mut ranked: Vec<RankedListing> = listings
        .into_iter()
        .filter_map(|mut r| {
            let coordinates = r.listing.coordinates()?;
            if !bounds.contains(coordinates) {
                return None;
            }
            let distance = calculate_distance(origin, coordinates);
            if distance <= max_distance {
                r.distance = Some(distance);
                Some(r)
            } else {
                None
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance
            .unwrap_or_default()
            .total_cmp(&b.distance.unwrap_or_default())
    });
    ranked
}
