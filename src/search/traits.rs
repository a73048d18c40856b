use crate::models::Listing;
use anyhow::Result;
use async_trait::async_trait;

/// Source of robot listings.
/// Backed by the marketplace document store in production; local stores live in [`super::store`].
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Every listing currently flagged available. No matches is `Ok(vec![])`, not an error.
    async fn fetch_available_listings(&self) -> Result<Vec<Listing>>;

    /// Get the name of the store backend
    fn source_name(&self) -> &'static str;
}
