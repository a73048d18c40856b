use crate::models::Listing;
use crate::search::traits::ListingStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Listings held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryListingStore {
    listings: Vec<Listing>,
}

impl InMemoryListingStore {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn fetch_available_listings(&self) -> Result<Vec<Listing>> {
        Ok(self
            .listings
            .iter()
            .filter(|l| l.is_available)
            .cloned()
            .collect())
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}

/// Listings exported as a JSON array, re-read on every fetch
#[derive(Debug, Clone)]
pub struct JsonFileListingStore {
    path: PathBuf,
}

impl JsonFileListingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ListingStore for JsonFileListingStore {
    async fn fetch_available_listings(&self) -> Result<Vec<Listing>> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read listings from {}", self.path.display()))?;

        let listings: Vec<Listing> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse listings in {}", self.path.display()))?;

        debug!("Loaded {} listings from {}", listings.len(), self.path.display());

        Ok(listings.into_iter().filter(|l| l.is_available).collect())
    }

    fn source_name(&self) -> &'static str {
        "json-file"
    }
}
