use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseCategoryError;

/// A point on the Earth's surface, in degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Kind of robot offered in a listing.
///
/// Stored names are matched case-insensitively; unknown names load as `Other`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Category {
    Drone,
    Humanoid,
    Industrial,
    Cleaning,
    Companion,
    Educational,
    Entertainment,
    Security,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Drone,
        Category::Humanoid,
        Category::Industrial,
        Category::Cleaning,
        Category::Companion,
        Category::Educational,
        Category::Entertainment,
        Category::Security,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Drone => "Drone",
            Category::Humanoid => "Humanoid",
            Category::Industrial => "Industrial",
            Category::Cleaning => "Cleaning",
            Category::Companion => "Companion",
            Category::Educational => "Educational",
            Category::Entertainment => "Entertainment",
            Category::Security => "Security",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or(Category::Other))
    }
}

/// A robot offered for rent on the marketplace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    /// Daily rental price
    pub price: f64,
    /// Free-text location label as entered by the owner
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub is_available: bool,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Both coordinates, or `None` if either one is missing
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Case-insensitive substring match over name, description and category.
    /// `needle` must already be lowercase.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.as_str().to_lowercase().contains(needle)
    }
}

/// A listing together with its distance from the search origin, if one was resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedListing {
    #[serde(flatten)]
    pub listing: Listing,
    /// Distance in miles
    pub distance: Option<f64>,
}

impl RankedListing {
    pub fn unranked(listing: Listing) -> Self {
        Self {
            listing,
            distance: None,
        }
    }
}
