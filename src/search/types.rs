use serde::{Deserialize, Serialize};

/// Category value that disables category filtering
pub const ALL_CATEGORIES: &str = "all";

/// Search parameters for robot listings.
///
/// Empty strings count as absent. A `location` string always wins over
/// `user_latitude`/`user_longitude` as the origin of the distance filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Matched against name, description and category
    #[serde(default)]
    pub query: Option<String>,
    /// Place text, geocoded for the radius filter and also matched against listing location labels
    #[serde(default)]
    pub location: Option<String>,
    /// Category name, or `"all"`
    #[serde(default)]
    pub category: Option<String>,
    /// Inclusive lower price bound
    #[serde(default)]
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub user_latitude: Option<f64>,
    #[serde(default)]
    pub user_longitude: Option<f64>,
    /// Radius in miles
    #[serde(default)]
    pub max_distance: Option<f64>,
    #[serde(default)]
    pub is_available: Option<bool>,
}

impl SearchFilters {
    pub fn query(&self) -> Option<&str> {
        non_empty(&self.query)
    }

    pub fn location(&self) -> Option<&str> {
        non_empty(&self.location)
    }

    /// Category to filter on; `None` when absent or `"all"`
    pub fn category(&self) -> Option<&str> {
        non_empty(&self.category).filter(|c| !c.eq_ignore_ascii_case(ALL_CATEGORIES))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_are_absent() {
        let filters = SearchFilters {
            query: Some(String::new()),
            location: Some(String::new()),
            category: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filters.query(), None);
        assert_eq!(filters.location(), None);
        assert_eq!(filters.category(), None);
    }

    #[test]
    fn all_category_disables_filter() {
        let filters = SearchFilters {
            category: Some("ALL".into()),
            ..Default::default()
        };
        assert_eq!(filters.category(), None);
    }

    #[test]
    fn deserializes_camel_case() {
        let filters: SearchFilters = serde_json::from_str(
            r#"{"category": "drone", "maxPrice": 100, "userLatitude": 34.0, "userLongitude": -118.2, "maxDistance": 50}"#,
        )
        .unwrap();
        assert_eq!(filters.category(), Some("drone"));
        assert_eq!(filters.max_price, Some(100.0));
        assert_eq!(filters.max_distance, Some(50.0));
        assert_eq!(filters.is_available, None);
    }
}
