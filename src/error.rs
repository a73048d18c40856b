use thiserror::Error;

/// Failure of a search call. Only storage failures surface to the caller;
/// geocoding problems degrade the search instead.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("failed to fetch robot listings")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoding service returned HTTP {0}")]
    Status(u16),
    #[error("malformed geocoding response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("geocoding service rejected the request: {0}")]
    Rejected(String),
    #[error("no geocoding results")]
    NoResults,
}

#[derive(Error, Debug)]
pub enum SuggestionError {
    #[error("autocomplete request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("autocomplete service returned HTTP {0}")]
    Status(u16),
    #[error("malformed autocomplete response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Figment(#[from] figment::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
#[error("unknown robot category: {0}")]
pub struct ParseCategoryError(pub String);

pub type Result<T> = std::result::Result<T, SearchError>;
