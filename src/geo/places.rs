use crate::config::PlacesConfig;
use crate::error::SuggestionError;
use crate::geo::traits::PlaceAutocomplete;
use crate::geo::types::{LocationSuggestion, StructuredFormatting};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Inputs shorter than this never reach the autocomplete service
pub const MIN_SUGGESTION_CHARS: usize = 3;

const USER_AGENT: &str = concat!("droidbrb-search/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Suggestion {
    #[serde(default)]
    place_prediction: Option<PlacePrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacePrediction {
    place_id: String,
    #[serde(default)]
    text: Option<FormattableText>,
    #[serde(default)]
    structured_format: Option<StructuredFormat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredFormat {
    #[serde(default)]
    main_text: Option<FormattableText>,
    #[serde(default)]
    secondary_text: Option<FormattableText>,
}

#[derive(Debug, Deserialize)]
struct FormattableText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct LegacyPrediction {
    place_id: String,
    description: String,
    #[serde(default)]
    structured_formatting: StructuredFormatting,
}

/// The two response shapes the autocomplete service may answer with
#[derive(Debug)]
enum AutocompleteResponse {
    /// `suggestions[].placePrediction`
    Structured(Vec<Suggestion>),
    /// `predictions[]`
    Legacy(Vec<LegacyPrediction>),
    Empty,
}

impl AutocompleteResponse {
    fn parse(body: &str) -> Result<Self, SuggestionError> {
        let mut value: Value = serde_json::from_str(body)?;

        if let Some(suggestions) = value.get_mut("suggestions").map(Value::take) {
            return Ok(Self::Structured(serde_json::from_value(suggestions)?));
        }
        if let Some(predictions) = value.get_mut("predictions").map(Value::take) {
            return Ok(Self::Legacy(serde_json::from_value(predictions)?));
        }
        Ok(Self::Empty)
    }

    fn into_suggestions(self) -> Vec<LocationSuggestion> {
        match self {
            Self::Structured(suggestions) => suggestions
                .into_iter()
                .filter_map(|s| s.place_prediction)
                .map(PlacePrediction::into_suggestion)
                .collect(),
            Self::Legacy(predictions) => predictions
                .into_iter()
                .map(|p| LocationSuggestion {
                    place_id: p.place_id,
                    description: p.description,
                    structured_formatting: p.structured_formatting,
                })
                .collect(),
            Self::Empty => Vec::new(),
        }
    }
}

impl PlacePrediction {
    fn into_suggestion(self) -> LocationSuggestion {
        let (main_text, secondary_text) = match self.structured_format {
            Some(format) => (
                format.main_text.map(|t| t.text).unwrap_or_default(),
                format.secondary_text.map(|t| t.text).unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };

        let description = match self.text {
            Some(text) => text.text,
            None if secondary_text.is_empty() => main_text.clone(),
            None => format!("{}, {}", main_text, secondary_text),
        };

        LocationSuggestion {
            place_id: self.place_id,
            description,
            structured_formatting: StructuredFormatting {
                main_text,
                secondary_text,
            },
        }
    }
}

/// Google Places autocomplete client
pub struct GooglePlacesClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GooglePlacesClient {
    pub fn new(config: &PlacesConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(
            client,
            config.base_url.clone(),
            config.api_key.clone(),
        ))
    }

    pub fn with_client(client: Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl PlaceAutocomplete for GooglePlacesClient {
    async fn autocomplete(&self, input: &str) -> Result<Vec<LocationSuggestion>, SuggestionError> {
        debug!("Autocompleting {:?} via {}", input, self.base_url);

        let mut request = self.client.post(&self.base_url).json(&json!({ "input": input }));
        if let Some(key) = &self.api_key {
            request = request.header("X-Goog-Api-Key", key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SuggestionError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        Ok(AutocompleteResponse::parse(&body)?.into_suggestions())
    }

    fn provider_name(&self) -> &'static str {
        "google-places"
    }
}

/// Suggestion lookup for the location box. Never fails; errors yield no suggestions.
#[derive(Clone)]
pub struct SuggestionLookup {
    autocomplete: Arc<dyn PlaceAutocomplete>,
    min_chars: usize,
}

impl SuggestionLookup {
    pub fn new(autocomplete: Arc<dyn PlaceAutocomplete>) -> Self {
        Self::with_min_chars(autocomplete, MIN_SUGGESTION_CHARS)
    }

    pub fn with_min_chars(autocomplete: Arc<dyn PlaceAutocomplete>, min_chars: usize) -> Self {
        Self {
            autocomplete,
            min_chars,
        }
    }

    pub async fn get_location_suggestions(&self, input: &str) -> Vec<LocationSuggestion> {
        // Counts chars, not UTF-16 units: "🤖🤖" is 2 here, 4 in a browser.
        if input.chars().count() < self.min_chars {
            return Vec::new();
        }

        match self.autocomplete.autocomplete(input).await {
            Ok(suggestions) => {
                debug!("{} suggestions for {:?}", suggestions.len(), input);
                suggestions
            }
            Err(e) => {
                warn!(
                    "Suggestion lookup via {} failed for {:?}: {}",
                    self.autocomplete.provider_name(),
                    input,
                    e
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn lookup_for(server: &Server) -> SuggestionLookup {
        SuggestionLookup::new(Arc::new(GooglePlacesClient::with_client(
            Client::new(),
            server.url(),
            Some("places-key".to_string()),
        )))
    }

    #[tokio::test]
    async fn short_input_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", "/").expect(0).create_async().await;

        let lookup = lookup_for(&server);
        assert!(lookup.get_location_suggestions("").await.is_empty());
        assert!(lookup.get_location_suggestions("a").await.is_empty());
        assert!(lookup.get_location_suggestions("Au").await.is_empty());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn threshold_counts_characters_not_bytes() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(json!({"predictions": []}).to_string())
            .expect(1)
            .create_async()
            .await;

        let lookup = lookup_for(&server);
        assert!(lookup.get_location_suggestions("Zü").await.is_empty());
        assert!(lookup.get_location_suggestions("Zür").await.is_empty());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn normalizes_structured_predictions() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("x-goog-api-key", "places-key")
            .match_body(Matcher::Json(json!({"input": "Aus"})))
            .with_status(200)
            .with_body(
                json!({
                    "suggestions": [
                        {
                            "placePrediction": {
                                "placeId": "p1",
                                "text": {"text": "Austin, TX, USA"},
                                "structuredFormat": {
                                    "mainText": {"text": "Austin"},
                                    "secondaryText": {"text": "TX, USA"}
                                }
                            }
                        },
                        {
                            "placePrediction": {
                                "placeId": "p2",
                                "structuredFormat": {
                                    "mainText": {"text": "Australia"}
                                }
                            }
                        },
                        {"queryPrediction": {"text": {"text": "austin pizza"}}}
                    ]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let suggestions = lookup_for(&server).get_location_suggestions("Aus").await;

        assert_eq!(
            suggestions,
            vec![
                LocationSuggestion {
                    place_id: "p1".into(),
                    description: "Austin, TX, USA".into(),
                    structured_formatting: StructuredFormatting {
                        main_text: "Austin".into(),
                        secondary_text: "TX, USA".into(),
                    },
                },
                LocationSuggestion {
                    place_id: "p2".into(),
                    description: "Australia".into(),
                    structured_formatting: StructuredFormatting {
                        main_text: "Australia".into(),
                        secondary_text: String::new(),
                    },
                },
            ]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn accepts_legacy_predictions() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(
                json!({
                    "predictions": [{
                        "place_id": "legacy-1",
                        "description": "Boston, MA, USA",
                        "structured_formatting": {
                            "main_text": "Boston",
                            "secondary_text": "MA, USA"
                        }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let suggestions = lookup_for(&server).get_location_suggestions("Bos").await;

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].place_id, "legacy-1");
        assert_eq!(suggestions[0].description, "Boston, MA, USA");
        assert_eq!(suggestions[0].structured_formatting.main_text, "Boston");
        assert_eq!(suggestions[0].structured_formatting.secondary_text, "MA, USA");
    }

    #[tokio::test]
    async fn service_errors_yield_no_suggestions() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        assert!(lookup_for(&server)
            .get_location_suggestions("Chicago")
            .await
            .is_empty());
    }

    #[test]
    fn unknown_shape_is_empty() {
        let parsed = AutocompleteResponse::parse(r#"{"status": "ZERO_RESULTS"}"#).unwrap();
        assert!(parsed.into_suggestions().is_empty());
    }

    #[test]
    fn malformed_shapes_are_parse_errors() {
        assert!(matches!(
            AutocompleteResponse::parse("not json"),
            Err(SuggestionError::Parse(_))
        ));
        assert!(matches!(
            AutocompleteResponse::parse(r#"{"predictions": [{"description": "no id"}]}"#),
            Err(SuggestionError::Parse(_))
        ));
    }
}
