use crate::config::GeocodingConfig;
use crate::error::GeocodeError;
use crate::geo::traits::Geocoder;
use crate::models::Coordinates;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("droidbrb-search/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Google Geocoding API client
pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    /// Create a geocoder with its own HTTP client built from config
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
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

    fn parse(body: &str) -> Result<Coordinates, GeocodeError> {
        let response: GeocodeResponse = serde_json::from_str(body)?;

        if let Some(status) = response.status.filter(|s| s != "OK") {
            return Err(GeocodeError::Rejected(status));
        }

        response
            .results
            .first()
            .map(|r| Coordinates::new(r.geometry.location.lat, r.geometry.location.lng))
            .ok_or(GeocodeError::NoResults)
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        debug!("Geocoding {:?} via {}", address, self.base_url);

        let mut request = self.client.get(&self.base_url).query(&[("address", address)]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        Self::parse(&body)
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}

/// Resolves location text to coordinates, swallowing every failure.
///
/// A location that cannot be resolved must never abort a search, so errors
/// are logged here and reported as `None`.
#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn get_coordinates_from_address(&self, address: &str) -> Option<Coordinates> {
        match self.geocoder.geocode(address).await {
            Ok(coordinates) => {
                debug!(
                    "Resolved {:?} to ({}, {})",
                    address, coordinates.latitude, coordinates.longitude
                );
                Some(coordinates)
            }
            Err(e) => {
                warn!(
                    "Could not resolve location {:?} with {}: {}",
                    address,
                    self.geocoder.provider_name(),
                    e
                );
                None
            }
        }
    }

    /// Zipcodes go through the same address lookup
    pub async fn get_coordinates_from_zipcode(&self, zipcode: &str) -> Option<Coordinates> {
        self.get_coordinates_from_address(zipcode).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn geocoder_for(server: &Server, api_key: Option<&str>) -> GoogleGeocoder {
        GoogleGeocoder::with_client(
            Client::new(),
            format!("{}/geocode/json", server.url()),
            api_key.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn resolves_first_result() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/geocode/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("address".into(), "Austin, TX".into()),
                Matcher::UrlEncoded("key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "status": "OK",
                    "results": [
                        {"geometry": {"location": {"lat": 30.2672, "lng": -97.7431}}},
                        {"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let resolver = LocationResolver::new(Arc::new(geocoder_for(&server, Some("test-key"))));
        let coordinates = resolver.get_coordinates_from_address("Austin, TX").await;

        assert_eq!(coordinates, Some(Coordinates::new(30.2672, -97.7431)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn zipcode_uses_address_lookup() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/geocode/json")
            .match_query(Matcher::UrlEncoded("address".into(), "78701".into()))
            .with_status(200)
            .with_body(
                json!({"results": [{"geometry": {"location": {"lat": 30.27, "lng": -97.74}}}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let resolver = LocationResolver::new(Arc::new(geocoder_for(&server, None)));

        assert_eq!(
            resolver.get_coordinates_from_zipcode("78701").await,
            Some(Coordinates::new(30.27, -97.74))
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_status_resolves_to_none() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/geocode/json")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let geocoder = geocoder_for(&server, None);
        assert!(matches!(
            geocoder.geocode("nowhere").await,
            Err(GeocodeError::Status(500))
        ));

        let resolver = LocationResolver::new(Arc::new(geocoder));
        assert_eq!(resolver.get_coordinates_from_address("nowhere").await, None);
    }

    #[tokio::test]
    async fn empty_results_resolve_to_none() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/geocode/json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"results": []}).to_string())
            .create_async()
            .await;

        let resolver = LocationResolver::new(Arc::new(geocoder_for(&server, None)));
        assert_eq!(resolver.get_coordinates_from_address("Atlantis").await, None);
    }

    #[tokio::test]
    async fn unreachable_service_resolves_to_none() {
        // Nothing listens on the discard port.
        let geocoder = GoogleGeocoder::with_client(
            Client::new(),
            "http://127.0.0.1:9/geocode/json".to_string(),
            None,
        );
        let resolver = LocationResolver::new(Arc::new(geocoder));
        assert_eq!(resolver.get_coordinates_from_address("Austin").await, None);
    }

    #[test]
    fn parse_rejects_non_ok_status() {
        let body = json!({"status": "REQUEST_DENIED", "results": []}).to_string();
        assert!(matches!(
            GoogleGeocoder::parse(&body),
            Err(GeocodeError::Rejected(status)) if status == "REQUEST_DENIED"
        ));
    }

    #[test]
    fn parse_rejects_malformed_body() {
        assert!(matches!(
            GoogleGeocoder::parse("<html>oops</html>"),
            Err(GeocodeError::Parse(_))
        ));
        let missing_geometry = json!({"results": [{"formatted_address": "x"}]}).to_string();
        assert!(matches!(
            GoogleGeocoder::parse(&missing_geometry),
            Err(GeocodeError::Parse(_))
        ));
    }

    #[test]
    fn parse_without_results_key_is_no_results() {
        assert!(matches!(
            GoogleGeocoder::parse("{}"),
            Err(GeocodeError::NoResults)
        ));
    }
}
