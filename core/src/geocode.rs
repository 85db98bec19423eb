//! Reverse-geocoding request builder and response policy.
//!
//! The service answers `GET {base}?latitude=..&longitude=..` with a JSON
//! object carrying `city`, `locality`, `countryName` and `countryCode`.
//! An empty country or a locality starting with `Etc` (a timezone sentinel
//! such as `Etc/GMT`) means the point is at sea.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::Position;

/// A place resolved from coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub city_name: String,
    pub country: String,
    pub country_code: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GeocodeBody {
    city: String,
    locality: String,
    country_name: String,
    country_code: String,
}

/// Error payload the service sends alongside 4xx statuses.
#[derive(Debug, Deserialize)]
struct GeocodeFault {
    description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    base_url: String,
}

impl GeocodeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_reverse(&self, position: Position) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}?latitude={}&longitude={}",
                self.base_url, position.lat, position.lng
            ),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_reverse(&self, response: HttpResponse) -> Result<Place, ApiError> {
        if !response.is_success() {
            let diagnostic = serde_json::from_str::<GeocodeFault>(&response.body)
                .ok()
                .and_then(|fault| fault.description)
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| {
                    format!("Status: {}, {}", response.status, response.status_text)
                });
            return Err(ApiError::GeocodeServiceError(diagnostic));
        }

        let body: GeocodeBody = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;

        if body.country_name.is_empty() || body.locality.starts_with("Etc") {
            return Err(ApiError::UnresolvableLocation);
        }

        let city_name = if body.city.is_empty() {
            body.locality
        } else {
            body.city
        };

        Ok(Place {
            city_name,
            country: body.country_name,
            country_code: body.country_code,
        })
    }

    /// Build, execute and parse one lookup.
    pub async fn lookup<T>(&self, transport: &T, position: Position) -> Result<Place, ApiError>
    where
        T: Transport + ?Sized,
    {
        debug!(lat = position.lat, lng = position.lng, "reverse geocoding");
        let response = transport.execute(self.build_reverse(position)).await?;
        let result = self.parse_reverse(response);
        if let Err(err) = &result {
            warn!(lat = position.lat, lng = position.lng, error = %err, "reverse geocoding failed");
        }
        result
    }
}

/// Resolves coordinates to a place; the form depends on this seam rather
/// than on a concrete service.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, position: Position) -> Result<Place, ApiError>;
}

/// Pairs a `GeocodeClient` with the transport it should run on.
#[derive(Debug, Clone)]
pub struct HttpGeocoder<T> {
    client: GeocodeClient,
    transport: T,
}

impl<T: Transport> HttpGeocoder<T> {
    pub fn new(client: GeocodeClient, transport: T) -> Self {
        Self { client, transport }
    }
}

#[async_trait]
impl<T: Transport> Geocoder for HttpGeocoder<T> {
    async fn reverse(&self, position: Position) -> Result<Place, ApiError> {
        self.client.lookup(&self.transport, position).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeocodeClient {
        GeocodeClient::new("https://api.bigdatacloud.net/data/reverse-geocode-client")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            status_text: "OK".into(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    #[test]
    fn build_reverse_puts_coordinates_in_query() {
        let req = client().build_reverse(Position { lat: 38.7, lng: -9.1 });
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "https://api.bigdatacloud.net/data/reverse-geocode-client?latitude=38.7&longitude=-9.1"
        );
    }

    #[test]
    fn resolves_city_and_country() {
        let place = client()
            .parse_reverse(ok(
                r#"{"city":"Lisbon","locality":"Santa Maria Maior","countryName":"Portugal","countryCode":"PT"}"#,
            ))
            .unwrap();
        assert_eq!(
            place,
            Place {
                city_name: "Lisbon".into(),
                country: "Portugal".into(),
                country_code: "PT".into(),
            }
        );
    }

    #[test]
    fn falls_back_to_locality_when_city_is_empty() {
        let place = client()
            .parse_reverse(ok(
                r#"{"city":"","locality":"Sintra","countryName":"Portugal","countryCode":"PT"}"#,
            ))
            .unwrap();
        assert_eq!(place.city_name, "Sintra");
    }

    #[test]
    fn ocean_sentinel_is_unresolvable() {
        let err = client()
            .parse_reverse(ok(
                r#"{"city":"","locality":"Etc/GMT","countryName":"","countryCode":""}"#,
            ))
            .unwrap_err();
        assert!(matches!(err, ApiError::UnresolvableLocation));
    }

    #[test]
    fn etc_locality_is_unresolvable_even_with_country() {
        let err = client()
            .parse_reverse(ok(
                r#"{"city":"","locality":"Etc/GMT+2","countryName":"Brazil","countryCode":"BR"}"#,
            ))
            .unwrap_err();
        assert!(matches!(err, ApiError::UnresolvableLocation));
    }

    #[test]
    fn missing_fields_count_as_empty() {
        let err = client().parse_reverse(ok("{}")).unwrap_err();
        assert!(matches!(err, ApiError::UnresolvableLocation));
    }

    #[test]
    fn service_error_uses_description() {
        let response = HttpResponse {
            status: 400,
            status_text: "Bad Request".into(),
            headers: Vec::new(),
            body: r#"{"status":401,"description":"Latitude must be between -90 and 90"}"#.into(),
        };
        match client().parse_reverse(response).unwrap_err() {
            ApiError::GeocodeServiceError(msg) => {
                assert_eq!(msg, "Latitude must be between -90 and 90")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn service_error_without_body_uses_status() {
        let response = HttpResponse {
            status: 503,
            status_text: "Service Unavailable".into(),
            headers: Vec::new(),
            body: String::new(),
        };
        match client().parse_reverse(response).unwrap_err() {
            ApiError::GeocodeServiceError(msg) => {
                assert_eq!(msg, "Status: 503, Service Unavailable")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
