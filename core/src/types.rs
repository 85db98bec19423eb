//! Domain DTOs for the cities API.
//!
//! # Design
//! These types mirror the backend's JSON schema (camelCase field names) but
//! are defined independently of the mock-server crate; integration tests
//! catch schema drift. `emoji` holds an ISO 3166-1 alpha-2 country code in
//! practice, despite its name.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// A geographic coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    /// Build a position, rejecting coordinates outside lat [-90, 90] and
    /// lng [-180, 180].
    pub fn new(lat: f64, lng: f64) -> Result<Self, ApiError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ApiError::InvalidFormInput(format!(
                "latitude {lat} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(ApiError::InvalidFormInput(format!(
                "longitude {lng} is outside [-180, 180]"
            )));
        }
        Ok(Self { lat, lng })
    }
}

/// A visited city as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    pub city_name: String,
    #[serde(default)]
    pub country: String,
    pub emoji: String,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub position: Option<Position>,
}

/// Request payload for creating a city. `id` is only a proposal; the
/// backend's returned record is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub city_name: String,
    pub country: String,
    pub emoji: String,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    pub position: Position,
}

/// Accepts `7` as well as `"7"`; json-server style backends emit string ids.
fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("id {text:?} is not an integer"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_uses_camel_case_fields() {
        let city: City = serde_json::from_str(
            r#"{"id":73930385,"cityName":"Lisbon","country":"Portugal","emoji":"PT",
                "date":"2027-10-31T15:59:59.138Z","notes":"My favorite city so far!",
                "position":{"lat":38.727881642324164,"lng":-9.140900099907554}}"#,
        )
        .unwrap();
        assert_eq!(city.id, 73930385);
        assert_eq!(city.city_name, "Lisbon");
        assert_eq!(city.position.unwrap().lng, -9.140900099907554);
    }

    #[test]
    fn city_accepts_string_id() {
        let city: City = serde_json::from_str(
            r#"{"id":"17","cityName":"Madrid","country":"Spain","emoji":"ES","date":"2027-07-15T08:22:53.976Z"}"#,
        )
        .unwrap();
        assert_eq!(city.id, 17);
        assert!(city.notes.is_empty());
        assert!(city.position.is_none());
    }

    #[test]
    fn city_rejects_non_numeric_id() {
        let result: Result<City, _> = serde_json::from_str(
            r#"{"id":"a1b2","cityName":"Madrid","emoji":"ES","date":"2027-07-15T08:22:53.976Z"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn new_city_omits_missing_id() {
        let new_city = NewCity {
            id: None,
            city_name: "Berlin".into(),
            country: "Germany".into(),
            emoji: "DE".into(),
            date: "2027-02-12T09:24:11.863Z".into(),
            notes: String::new(),
            position: Position { lat: 52.53, lng: 13.38 },
        };
        let json = serde_json::to_value(&new_city).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["cityName"], "Berlin");
        assert_eq!(json["position"]["lat"], 52.53);
    }

    #[test]
    fn position_range_is_validated() {
        assert!(Position::new(90.0, -180.0).is_ok());
        assert!(matches!(
            Position::new(90.5, 0.0),
            Err(ApiError::InvalidFormInput(_))
        ));
        assert!(matches!(
            Position::new(0.0, 181.0),
            Err(ApiError::InvalidFormInput(_))
        ));
        assert!(Position::new(f64::NAN, 0.0).is_err());
    }
}
