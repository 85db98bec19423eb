//! The `?lat=..&lng=..` position carried in the form URL after a map click.

use crate::error::ApiError;
use crate::types::Position;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlPosition {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl UrlPosition {
    /// Read `lat` and `lng` from a query string, with or without the `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut position = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "lat" => position.lat = Some(value.into_owned()),
                "lng" => position.lng = Some(value.into_owned()),
                _ => {}
            }
        }
        position
    }

    /// Both coordinates are present and non-empty.
    pub fn is_complete(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.lat) && present(&self.lng)
    }

    /// `Ok(None)` when a coordinate is missing, an error when one is
    /// present but not a valid number in range.
    pub fn position(&self) -> Result<Option<Position>, ApiError> {
        if !self.is_complete() {
            return Ok(None);
        }
        let lat = parse_coordinate("lat", self.lat.as_deref())?;
        let lng = parse_coordinate("lng", self.lng.as_deref())?;
        Position::new(lat, lng).map(Some)
    }
}

fn parse_coordinate(name: &str, raw: Option<&str>) -> Result<f64, ApiError> {
    let raw = raw.unwrap_or_default().trim();
    raw.parse()
        .map_err(|_| ApiError::InvalidFormInput(format!("{name} {raw:?} is not a number")))
}
