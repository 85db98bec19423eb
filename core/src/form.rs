//! The new-city form: from a map click to a `NewCity` payload.
//!
//! A form is opened with the position from the URL. Until both coordinates
//! are present it only asks the user to pick a location. Once they are, the
//! place is resolved through a `Geocoder` and pre-fills name, country and
//! flag; a failed lookup replaces the form with the lookup's message.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use tracing::debug;

use crate::error::ApiError;
use crate::geocode::Geocoder;
use crate::position::UrlPosition;
use crate::types::{NewCity, Position};

pub const PICK_LOCATION_MESSAGE: &str = "Start by clicking somewhere on the map";

/// What the form area should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormView {
    PickLocation,
    Message(String),
    Ready,
}

#[derive(Debug, Clone)]
pub struct CityForm {
    position: Option<Position>,
    pub city_name: String,
    pub country: String,
    pub emoji: String,
    pub date: Option<DateTime<Utc>>,
    pub notes: String,
    error: Option<String>,
}

impl CityForm {
    pub fn new(url: &UrlPosition, now: DateTime<Utc>) -> Self {
        let (position, error) = match url.position() {
            Ok(position) => (position, None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            position,
            city_name: String::new(),
            country: String::new(),
            emoji: String::new(),
            date: Some(now),
            notes: String::new(),
            error,
        }
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn view(&self) -> FormView {
        if let Some(message) = &self.error {
            return FormView::Message(message.clone());
        }
        if self.position.is_none() {
            return FormView::PickLocation;
        }
        FormView::Ready
    }

    /// Look the position up and pre-fill the place fields.
    ///
    /// Never calls the geocoder without a position.
    pub async fn resolve_location<G>(&mut self, geocoder: &G) -> Result<(), ApiError>
    where
        G: Geocoder + ?Sized,
    {
        let Some(position) = self.position else {
            return Err(ApiError::InvalidFormInput(PICK_LOCATION_MESSAGE.to_string()));
        };
        self.error = None;
        match geocoder.reverse(position).await {
            Ok(place) => {
                debug!(city = %place.city_name, country = %place.country, "location resolved");
                self.city_name = place.city_name;
                self.country = place.country;
                self.emoji = place.country_code;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Apply the date picker's `dd/MM/yy` text. An empty or unparseable
    /// value clears the date.
    pub fn set_date_input(&mut self, input: &str, now: DateTime<Utc>) {
        self.date = parse_form_date(input, now);
    }

    /// Build the payload, proposing `now` in epoch milliseconds as the id.
    pub fn submit(&self, now: DateTime<Utc>) -> Result<NewCity, ApiError> {
        let city_name = self.city_name.trim();
        if city_name.is_empty() {
            return Err(ApiError::InvalidFormInput("city name is required".to_string()));
        }
        let Some(date) = self.date else {
            return Err(ApiError::InvalidFormInput("date is required".to_string()));
        };
        let Some(position) = self.position else {
            return Err(ApiError::InvalidFormInput(PICK_LOCATION_MESSAGE.to_string()));
        };
        Ok(NewCity {
            id: Some(now.timestamp_millis()),
            city_name: city_name.to_string(),
            country: self.country.clone(),
            emoji: self.emoji.clone(),
            date: date.to_rfc3339_opts(SecondsFormat::Millis, true),
            notes: self.notes.clone(),
            position,
        })
    }
}

/// Parse `dd/MM/yy` (or `dd/MM/yyyy`), keeping `now`'s UTC time of day.
/// Two-digit years are taken as 20xx.
pub fn parse_form_date(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let mut parts = input.trim().split('/').map(|p| p.trim().parse::<u32>());
    let (Some(Ok(day)), Some(Ok(month)), Some(Ok(year)), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    let year = if year < 100 { 2000 + year } else { year };
    let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?;
    Some(Utc.from_utc_datetime(&date.and_time(now.time())))
}
