//! Local stand-in for the cities REST backend and the reverse-geocoding
//! service.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: i64,
    pub city_name: String,
    pub country: String,
    pub emoji: String,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    pub position: Position,
}

/// Create payload. A proposed `id` is accepted on the wire but the server
/// always assigns its own.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCity {
    #[serde(default)]
    pub id: Option<i64>,
    pub city_name: String,
    pub country: String,
    pub emoji: String,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    pub position: Position,
}

#[derive(Debug)]
pub struct Store {
    cities: Vec<City>,
    next_id: i64,
}

impl Store {
    pub fn with_cities(cities: Vec<City>) -> Self {
        let next_id = cities.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self { cities, next_id }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

pub fn app_with(cities: Vec<City>) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::with_cities(cities)));
    Router::new()
        .route("/cities", get(list_cities).post(create_city))
        .route("/cities/{id}", get(get_city).delete(delete_city))
        .route("/reverse-geocode-client", get(reverse_geocode))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_cities(State(db): State<Db>) -> Json<Vec<City>> {
    let store = db.read().await;
    debug!(count = store.cities.len(), "listing cities");
    Json(store.cities.clone())
}

async fn create_city(
    State(db): State<Db>,
    Json(input): Json<CreateCity>,
) -> (StatusCode, Json<City>) {
    let mut store = db.write().await;
    let id = store.next_id;
    store.next_id += 1;
    let city = City {
        id,
        city_name: input.city_name,
        country: input.country,
        emoji: input.emoji,
        date: input.date,
        notes: input.notes,
        position: input.position,
    };
    info!(id, proposed = ?input.id, city = %city.city_name, "city created");
    store.cities.push(city.clone());
    (StatusCode::CREATED, Json(city))
}

async fn get_city(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<City>, StatusCode> {
    let store = db.read().await;
    store
        .cities
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_city(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let index = store
        .cities
        .iter()
        .position(|c| c.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    store.cities.remove(index);
    info!(id, "city deleted");
    Ok(Json(json!({})))
}

#[derive(Deserialize)]
pub struct GeocodeQuery {
    pub latitude: f64,
    pub longitude: f64,
}

struct KnownPlace {
    lat: f64,
    lng: f64,
    city: &'static str,
    locality: &'static str,
    country_name: &'static str,
    country_code: &'static str,
}

const KNOWN_PLACES: &[KnownPlace] = &[
    KnownPlace { lat: 38.72, lng: -9.14, city: "Lisbon", locality: "Santa Maria Maior", country_name: "Portugal", country_code: "PT" },
    KnownPlace { lat: 38.80, lng: -9.38, city: "", locality: "Sintra", country_name: "Portugal", country_code: "PT" },
    KnownPlace { lat: 40.42, lng: -3.70, city: "Madrid", locality: "Centro", country_name: "Spain", country_code: "ES" },
    KnownPlace { lat: 52.52, lng: 13.40, city: "Berlin", locality: "Mitte", country_name: "Germany", country_code: "DE" },
    KnownPlace { lat: -16.50, lng: -68.15, city: "La Paz", locality: "La Paz", country_name: "Bolivia (the)", country_code: "BO" },
];

/// Radius, in degrees, within which a click snaps to a known place.
const SNAP_DEGREES: f64 = 1.0;

async fn reverse_geocode(Query(query): Query<GeocodeQuery>) -> (StatusCode, Json<Value>) {
    if !(-90.0..=90.0).contains(&query.latitude) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": 401, "description": "Latitude must be between -90 and 90"})),
        );
    }
    if !(-180.0..=180.0).contains(&query.longitude) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": 401, "description": "Longitude must be between -180 and 180"})),
        );
    }

    let nearest = KNOWN_PLACES
        .iter()
        .map(|p| {
            let distance = (p.lat - query.latitude).hypot(p.lng - query.longitude);
            (distance, p)
        })
        .filter(|(distance, _)| *distance <= SNAP_DEGREES)
        .min_by(|a, b| a.0.total_cmp(&b.0));

    let body = match nearest {
        Some((_, place)) => json!({
            "latitude": query.latitude,
            "longitude": query.longitude,
            "city": place.city,
            "locality": place.locality,
            "countryName": place.country_name,
            "countryCode": place.country_code,
        }),
        None => json!({
            "latitude": query.latitude,
            "longitude": query.longitude,
            "city": "",
            "locality": "Etc/GMT",
            "countryName": "",
            "countryCode": "",
        }),
    };
    debug!(lat = query.latitude, lng = query.longitude, "reverse geocoded");
    (StatusCode::OK, Json(body))
}
