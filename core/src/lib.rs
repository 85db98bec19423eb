//! Client core for the WorldWise travel log.
//!
//! # Overview
//! Keeps the visited-city collection, the selected city and a loading flag
//! in sync with a REST backend, and resolves map clicks to places through a
//! reverse-geocoding service.
//!
//! # Design
//! - `CitiesClient` and `GeocodeClient` are stateless: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - A `Transport` executes the round-trip; `UreqTransport` is the real one,
//!   tests plug in scripted transports.
//! - `CitiesStore` is an explicitly constructed state container. Views read
//!   snapshots or subscribe to changes; nothing is global.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod countries;
pub mod display;
pub mod error;
pub mod form;
pub mod geocode;
pub mod http;
pub mod position;
pub mod store;
pub mod transport;
pub mod types;

pub use auth::{Access, FakeAuth, User};
pub use client::CitiesClient;
pub use config::Config;
pub use countries::{derive_countries, is_selected, Country};
pub use display::{display_name, flag_url, format_visit_date};
pub use error::ApiError;
pub use form::{CityForm, FormView};
pub use geocode::{GeocodeClient, Geocoder, HttpGeocoder, Place};
pub use http::{execute_cancellable, HttpMethod, HttpRequest, HttpResponse, Transport};
pub use position::UrlPosition;
pub use store::{Action, CitiesState, CitiesStore, CitySelector};
pub use transport::UreqTransport;
pub use types::{City, NewCity, Position};
