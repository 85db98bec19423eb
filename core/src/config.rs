//! Base URLs for the backend and the geocoding service, read from the
//! environment.

use crate::client::CitiesClient;
use crate::geocode::GeocodeClient;

pub const API_URL_VAR: &str = "WORLDWISE_API_URL";
pub const GEOCODE_URL_VAR: &str = "WORLDWISE_GEOCODE_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_GEOCODE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub geocode_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            api_url: read(API_URL_VAR, DEFAULT_API_URL),
            geocode_url: read(GEOCODE_URL_VAR, DEFAULT_GEOCODE_URL),
        }
    }

    pub fn cities_client(&self) -> CitiesClient {
        CitiesClient::new(&self.api_url)
    }

    pub fn geocode_client(&self) -> GeocodeClient {
        GeocodeClient::new(&self.geocode_url)
    }
}
