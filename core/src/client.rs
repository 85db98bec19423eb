//! Stateless HTTP request builder and response parser for the cities API.
//!
//! # Design
//! `CitiesClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Any 2xx status is success; everything
//! else becomes `ApiError::RequestFailed`.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{City, NewCity};

#[derive(Debug, Clone)]
pub struct CitiesClient {
    base_url: String,
}

impl CitiesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_cities(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/cities", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_city(&self, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/cities/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_city(&self, input: &NewCity) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/cities", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete_city(&self, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/cities/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_cities(&self, response: HttpResponse) -> Result<Vec<City>, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_get_city(&self, response: HttpResponse) -> Result<City, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_create_city(&self, response: HttpResponse) -> Result<City, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    /// Delete responses carry no meaningful body; only the status matters.
    pub fn parse_delete_city(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::RequestFailed {
        status: response.status,
        status_text: response.status_text.clone(),
        body: response.body.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
