//! Shared city state and the operations that synchronize it with the backend.
//!
//! # Design
//! `CitiesStore` owns a `CitiesClient`, a `Transport` and a `watch` channel
//! holding the current `CitiesState`. Every operation follows the same
//! shape: dispatch a loading action, perform the round-trip, then dispatch
//! exactly one terminal action. State only ever changes through
//! `CitiesState::reduce`, and each terminal action applies its mutation and
//! ends its request in the same transition.
//!
//! The loading action hands back an `InFlight` guard. Dropping the guard
//! without a terminal action dispatches `Action::Cancelled`, so an
//! operation future dropped mid-request (a timeout, a lost `select!` arm,
//! an aborted task) still ends its loading.
//!
//! `is_loading` is derived from a count of requests in flight, so a
//! superseded selection that ends early cannot clear the flag while a newer
//! request is still running.
//!
//! `current_city` is last-call-wins across `select_city` and `create_city`.
//! Each of them bumps a selection generation when it starts and only
//! applies its city if no newer one has started since. The call site also
//! keeps a `CitySelector`, whose `supersede()` cancels the token handed to
//! the previous `select_city` before returning a fresh one. A superseded
//! selection resolves to `Ok(None)` and never touches `current_city`.

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::client::CitiesClient;
use crate::countries::{derive_countries, Country};
use crate::error::ApiError;
use crate::http::{execute_cancellable, Transport};
use crate::types::{City, NewCity};

/// Snapshot of everything the views render from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitiesState {
    /// `None` until the first successful load.
    pub cities: Option<Vec<City>>,
    pub current_city: Option<City>,
    /// Message of the most recent reported failure; cleared when a new
    /// request starts.
    pub error: Option<String>,
    in_flight: usize,
    selection: u64,
}

/// Named state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Loading,
    /// Starts a request that will set `current_city`. Outdates every such
    /// request started before it.
    Selecting,
    CitiesLoaded(Vec<City>),
    CurrentCitySet { city: City, generation: u64 },
    CityCreated { city: City, generation: u64 },
    CityDeleted(i64),
    Cancelled,
    Rejected(String),
}

impl CitiesState {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn cities(&self) -> &[City] {
        self.cities.as_deref().unwrap_or_default()
    }

    pub fn countries(&self) -> Vec<Country> {
        derive_countries(self.cities())
    }

    /// Generation of the newest request that targets `current_city`.
    pub fn selection(&self) -> u64 {
        self.selection
    }

    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::Loading => self.start(),
            Action::Selecting => {
                self.selection += 1;
                self.start();
            }
            Action::CitiesLoaded(cities) => {
                self.cities = Some(cities);
                self.finish();
            }
            Action::CurrentCitySet { city, generation } => {
                if generation == self.selection {
                    self.current_city = Some(city);
                }
                self.finish();
            }
            Action::CityCreated { city, generation } => {
                self.cities.get_or_insert_with(Vec::new).push(city.clone());
                if generation == self.selection {
                    self.current_city = Some(city);
                }
                self.finish();
            }
            Action::CityDeleted(id) => {
                if let Some(cities) = self.cities.as_mut() {
                    cities.retain(|c| c.id != id);
                }
                self.finish();
            }
            Action::Cancelled => self.finish(),
            Action::Rejected(message) => {
                self.error = Some(message);
                self.finish();
            }
        }
        self
    }

    fn start(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

/// Hands out one cancellation token per selection, cancelling the previous
/// one. Dropping the selector cancels whatever is still outstanding.
#[derive(Debug, Default)]
pub struct CitySelector {
    current: Option<CancellationToken>,
}

impl CitySelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn supersede(&mut self) -> CancellationToken {
        self.cancel();
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        token
    }

    pub fn cancel(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
    }
}

impl Drop for CitySelector {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn apply(state: &watch::Sender<CitiesState>, action: Action) {
    state.send_modify(|state| *state = std::mem::take(state).reduce(action));
}

/// One started request. Must end through `finish`; dropping it unfinished
/// dispatches `Action::Cancelled`.
struct InFlight<'a> {
    state: &'a watch::Sender<CitiesState>,
    generation: u64,
    armed: bool,
}

impl InFlight<'_> {
    fn finish(mut self, action: Action) {
        self.armed = false;
        apply(self.state, action);
    }

    /// Whether a newer request targeting `current_city` has started since.
    fn outdated(&self) -> bool {
        self.state.borrow().selection != self.generation
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!("request dropped before completion");
            apply(self.state, Action::Cancelled);
        }
    }
}

pub struct CitiesStore<T> {
    client: CitiesClient,
    transport: T,
    state: watch::Sender<CitiesState>,
}

impl<T: Transport> CitiesStore<T> {
    pub fn new(client: CitiesClient, transport: T) -> Self {
        let (state, _) = watch::channel(CitiesState::default());
        Self {
            client,
            transport,
            state,
        }
    }

    pub fn snapshot(&self) -> CitiesState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CitiesState> {
        self.state.subscribe()
    }

    /// Replace `cities` with the backend's collection.
    pub async fn load_all(&self) -> Result<(), ApiError> {
        debug!("loading cities");
        let request = self.start(Action::Loading);
        match self.fetch_cities().await {
            Ok(cities) => {
                info!(count = cities.len(), "cities loaded");
                request.finish(Action::CitiesLoaded(cities));
                Ok(())
            }
            Err(err) => Err(reject(request, "load_all", err)),
        }
    }

    /// Fetch one city into `current_city`.
    ///
    /// Resolves to `Ok(None)` when `token` was cancelled, or a newer
    /// selection or creation started, before the response could be applied.
    pub async fn select_city(
        &self,
        id: i64,
        token: CancellationToken,
    ) -> Result<Option<City>, ApiError> {
        debug!(id, "selecting city");
        let request = self.start(Action::Selecting);
        let outcome = self.fetch_city(id, &token).await;
        if request.outdated() || matches!(outcome, Err(ApiError::RequestCancelled)) {
            debug!(id, "selection superseded");
            request.finish(Action::Cancelled);
            return Ok(None);
        }
        match outcome {
            Ok(city) => {
                let generation = request.generation;
                request.finish(Action::CurrentCitySet {
                    city: city.clone(),
                    generation,
                });
                Ok(Some(city))
            }
            Err(err) => Err(reject(request, "select_city", err)),
        }
    }

    /// Create a city and make it the current one unless a newer selection
    /// started meanwhile. Returns the backend's record, whose `id` may
    /// differ from the proposed one.
    pub async fn create_city(&self, new_city: NewCity) -> Result<City, ApiError> {
        debug!(city = %new_city.city_name, "creating city");
        let request = self.start(Action::Selecting);
        match self.post_city(&new_city).await {
            Ok(city) => {
                info!(id = city.id, city = %city.city_name, "city created");
                let generation = request.generation;
                request.finish(Action::CityCreated {
                    city: city.clone(),
                    generation,
                });
                Ok(city)
            }
            Err(err) => Err(reject(request, "create_city", err)),
        }
    }

    /// Delete a city. A 404 means it is already gone and counts as success.
    pub async fn delete_city(&self, id: i64) -> Result<(), ApiError> {
        debug!(id, "deleting city");
        let request = self.start(Action::Loading);
        let outcome = match self.remove_city(id).await {
            Err(err) if err.is_not_found() => {
                warn!(id, "city was already deleted");
                Ok(())
            }
            other => other,
        };
        match outcome {
            Ok(()) => {
                info!(id, "city deleted");
                request.finish(Action::CityDeleted(id));
                Ok(())
            }
            Err(err) => Err(reject(request, "delete_city", err)),
        }
    }

    async fn fetch_cities(&self) -> Result<Vec<City>, ApiError> {
        let response = self.transport.execute(self.client.build_list_cities()).await?;
        self.client.parse_list_cities(response)
    }

    async fn fetch_city(&self, id: i64, token: &CancellationToken) -> Result<City, ApiError> {
        let request = self.client.build_get_city(id);
        let response = execute_cancellable(&self.transport, request, token).await?;
        self.client.parse_get_city(response)
    }

    async fn post_city(&self, new_city: &NewCity) -> Result<City, ApiError> {
        let request = self.client.build_create_city(new_city)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_city(response)
    }

    async fn remove_city(&self, id: i64) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_city(id)).await?;
        self.client.parse_delete_city(response)
    }

    fn start(&self, action: Action) -> InFlight<'_> {
        let mut generation = 0;
        self.state.send_modify(|state| {
            *state = std::mem::take(state).reduce(action);
            generation = state.selection;
        });
        InFlight {
            state: &self.state,
            generation,
            armed: true,
        }
    }
}

fn reject(request: InFlight<'_>, operation: &'static str, err: ApiError) -> ApiError {
    error!(operation, error = %err, "request failed");
    request.finish(Action::Rejected(err.to_string()));
    err
}
