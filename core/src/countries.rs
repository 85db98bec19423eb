//! Views derived from the city collection.

use crate::types::City;

/// A visited country with the flag code of the first city seen in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub country: String,
    pub emoji: String,
}

/// Distinct countries in first-seen order.
pub fn derive_countries(cities: &[City]) -> Vec<Country> {
    let mut countries: Vec<Country> = Vec::new();
    for city in cities {
        if countries.iter().any(|c| c.country == city.country) {
            continue;
        }
        countries.push(Country {
            country: city.country.clone(),
            emoji: city.emoji.clone(),
        });
    }
    countries
}

/// Whether `city` is the one shown in the detail view.
pub fn is_selected(current: Option<&City>, city: &City) -> bool {
    current.is_some_and(|current| current.id == city.id)
}
