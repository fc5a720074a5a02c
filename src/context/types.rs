use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// Where the user is searching. Either coordinates or a place name must be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl LocationData {
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Default::default()
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Both coordinates, when present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    /// `true` when a city or postal code names the place.
    pub fn has_place_name(&self) -> bool {
        [&self.city, &self.postal_code]
            .into_iter()
            .any(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    /// Comma-joined city/state/country, falling back to coordinates.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [&self.city, &self.state, &self.country, &self.postal_code]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if !parts.is_empty() {
            return parts.join(", ");
        }

        match self.coordinates() {
            Some(c) => format!("{:.4}, {:.4}", c.latitude, c.longitude),
            None => "unknown location".to_string(),
        }
    }
}

/// Inbound search request (the pipeline's entry-point shape).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    pub location: LocationData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<[i64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, location: LocationData) -> Self {
        Self {
            query: query.into(),
            location,
            ..Default::default()
        }
    }
}

/// Inclusive price-level band, both ends within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u8,
    pub max: u8,
}

impl PriceRange {
    /// Clamps both ends into 1..=5 and orders them.
    pub fn normalized(a: i64, b: i64) -> Self {
        let a = a.clamp(1, 5) as u8;
        let b = b.clamp(1, 5) as u8;
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, level: u8) -> bool {
        (self.min..=self.max).contains(&level)
    }
}

/// Whether the context carries enough signal for a focused search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextCompleteness {
    Complete,
    /// Neither query text nor a cuisine filter; callers may proceed with lowered expectations.
    MissingSearchTerms,
}
