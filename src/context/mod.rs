//! SearchContext builder.
//!
//! Turns a raw [`SearchRequest`] into an immutable [`SearchContext`] and derives the
//! cache key. Key derivation is deterministic and order-independent: query text is
//! lowercased and whitespace-collapsed, coordinates are rounded to three decimals
//! (about 111 m) to absorb GPS jitter, dietary restrictions are lowercased, deduplicated
//! and sorted, and the components are joined with `|` in a fixed field order:
//!
//! ```text
//! query | lat,lon | city | cuisine | dietary | min-max | radius
//! ```

pub mod error;
pub mod types;


pub use error::ContextError;
pub use types::{ContextCompleteness, LocationData, PriceRange, SearchRequest};

use crate::constants::{
    CACHE_KEY_DELIMITER, COORDINATE_KEY_PRECISION, DEFAULT_RADIUS_MILES, MAX_RESULTS_CEILING,
};
use crate::geo::{Coordinates, format_rounded};
use crate::provider::LocationHint;
use crate::text;

const NONE_COMPONENT: &str = "-";
const DIETARY_SEPARATOR: char = ',';

/// Canonical, immutable view of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchContext {
    query: String,
    normalized_query: String,
    location: LocationData,
    origin: Option<Coordinates>,
    cuisine: Option<String>,
    dietary_restrictions: Vec<String>,
    price_range: Option<PriceRange>,
    radius_miles: f64,
    max_results: usize,
    completeness: ContextCompleteness,
    cache_key: String,
}

impl SearchContext {
    /// Builds a context from a request, using `default_max_results` when the request omits it.
    pub fn from_request(
        request: &SearchRequest,
        default_max_results: usize,
    ) -> Result<Self, ContextError> {
        let origin = match (request.location.latitude, request.location.longitude) {
            (Some(latitude), Some(longitude)) => {
                let coords = Coordinates::new(latitude, longitude);
                if !coords.is_valid() {
                    return Err(ContextError::InvalidCoordinates {
                        latitude,
                        longitude,
                    });
                }
                Some(coords)
            }
            (None, None) => None,
            _ => return Err(ContextError::PartialCoordinates),
        };

        if origin.is_none() && !request.location.has_place_name() {
            return Err(ContextError::MissingLocation);
        }

        let radius_miles = match request.radius {
            Some(r) if r.is_finite() && r > 0.0 => r,
            Some(r) => return Err(ContextError::InvalidRadius(r)),
            None => DEFAULT_RADIUS_MILES,
        };

        let query = request.query.trim().to_string();
        let normalized_query = text::normalize(&query.replace(CACHE_KEY_DELIMITER, " "));

        let cuisine = request
            .cuisine
            .as_deref()
            .map(text::normalize)
            .filter(|c| !c.is_empty());

        let mut dietary_restrictions: Vec<String> = request
            .dietary_restrictions
            .iter()
            .flatten()
            .map(|d| text::normalize(d))
            .filter(|d| !d.is_empty())
            .collect();
        dietary_restrictions.sort();
        dietary_restrictions.dedup();

        let price_range = request
            .price_range
            .map(|[a, b]| PriceRange::normalized(a, b));

        let max_results = request
            .max_results
            .unwrap_or(default_max_results)
            .clamp(1, MAX_RESULTS_CEILING);

        let completeness = if normalized_query.is_empty() && cuisine.is_none() {
            ContextCompleteness::MissingSearchTerms
        } else {
            ContextCompleteness::Complete
        };

        let mut context = Self {
            query,
            normalized_query,
            location: request.location.clone(),
            origin,
            cuisine,
            dietary_restrictions,
            price_range,
            radius_miles,
            max_results,
            completeness,
            cache_key: String::new(),
        };
        context.cache_key = context.derive_cache_key();
        Ok(context)
    }

    fn derive_cache_key(&self) -> String {
        let coords = match self.origin {
            Some(c) => format!(
                "{},{}",
                format_rounded(c.latitude, COORDINATE_KEY_PRECISION),
                format_rounded(c.longitude, COORDINATE_KEY_PRECISION)
            ),
            None => NONE_COMPONENT.to_string(),
        };

        let city = self
            .location
            .city
            .as_deref()
            .map(text::normalize)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| NONE_COMPONENT.to_string());

        let dietary = if self.dietary_restrictions.is_empty() {
            NONE_COMPONENT.to_string()
        } else {
            self.dietary_restrictions
                .iter()
                .map(|d| d.replace(DIETARY_SEPARATOR, " "))
                .collect::<Vec<_>>()
                .join(&DIETARY_SEPARATOR.to_string())
        };

        let price = match self.price_range {
            Some(p) => format!("{}-{}", p.min, p.max),
            None => NONE_COMPONENT.to_string(),
        };

        let components = [
            self.normalized_query.replace(CACHE_KEY_DELIMITER, " "),
            coords,
            city.replace(CACHE_KEY_DELIMITER, " "),
            self.cuisine
                .clone()
                .unwrap_or_else(|| NONE_COMPONENT.to_string())
                .replace(CACHE_KEY_DELIMITER, " "),
            dietary.replace(CACHE_KEY_DELIMITER, " "),
            price,
            format_rounded(self.radius_miles, 1),
        ];

        components.join(&CACHE_KEY_DELIMITER.to_string())
    }

    /// A reduced context for the simplified-query fallback: at most two significant
    /// query terms, no dietary or price filters. `None` when nothing would change.
    pub fn simplified(&self) -> Option<Self> {
        let tokens = text::significant_tokens(&self.normalized_query);
        let simple_query = if tokens.is_empty() {
            self.cuisine.clone().unwrap_or_default()
        } else {
            tokens.into_iter().take(2).collect::<Vec<_>>().join(" ")
        };

        let mut simplified = Self {
            query: simple_query.clone(),
            normalized_query: simple_query,
            dietary_restrictions: Vec::new(),
            price_range: None,
            ..self.clone()
        };
        simplified.cache_key = simplified.derive_cache_key();

        (simplified.cache_key != self.cache_key).then_some(simplified)
    }

    /// Deterministic, order-independent cache key.
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Query text as the user typed it (trimmed).
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Lowercased, whitespace-collapsed query text.
    pub fn normalized_query(&self) -> &str {
        &self.normalized_query
    }

    pub fn location(&self) -> &LocationData {
        &self.location
    }

    /// Search origin, when coordinates were supplied.
    pub fn origin(&self) -> Option<Coordinates> {
        self.origin
    }

    /// Lowercased city name, if any.
    pub fn city(&self) -> Option<String> {
        self.location
            .city
            .as_deref()
            .map(text::normalize)
            .filter(|c| !c.is_empty())
    }

    pub fn cuisine(&self) -> Option<&str> {
        self.cuisine.as_deref()
    }

    pub fn dietary_restrictions(&self) -> &[String] {
        &self.dietary_restrictions
    }

    pub fn price_range(&self) -> Option<PriceRange> {
        self.price_range
    }

    pub fn radius_miles(&self) -> f64 {
        self.radius_miles
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn completeness(&self) -> ContextCompleteness {
        self.completeness
    }

    pub fn is_complete(&self) -> bool {
        self.completeness == ContextCompleteness::Complete
    }

    /// Text handed to the provider: the query, or the cuisine filter when the query is empty.
    pub fn provider_query(&self) -> String {
        match (&self.query, &self.cuisine) {
            (q, _) if !q.is_empty() => q.clone(),
            (_, Some(c)) => format!("{} restaurants", c),
            _ => "restaurants".to_string(),
        }
    }

    /// Location hint for the provider.
    pub fn location_hint(&self) -> LocationHint {
        LocationHint {
            label: self.location.display_name(),
            coordinates: self.origin,
            radius_miles: self.radius_miles,
        }
    }

    /// Coarse identity for error-rate limiting: the city, else coordinates at ~11 km.
    pub fn origin_bucket(&self) -> String {
        if let Some(city) = self.city() {
            return city;
        }
        match self.origin {
            Some(c) => format!(
                "{},{}",
                format_rounded(c.latitude, 1),
                format_rounded(c.longitude, 1)
            ),
            None => self
                .location
                .postal_code
                .as_deref()
                .map(text::normalize)
                .unwrap_or_else(|| NONE_COMPONENT.to_string()),
        }
    }
}
