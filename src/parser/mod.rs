//! Result parser: untrusted provider records in, canonical [`Restaurant`]s out.
//!
//! Each record is checked against the acceptance rules in [`checks`]; any violation puts
//! it in [`ParseOutcome::invalid`] with every reason found. Accepted records have their
//! missing optional fields synthesized (see [`synthesis`]) and recorded in
//! [`Provenance::synthesized`], then receive a match score against the query.
//!
//! Malformed records never produce an `Err`: rejection is data.

pub mod checks;
pub mod cuisine;
pub mod scoring;
pub mod synthesis;
pub mod types;

#[cfg(test)]
mod tests;

pub use cuisine::{CuisineCategory, CuisineMode, normalize_cuisine};
pub use scoring::{MatchCandidate, MatchQuery, match_score};
pub use types::{
    DataSource, InvalidRecord, ParseOutcome, ParseStats, ParseWarning, Provenance,
    RawCandidateRecord, RejectReason, Restaurant,
};

use tracing::debug;

use crate::constants::UNKNOWN_DISTANCE;
use crate::context::SearchContext;
use crate::geo::{Coordinates, format_distance};
use crate::hashing::restaurant_id;
use crate::text;

/// Parses provider records for one search.
#[derive(Debug, Clone)]
pub struct ResultParser {
    mode: CuisineMode,
    origin: Option<Coordinates>,
    query: MatchQuery,
    source: DataSource,
}

impl ResultParser {
    /// A parser with no origin and an empty query.
    pub fn new(mode: CuisineMode) -> Self {
        Self {
            mode,
            origin: None,
            query: MatchQuery::default(),
            source: DataSource::Provider,
        }
    }

    /// A parser scoring against `context`'s query and rejecting records far from its origin.
    pub fn for_context(context: &SearchContext, mode: CuisineMode) -> Self {
        Self {
            mode,
            origin: context.origin(),
            query: MatchQuery::new(context.query(), context.cuisine()),
            source: DataSource::Provider,
        }
    }

    pub fn with_origin(mut self, origin: Option<Coordinates>) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_query(mut self, query: &str, cuisine_filter: Option<&str>) -> Self {
        self.query = MatchQuery::new(query, cuisine_filter);
        self
    }

    /// Tags every accepted record with `source`.
    pub fn with_source(mut self, source: DataSource) -> Self {
        self.source = source;
        self
    }

    pub fn mode(&self) -> CuisineMode {
        self.mode
    }

    /// Partitions `records` into accepted restaurants and rejections.
    pub fn parse(&self, records: &[RawCandidateRecord]) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        outcome.stats.total = records.len();

        for (index, record) in records.iter().enumerate() {
            match self.parse_one(index, record) {
                Ok(restaurant) => {
                    outcome.stats.synthesized_fields += restaurant.provenance.synthesized.len();
                    outcome.stats.warnings += restaurant.provenance.warnings.len();
                    outcome.valid.push(restaurant);
                }
                Err(invalid) => outcome.invalid.push(invalid),
            }
        }

        outcome.stats.accepted = outcome.valid.len();
        outcome.stats.rejected = outcome.invalid.len();
        debug!(
            total = outcome.stats.total,
            accepted = outcome.stats.accepted,
            rejected = outcome.stats.rejected,
            "Parsed provider records"
        );
        outcome
    }

    fn parse_one(
        &self,
        index: usize,
        record: &RawCandidateRecord,
    ) -> Result<Restaurant, InvalidRecord> {
        if record.as_object().is_none() {
            return Err(InvalidRecord {
                index,
                name: None,
                reasons: vec![RejectReason::new(
                    "record",
                    "NOT_AN_OBJECT",
                    "candidate record is not a JSON object",
                )],
            });
        }

        let mut reasons = Vec::new();
        let name = record.text(checks::KEYS_NAME);
        let cuisine_raw = record.text(checks::KEYS_CUISINE);
        let address = record.text(checks::KEYS_ADDRESS);

        for (field, value) in [("name", &name), ("cuisine", &cuisine_raw), ("address", &address)] {
            if value.is_none() {
                reasons.push(RejectReason::new(
                    field,
                    "MISSING_REQUIRED_FIELD",
                    format!("required field `{}` is missing or empty", field),
                ));
            }
        }

        if let Some(name) = &name {
            reasons.extend(checks::check_name(name));
        }

        let mut category = None;
        let mut cuisine = String::new();
        let mut cuisine_normalized = false;
        if let Some(raw) = &cuisine_raw {
            match normalize_cuisine(raw) {
                Some(c) => {
                    category = Some(c);
                    cuisine = c.as_str().to_string();
                    cuisine_normalized = true;
                }
                None if self.mode == CuisineMode::Strict => reasons.push(RejectReason::new(
                    "cuisine",
                    "UNKNOWN_CUISINE",
                    format!("cuisine \"{}\" matches no known category", raw),
                )),
                None => cuisine = text::title_case(raw),
            }
        }

        let price_level = match record.field(checks::KEYS_PRICE) {
            Some(v) => match checks::parse_price_level(v) {
                Ok(p) => Some(p),
                Err(msg) => {
                    reasons.push(RejectReason::new("priceLevel", "INVALID_PRICE_LEVEL", msg));
                    None
                }
            },
            None => None,
        };

        let rating = match record.field(checks::KEYS_RATING) {
            Some(v) => match checks::parse_rating(v) {
                Ok(r) => Some(r),
                Err(msg) => {
                    reasons.push(RejectReason::new("rating", "INVALID_RATING", msg));
                    None
                }
            },
            None => None,
        };

        let review_count = match record.field(checks::KEYS_REVIEWS) {
            Some(v) => match checks::parse_review_count(v) {
                Ok(c) => Some(c),
                Err(msg) => {
                    reasons.push(RejectReason::new("reviewCount", "INVALID_REVIEW_COUNT", msg));
                    None
                }
            },
            None => None,
        };

        let mut distance_miles = None;
        let coordinates = match checks::extract_coordinates(record) {
            Some(Ok(coords)) => {
                if let Some(origin) = &self.origin {
                    match checks::check_plausible_distance(origin, &coords) {
                        Ok(miles) => distance_miles = Some(miles),
                        Err(reason) => reasons.push(reason),
                    }
                }
                Some(coords)
            }
            Some(Err(reason)) => {
                reasons.push(reason);
                None
            }
            None => None,
        };

        let (Some(name), Some(address)) = (name, address) else {
            return Err(InvalidRecord {
                index,
                name: record.text(checks::KEYS_NAME),
                reasons,
            });
        };
        if !reasons.is_empty() {
            return Err(InvalidRecord {
                index,
                name: Some(name),
                reasons,
            });
        }

        let mut provenance = Provenance {
            source: self.source,
            cuisine_normalized,
            ..Default::default()
        };

        let phone = record.text(checks::KEYS_PHONE).and_then(|phone| {
            if checks::is_plausible_phone(&phone) {
                Some(phone)
            } else {
                provenance.warnings.push(ParseWarning::new(
                    "phone",
                    "INVALID_PHONE",
                    format!("phone \"{}\" does not look like a phone number; dropped", phone),
                ));
                None
            }
        });

        let website = record.text(checks::KEYS_WEBSITE).and_then(|url| {
            if checks::is_valid_website(&url) {
                Some(url)
            } else {
                provenance.warnings.push(ParseWarning::new(
                    "website",
                    "INVALID_WEBSITE",
                    format!("website \"{}\" is not a valid http(s) URL; dropped", url),
                ));
                None
            }
        });

        let (score, match_reasons) = match_score(
            &self.query,
            &MatchCandidate {
                name: &name,
                cuisine: &cuisine,
                category,
                rating,
                review_count,
                has_phone: phone.is_some(),
                has_website: website.is_some(),
                has_hours: record.field(checks::KEYS_HOURS).is_some(),
            },
        );

        let mut rng = synthesis::seeded_rng(&name, &address);

        let price_level = price_level.unwrap_or_else(|| {
            provenance.mark("priceLevel");
            synthesis::infer_price_level(&name, category)
        });
        let rating = rating.unwrap_or_else(|| {
            provenance.mark("rating");
            synthesis::rating(&mut rng)
        });
        let review_count = review_count.unwrap_or_else(|| {
            provenance.mark("reviewCount");
            synthesis::review_count(&mut rng)
        });
        let hours = checks::extract_hours(record).unwrap_or_else(|| {
            provenance.mark("hours");
            synthesis::hours(&mut rng)
        });
        let specialties = record.list(&["specialties", "signatureDishes"]).unwrap_or_else(|| {
            provenance.mark("specialties");
            synthesis::specialties(category)
        });
        let dietary_options = record
            .list(&["dietaryOptions", "dietary_options", "dietary"])
            .unwrap_or_else(|| {
                provenance.mark("dietaryOptions");
                synthesis::dietary_options(category)
            });
        let ambiance = record.text(&["ambiance", "atmosphere"]).unwrap_or_else(|| {
            provenance.mark("ambiance");
            synthesis::ambiance(price_level)
        });
        let best_for = record.list(&["bestFor", "best_for"]).unwrap_or_else(|| {
            provenance.mark("bestFor");
            synthesis::best_for(price_level)
        });
        let wait_time = record.text(&["waitTime", "wait_time"]).unwrap_or_else(|| {
            provenance.mark("waitTime");
            synthesis::wait_time(price_level)
        });
        let description = record.text(&["description", "summary"]).unwrap_or_else(|| {
            provenance.mark("description");
            synthesis::description(&name, &cuisine, &specialties, &ambiance)
        });
        let image_url = record
            .text(&["imageUrl", "image_url", "image"])
            .unwrap_or_else(|| {
                provenance.mark("imageUrl");
                synthesis::image_path(category, &cuisine)
            });
        let distance = match distance_miles {
            Some(miles) => format_distance(miles),
            None => record
                .text(&["distance"])
                .unwrap_or_else(|| UNKNOWN_DISTANCE.to_string()),
        };

        Ok(Restaurant {
            id: restaurant_id(&name, &address),
            name,
            cuisine,
            description,
            price_level,
            rating,
            review_count,
            address,
            phone,
            website,
            hours: Some(hours),
            specialties,
            dietary_options,
            ambiance,
            best_for,
            wait_time: Some(wait_time),
            distance,
            coordinates,
            match_score: score,
            match_reasons,
            image_url: Some(image_url),
            quality_score: None,
            provenance,
        })
    }
}
