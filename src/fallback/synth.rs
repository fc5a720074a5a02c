//! Synthetic fallback result sets.
//!
//! Records are emitted in the provider's raw shape so they go through the same parser
//! and validator as live data. Names, addresses and contact details are plausible but
//! obviously synthetic (555-01xx phone numbers, `example.com` websites).

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::context::SearchContext;
use crate::geo::Coordinates;
use crate::hashing::hash_parts;
use crate::parser::{CuisineCategory, RawCandidateRecord, Restaurant, normalize_cuisine};
use crate::text;

const MILES_PER_DEGREE_LAT: f64 = 69.0;
const MAX_OFFSET_MILES: f64 = 3.0;

/// Size and score band of a fallback set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityTier {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityTier {
    /// Number of generated entries: 4, 6 or 8.
    pub fn count(&self) -> usize {
        match self {
            QualityTier::Low => 4,
            QualityTier::Medium => 6,
            QualityTier::High => 8,
        }
    }

    /// Inclusive match-score band.
    pub fn score_band(&self) -> (u8, u8) {
        match self {
            QualityTier::Low => (60, 75),
            QualityTier::Medium => (70, 85),
            QualityTier::High => (80, 95),
        }
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(QualityTier::Low),
            "medium" => Ok(QualityTier::Medium),
            "high" => Ok(QualityTier::High),
            other => Err(format!("unknown fallback tier: {}", other)),
        }
    }
}

const ROTATION: &[CuisineCategory] = &[
    CuisineCategory::Italian,
    CuisineCategory::Japanese,
    CuisineCategory::Mexican,
    CuisineCategory::Chinese,
    CuisineCategory::Indian,
    CuisineCategory::Thai,
    CuisineCategory::American,
    CuisineCategory::French,
    CuisineCategory::Mediterranean,
    CuisineCategory::Korean,
];

const NAME_PREFIXES: &[&str] = &[
    "Golden", "Little", "Blue", "Olive", "Red", "Silver", "Harbor", "Maple", "Lucky", "Garden",
    "Corner", "Willow",
];

const STREETS: &[&str] = &[
    "Market Street",
    "Oak Avenue",
    "Cedar Lane",
    "Main Street",
    "Park Boulevard",
    "Elm Street",
    "River Road",
    "Station Plaza",
];

fn venue_noun(category: CuisineCategory) -> &'static str {
    match category {
        CuisineCategory::Italian => "Trattoria",
        CuisineCategory::Japanese => "Sushi House",
        CuisineCategory::Mexican => "Cantina",
        CuisineCategory::Chinese => "Dumpling House",
        CuisineCategory::Indian => "Curry House",
        CuisineCategory::Thai => "Thai Kitchen",
        CuisineCategory::American => "Grill",
        CuisineCategory::French => "Bistro",
        CuisineCategory::Mediterranean => "Mezze Bar",
        CuisineCategory::Korean => "Korean Table",
        _ => "Kitchen",
    }
}

fn typical_price(category: CuisineCategory) -> u8 {
    match category {
        CuisineCategory::French | CuisineCategory::Japanese => 3,
        CuisineCategory::Mexican | CuisineCategory::Thai => 1,
        _ => 2,
    }
}

/// Builds fallback records. Seeded generators are reproducible per cache key.
#[derive(Debug, Clone, Default)]
pub struct FallbackGenerator {
    base_seed: Option<u64>,
}

impl FallbackGenerator {
    /// `None` draws a fresh OS-seeded RNG per call.
    pub fn new(base_seed: Option<u64>) -> Self {
        Self { base_seed }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    fn rng_for(&self, key: &str) -> StdRng {
        match self.base_seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ hash_parts(&[key])),
            None => StdRng::from_os_rng(),
        }
    }

    /// Cuisine the user asked for, via query text or filter.
    fn wanted_category(context: &SearchContext) -> Option<CuisineCategory> {
        context
            .cuisine()
            .and_then(normalize_cuisine)
            .or_else(|| normalize_cuisine(context.normalized_query()))
    }

    /// Raw records for `context`, `tier.count()` of them.
    pub fn records(&self, context: &SearchContext, tier: QualityTier) -> Vec<RawCandidateRecord> {
        let mut rng = self.rng_for(context.cache_key());
        let wanted = Self::wanted_category(context);
        let place = context
            .city()
            .map(|c| text::title_case(&c))
            .or_else(|| {
                context
                    .location()
                    .postal_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
            });

        let rotation_start = rng.random_range(0..ROTATION.len());
        let prefix_start = rng.random_range(0..NAME_PREFIXES.len());
        let street_start = rng.random_range(0..STREETS.len());

        (0..tier.count())
            .map(|i| {
                let category = match wanted {
                    Some(c) if i % 2 == 0 => c,
                    _ => ROTATION[(rotation_start + i) % ROTATION.len()],
                };
                let name = format!(
                    "{} {}",
                    NAME_PREFIXES[(prefix_start + i) % NAME_PREFIXES.len()],
                    venue_noun(category)
                );
                let street = STREETS[(street_start + i) % STREETS.len()];
                let number = rng.random_range(100..1000);
                let address = match &place {
                    Some(place) => format!("{} {}, {}", number, street, place),
                    None => format!("{} {}", number, street),
                };

                let price = match context.price_range() {
                    Some(range) => rng.random_range(range.min..=range.max),
                    None => typical_price(category),
                };
                let rating = f64::from(rng.random_range(38u32..=48)) / 10.0;
                let reviews: u64 = rng.random_range(60..=800);
                let slug = text::tokenize(&name).join("-");

                let mut record = json!({
                    "name": name,
                    "cuisine": category.as_str(),
                    "address": address,
                    "priceLevel": price,
                    "rating": rating,
                    "reviewCount": reviews,
                    "phone": format!("+1 555-01{:02}", rng.random_range(0..100)),
                    "website": format!("https://example.com/{}", slug),
                    "description": format!(
                        "{} serves {} favorites. Suggested while live results are unavailable.",
                        name,
                        category.as_str()
                    ),
                });

                if !context.dietary_restrictions().is_empty() {
                    record["dietaryOptions"] = json!(
                        context
                            .dietary_restrictions()
                            .iter()
                            .map(|d| text::title_case(d))
                            .collect::<Vec<_>>()
                    );
                }

                if let Some(origin) = context.origin() {
                    let reach = context.radius_miles().min(MAX_OFFSET_MILES);
                    let coords = offset(origin, &mut rng, reach);
                    record["coordinates"] = json!({
                        "latitude": coords.latitude,
                        "longitude": coords.longitude,
                    });
                }

                RawCandidateRecord::new(record)
            })
            .collect()
    }

    /// Spreads match scores evenly across the tier's band (best first) and rewrites
    /// reasons, mentioning the query when it matches the entry's cuisine.
    pub fn apply_band(&self, context: &SearchContext, tier: QualityTier, restaurants: &mut [Restaurant]) {
        let (low, high) = tier.score_band();
        let n = restaurants.len();
        let query = if context.query().is_empty() {
            context.cuisine().unwrap_or_default().to_string()
        } else {
            context.query().to_string()
        };
        let wanted = Self::wanted_category(context);

        for (i, restaurant) in restaurants.iter_mut().enumerate() {
            let step = if n > 1 {
                f64::from(high - low) * i as f64 / (n - 1) as f64
            } else {
                0.0
            };
            restaurant.match_score = (f64::from(high) - step).round() as u8;

            let matches_query = (wanted.is_some()
                && normalize_cuisine(&restaurant.cuisine) == wanted)
                || text::significant_tokens(&query)
                    .iter()
                    .any(|t| text::tokenize(&restaurant.cuisine).contains(t));

            restaurant.match_reasons = if matches_query && !query.is_empty() {
                vec![
                    format!("Matches your search for \"{}\"", query),
                    format!("Popular {} spot nearby", restaurant.cuisine),
                ]
            } else {
                vec![
                    format!("Popular {} option nearby", restaurant.cuisine),
                    "Suggested while live results are unavailable".to_string(),
                ]
            };
        }
    }
}

/// A point up to `reach` miles from `origin` in a random direction.
fn offset(origin: Coordinates, rng: &mut StdRng, reach: f64) -> Coordinates {
    let miles = rng.random_range(0.2..=reach.max(0.3));
    let bearing = rng.random_range(0.0..std::f64::consts::TAU);
    let d_lat = miles * bearing.cos() / MILES_PER_DEGREE_LAT;
    let lon_scale = (MILES_PER_DEGREE_LAT * origin.latitude.to_radians().cos()).max(1.0);
    let d_lon = miles * bearing.sin() / lon_scale;
    Coordinates::new(
        (origin.latitude + d_lat).clamp(-90.0, 90.0),
        ((origin.longitude + d_lon + 540.0) % 360.0) - 180.0,
    )
}
