//! Quality validator.
//!
//! Scores each canonical [`Restaurant`] for completeness, internal consistency and
//! relevance:
//!
//! ```text
//! score = 100 - 20 * errors - 5 * warnings + completeness bonus (0-10) + rating bonus (0/5/10)
//! ```
//!
//! clamped to 0-100. A record is valid iff it has no errors. The acceptance threshold that
//! turns scores into a response set belongs to the pipeline, not to this module.

pub mod rules;
pub mod types;


pub use types::{QualityDistribution, Severity, ValidationIssue, ValidationResult, ValidationStats};

use tracing::debug;

use crate::context::SearchContext;
use crate::parser::Restaurant;

const ERROR_PENALTY: i32 = 20;
const WARNING_PENALTY: i32 = 5;
const MAX_COMPLETENESS_BONUS: f64 = 10.0;
const REQUIRED_WEIGHT: f64 = 3.0;
const OPTIONAL_WEIGHT: f64 = 1.0;
const LIST_WEIGHT: f64 = 0.5;

/// Score before clamping. Each error costs exactly 20, each warning exactly 5.
pub fn raw_score(errors: usize, warnings: usize, completeness_bonus: i32, rating_bonus: i32) -> i32 {
    100 - ERROR_PENALTY * errors as i32 - WARNING_PENALTY * warnings as i32
        + completeness_bonus
        + rating_bonus
}

/// 0-10, proportional to the weighted share of populated fields.
pub fn completeness_bonus(restaurant: &Restaurant) -> i32 {
    let filled = |s: &str| !s.trim().is_empty();
    let required = [
        filled(&restaurant.name),
        filled(&restaurant.cuisine),
        filled(&restaurant.address),
    ];
    let optional = [
        filled(&restaurant.description),
        restaurant.phone.is_some(),
        restaurant.website.is_some(),
        restaurant.hours.is_some(),
        filled(&restaurant.ambiance),
        restaurant.wait_time.is_some(),
        restaurant.image_url.is_some(),
        restaurant.coordinates.is_some(),
    ];
    let lists = [
        !restaurant.specialties.is_empty(),
        !restaurant.dietary_options.is_empty(),
        !restaurant.best_for.is_empty(),
    ];

    let weigh = |flags: &[bool], weight: f64| -> (f64, f64) {
        let have = flags.iter().filter(|f| **f).count() as f64 * weight;
        (have, flags.len() as f64 * weight)
    };
    let (r_have, r_total) = weigh(&required, REQUIRED_WEIGHT);
    let (o_have, o_total) = weigh(&optional, OPTIONAL_WEIGHT);
    let (l_have, l_total) = weigh(&lists, LIST_WEIGHT);

    let share = (r_have + o_have + l_have) / (r_total + o_total + l_total);
    (share * MAX_COMPLETENESS_BONUS).round() as i32
}

/// 10 for rating >= 4.0 with 50+ reviews, 5 for rating >= 3.5 with 20+ reviews.
pub fn rating_bonus(rating: f64, review_count: u64) -> i32 {
    if rating >= 4.0 && review_count >= 50 {
        10
    } else if rating >= 3.5 && review_count >= 20 {
        5
    } else {
        0
    }
}

/// Validates restaurants for one search.
#[derive(Debug, Clone, Default)]
pub struct QualityValidator {
    city: Option<String>,
    query: String,
}

/// Per-record results (same order as the input) plus list statistics.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub results: Vec<ValidationResult>,
    pub stats: ValidationStats,
}

impl QualityValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks location against the context's city and relevance against its query
    /// (or cuisine filter when the query is empty).
    pub fn for_context(context: &SearchContext) -> Self {
        let query = if context.normalized_query().is_empty() {
            context.cuisine().unwrap_or_default().to_string()
        } else {
            context.normalized_query().to_string()
        };
        Self {
            city: context.city(),
            query,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn validate(&self, restaurant: &Restaurant) -> ValidationResult {
        let mut issues = rules::required_fields(restaurant);
        issues.extend(rules::suspicious_name(restaurant));
        issues.extend(rules::business_logic(restaurant));
        issues.extend(rules::location_relevance(restaurant, self.city.as_deref()));
        issues.extend(rules::query_relevance(restaurant, &self.query));
        issues.extend(rules::parser_warnings(restaurant));
        issues.extend(rules::synthesized_fields(restaurant));

        let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
        let warnings = issues.iter().filter(|i| i.severity == Severity::Warning).count();
        let raw = raw_score(
            errors,
            warnings,
            completeness_bonus(restaurant),
            rating_bonus(restaurant.rating, restaurant.review_count),
        );

        let mut suggestions: Vec<String> = Vec::new();
        for issue in &issues {
            if let Some(s) = rules::suggestion_for(&issue.code)
                && !suggestions.iter().any(|existing| existing == s)
            {
                suggestions.push(s.to_string());
            }
        }

        ValidationResult {
            is_valid: errors == 0,
            score: raw.clamp(0, 100) as u8,
            raw_score: raw,
            issues,
            suggestions,
        }
    }

    pub fn validate_batch(&self, restaurants: &[Restaurant]) -> ValidationReport {
        let results: Vec<ValidationResult> = restaurants.iter().map(|r| self.validate(r)).collect();

        let mut stats = ValidationStats {
            total: results.len(),
            ..Default::default()
        };
        for result in &results {
            if result.is_valid {
                stats.valid += 1;
            } else {
                stats.invalid += 1;
            }
            stats.distribution.record(result.score);
        }
        if !results.is_empty() {
            let sum: f64 = results.iter().map(|r| f64::from(r.score)).sum();
            stats.mean_score = (sum / results.len() as f64 * 10.0).round() / 10.0;
        }

        debug!(
            total = stats.total,
            valid = stats.valid,
            invalid = stats.invalid,
            mean_score = stats.mean_score,
            "Validated restaurants"
        );
        ValidationReport { results, stats }
    }
}
