//! Individual validation checks. Each returns the issues it found.

use std::sync::LazyLock;

use regex::Regex;

use super::types::ValidationIssue;
use crate::constants::DISTANCE_WARNING_MILES;
use crate::parser::{Restaurant, normalize_cuisine};
use crate::text;

static SUSPICIOUS_NAMES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\btest\s+restaurant\b",
        r"(?i)\bsample\s+restaurant\b",
        r"(?i)\bexample\s+restaurant\b",
        r"(?i)\blorem\s+ipsum\b",
        r"(?i)\bplaceholder\b",
        r"(?i)\bdummy\b",
        r"(?i)^\s*restaurant\s*\d*\s*$",
        r"(?i)^\s*(n/?a|null|undefined|none|tbd)\s*$",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid suspicious-name regex"))
    .collect()
});

const UPSCALE_WORDS: &[&str] = &["upscale", "elegant", "luxury", "luxurious", "fine dining", "refined"];
const BUDGET_WORDS: &[&str] = &["budget", "cheap", "fast food", "no-frills"];

pub fn required_fields(restaurant: &Restaurant) -> Vec<ValidationIssue> {
    [
        ("name", &restaurant.name),
        ("cuisine", &restaurant.cuisine),
        ("address", &restaurant.address),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| {
        ValidationIssue::error(
            field,
            "MISSING_REQUIRED_FIELD",
            format!("required field `{}` is empty", field),
        )
    })
    .collect()
}

/// First word repeated immediately ("Grill Grill"), if any.
fn repeated_word(name: &str) -> Option<String> {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    words
        .windows(2)
        .find(|pair| pair[0] == pair[1] && pair[0].chars().any(char::is_alphabetic))
        .map(|pair| pair[0].clone())
}

/// Placeholder or test data in the name.
pub fn suspicious_name(restaurant: &Restaurant) -> Vec<ValidationIssue> {
    if let Some(pattern) = SUSPICIOUS_NAMES.iter().find(|p| p.is_match(&restaurant.name)) {
        return vec![ValidationIssue::error(
            "name",
            "SUSPICIOUS_PATTERN",
            format!(
                "name \"{}\" looks like placeholder data (matched {})",
                restaurant.name,
                pattern.as_str()
            ),
        )];
    }
    if let Some(word) = repeated_word(&restaurant.name) {
        return vec![ValidationIssue::error(
            "name",
            "SUSPICIOUS_PATTERN",
            format!("name \"{}\" repeats the word \"{}\"", restaurant.name, word),
        )];
    }
    Vec::new()
}

/// Rating, price and ambiance that do not fit together.
pub fn business_logic(restaurant: &Restaurant) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if restaurant.rating >= 4.5 && restaurant.review_count < 10 {
        issues.push(ValidationIssue::warning(
            "rating",
            "UNRELIABLE_RATING",
            format!(
                "rating {} rests on only {} reviews",
                restaurant.rating, restaurant.review_count
            ),
        ));
    }

    if restaurant.price_level >= 4 && restaurant.website.is_none() {
        issues.push(ValidationIssue::warning(
            "website",
            "PREMIUM_WITHOUT_WEBSITE",
            "high-end restaurant lists no website",
        ));
    }

    let ambiance = restaurant.ambiance.to_lowercase();
    let mismatch = if restaurant.price_level <= 2 {
        UPSCALE_WORDS.iter().find(|w| ambiance.contains(*w))
    } else if restaurant.price_level >= 4 {
        BUDGET_WORDS.iter().find(|w| ambiance.contains(*w))
    } else {
        None
    };
    if let Some(word) = mismatch {
        issues.push(ValidationIssue::warning(
            "ambiance",
            "PRICE_AMBIANCE_MISMATCH",
            format!(
                "price level {} does not fit a \"{}\" ambiance",
                restaurant.price_level, word
            ),
        ));
    }

    issues
}

/// Miles parsed back out of a `"1.3 mi"` distance string.
pub fn parse_distance_miles(distance: &str) -> Option<f64> {
    distance
        .trim()
        .strip_suffix("mi")
        .and_then(|n| n.trim().parse::<f64>().ok())
}

/// Address mentions the searched city; distance is reasonable.
pub fn location_relevance(restaurant: &Restaurant, city: Option<&str>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Some(city) = city.map(text::normalize).filter(|c| !c.is_empty())
        && !text::normalize(&restaurant.address).contains(&city)
    {
        issues.push(ValidationIssue::warning(
            "address",
            "LOCATION_MISMATCH",
            format!("address does not mention {}", text::title_case(&city)),
        ));
    }

    if let Some(miles) = parse_distance_miles(&restaurant.distance)
        && miles > DISTANCE_WARNING_MILES
    {
        issues.push(ValidationIssue::warning(
            "distance",
            "DISTANCE_TOO_FAR",
            format!(
                "{:.1} miles away exceeds {} miles",
                miles, DISTANCE_WARNING_MILES
            ),
        ));
    }

    issues
}

/// At least one significant query token appears in name, cuisine or description.
///
/// A cuisine synonym ("sushi" for Japanese) also counts.
pub fn query_relevance(restaurant: &Restaurant, query: &str) -> Vec<ValidationIssue> {
    let wanted = text::significant_tokens(query);
    if wanted.is_empty() {
        return Vec::new();
    }

    let haystack: Vec<String> = [
        restaurant.name.as_str(),
        restaurant.cuisine.as_str(),
        restaurant.description.as_str(),
    ]
    .iter()
    .flat_map(|s| text::tokenize(s))
    .collect();

    let token_hit = wanted.iter().any(|t| haystack.contains(t));
    let cuisine_hit = normalize_cuisine(query)
        .is_some_and(|category| normalize_cuisine(&restaurant.cuisine) == Some(category));

    if token_hit || cuisine_hit {
        Vec::new()
    } else {
        vec![ValidationIssue::warning(
            "name",
            "LOW_QUERY_RELEVANCE",
            format!("nothing in the record mentions \"{}\"", query.trim()),
        )]
    }
}

/// Parser warnings (dropped phone/website) carried as validator warnings.
pub fn parser_warnings(restaurant: &Restaurant) -> Vec<ValidationIssue> {
    restaurant
        .provenance
        .warnings
        .iter()
        .map(|w| ValidationIssue::warning(&w.field, &w.code, w.message.clone()))
        .collect()
}

/// Informational note about synthesized fields. Never affects the score.
pub fn synthesized_fields(restaurant: &Restaurant) -> Vec<ValidationIssue> {
    if restaurant.provenance.synthesized.is_empty() {
        return Vec::new();
    }
    vec![ValidationIssue::info(
        "provenance",
        "SYNTHESIZED_FIELDS",
        format!(
            "generated values for: {}",
            restaurant.provenance.synthesized.join(", ")
        ),
    )]
}

pub fn suggestion_for(code: &str) -> Option<&'static str> {
    Some(match code {
        "MISSING_REQUIRED_FIELD" => "Provide name, cuisine and address for every result",
        "SUSPICIOUS_PATTERN" => "Exclude placeholder or test entries",
        "UNRELIABLE_RATING" => "Treat ratings with few reviews with caution",
        "PREMIUM_WITHOUT_WEBSITE" => "Add a website for high-end venues",
        "PRICE_AMBIANCE_MISMATCH" => "Check that price level and ambiance agree",
        "LOCATION_MISMATCH" => "Verify the address is in the searched area",
        "DISTANCE_TOO_FAR" => "Narrow the search radius",
        "LOW_QUERY_RELEVANCE" => "Try broader search terms",
        "INVALID_PHONE" => "Provide a phone number in a standard format",
        "INVALID_WEBSITE" => "Provide a full http(s) website URL",
        _ => return None,
    })
}
