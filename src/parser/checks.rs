//! Per-field acceptance rules for raw candidate records.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use serde_json::Value;

use super::types::{RawCandidateRecord, RejectReason};
use crate::constants::MAX_PLAUSIBLE_DISTANCE_MILES;
use crate::geo::Coordinates;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;

static NAME_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}\s\-'’&.!]+$").expect("valid name regex"));

static PHONE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s().\-]+(?:\s*(?:x|ext\.?)\s*\d{1,5})?$").expect("valid phone regex"));

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

pub const KEYS_NAME: &[&str] = &["name", "title"];
pub const KEYS_CUISINE: &[&str] = &["cuisine", "cuisineType", "category"];
pub const KEYS_ADDRESS: &[&str] = &["address", "formattedAddress", "location"];
pub const KEYS_PRICE: &[&str] = &["priceLevel", "price_level", "price"];
pub const KEYS_RATING: &[&str] = &["rating", "stars"];
pub const KEYS_REVIEWS: &[&str] = &["reviewCount", "review_count", "reviews"];
pub const KEYS_PHONE: &[&str] = &["phone", "phoneNumber", "telephone"];
pub const KEYS_WEBSITE: &[&str] = &["website", "url"];
pub const KEYS_HOURS: &[&str] = &["hours", "openingHours"];

/// Length and character-set rules for a name.
pub fn check_name(name: &str) -> Vec<RejectReason> {
    let mut reasons = Vec::new();
    let len = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        reasons.push(RejectReason::new(
            "name",
            "INVALID_NAME_LENGTH",
            format!(
                "name must be {}-{} characters, got {}",
                NAME_MIN_CHARS, NAME_MAX_CHARS, len
            ),
        ));
    }
    if !NAME_CHARSET.is_match(name) {
        reasons.push(RejectReason::new(
            "name",
            "INVALID_NAME_CHARACTERS",
            "name contains characters outside letters, digits, spaces and - ' & . !",
        ));
    }
    reasons
}

/// Integer in 1..=5. Accepts `"$$"`-style strings and numeric strings.
pub fn parse_price_level(value: &Value) -> Result<u8, String> {
    let level = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 => f as i64,
                _ => return Err(format!("price level must be an integer, got {}", n)),
            },
        },
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c == '$') {
                s.chars().count() as i64
            } else {
                s.parse::<i64>()
                    .map_err(|_| format!("price level must be an integer, got \"{}\"", s))?
            }
        }
        other => return Err(format!("price level must be an integer, got {}", other)),
    };

    if (1..=5).contains(&level) {
        Ok(level as u8)
    } else {
        Err(format!("price level must be within 1-5, got {}", level))
    }
}

/// Real number in 1.0..=5.0.
pub fn parse_rating(value: &Value) -> Result<f64, String> {
    let rating = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|r| r.is_finite())
    .ok_or_else(|| format!("rating must be a number, got {}", value))?;

    if (1.0..=5.0).contains(&rating) {
        Ok(rating)
    } else {
        Err(format!("rating must be within 1.0-5.0, got {}", rating))
    }
}

/// Non-negative integer. Thousands separators in strings are tolerated.
pub fn parse_review_count(value: &Value) -> Result<u64, String> {
    match value {
        Value::Number(n) => {
            if let Some(count) = n.as_u64() {
                return Ok(count);
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
                _ => Err(format!(
                    "review count must be a non-negative integer, got {}",
                    n
                )),
            }
        }
        Value::String(s) => s.trim().replace(',', "").parse::<u64>().map_err(|_| {
            format!(
                "review count must be a non-negative integer, got \"{}\"",
                s
            )
        }),
        other => Err(format!(
            "review count must be a non-negative integer, got {}",
            other
        )),
    }
}

fn as_coordinate(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coordinates from a `coordinates` object or top-level `lat`/`lng` style keys.
///
/// `None` when the record carries no position at all.
pub fn extract_coordinates(
    record: &RawCandidateRecord,
) -> Option<Result<Coordinates, RejectReason>> {
    let (lat, lon) = match record.field(&["coordinates", "geo", "position"]) {
        Some(Value::Object(map)) => (
            as_coordinate(map.get("latitude").or_else(|| map.get("lat"))),
            as_coordinate(
                map.get("longitude")
                    .or_else(|| map.get("lng"))
                    .or_else(|| map.get("lon")),
            ),
        ),
        Some(Value::Array(pair)) if pair.len() == 2 => {
            (as_coordinate(pair.first()), as_coordinate(pair.get(1)))
        }
        Some(_) => (None, None),
        None => {
            let lat = record.field(&["latitude", "lat"]);
            let lon = record.field(&["longitude", "lng", "lon"]);
            if lat.is_none() && lon.is_none() {
                return None;
            }
            (as_coordinate(lat), as_coordinate(lon))
        }
    };

    let invalid = || {
        RejectReason::new(
            "coordinates",
            "INVALID_COORDINATES",
            "coordinates must be numeric with latitude in [-90, 90] and longitude in [-180, 180]",
        )
    };

    Some(match (lat, lon) {
        (Some(lat), Some(lon)) => {
            let coords = Coordinates::new(lat, lon);
            if coords.is_valid() {
                Ok(coords)
            } else {
                Err(invalid())
            }
        }
        _ => Err(invalid()),
    })
}

/// Rejects positions implausibly far from the search origin.
pub fn check_plausible_distance(origin: &Coordinates, coords: &Coordinates) -> Result<f64, RejectReason> {
    let miles = origin.distance_miles(coords);
    if miles > MAX_PLAUSIBLE_DISTANCE_MILES {
        Err(RejectReason::new(
            "coordinates",
            "TOO_FAR",
            format!(
                "{:.1} miles from the search origin exceeds the {} mile plausibility radius",
                miles, MAX_PLAUSIBLE_DISTANCE_MILES
            ),
        ))
    } else {
        Ok(miles)
    }
}

/// Loose phone check: plausible shape and 7-15 digits.
pub fn is_plausible_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    PHONE_SHAPE.is_match(phone.trim()) && (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

/// Strict URL check: parses, http(s) scheme, dotted host.
pub fn is_valid_website(website: &str) -> bool {
    match Url::parse(website.trim()) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url
                    .host_str()
                    .is_some_and(|h| h.contains('.') && !h.starts_with('.') && !h.ends_with('.'))
        }
        Err(_) => false,
    }
}

/// Opening hours from a string, a list of strings, or a day -> hours object.
pub fn extract_hours(record: &RawCandidateRecord) -> Option<String> {
    let hours = match record.field(KEYS_HOURS)? {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(days) => days
            .iter()
            .filter_map(|(day, v)| v.as_str().map(|h| format!("{}: {}", day, h.trim())))
            .collect::<Vec<_>>()
            .join("; "),
        _ => return None,
    };
    (!hours.is_empty()).then_some(hours)
}
