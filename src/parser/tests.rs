use serde_json::json;

use super::*;

fn tokyo() -> Coordinates {
    Coordinates::new(35.6762, 139.6503)
}

fn parser() -> ResultParser {
    ResultParser::new(CuisineMode::Lenient)
        .with_origin(Some(tokyo()))
        .with_query("sushi", None)
}

fn record(value: serde_json::Value) -> RawCandidateRecord {
    RawCandidateRecord::new(value)
}

fn minimal(name: &str) -> RawCandidateRecord {
    record(json!({
        "name": name,
        "cuisine": "Japanese",
        "address": "1-2-3 Shibuya, Tokyo",
    }))
}

#[test]
fn test_missing_name_is_rejected_with_reason() {
    let outcome = parser().parse(&[record(json!({
        "cuisine": "Japanese",
        "address": "Tokyo",
    }))]);

    assert!(outcome.valid.is_empty());
    assert_eq!(outcome.invalid.len(), 1);
    let invalid = &outcome.invalid[0];
    assert!(invalid.has_code("MISSING_REQUIRED_FIELD"));
    assert!(invalid.reasons.iter().any(|r| r.field == "name"));
}

#[test]
fn test_empty_strings_count_as_missing() {
    let outcome = parser().parse(&[record(json!({
        "name": "  ",
        "cuisine": "",
        "address": "Tokyo",
    }))]);
    assert_eq!(outcome.invalid[0].reasons.len(), 2);
}

#[test]
fn test_non_object_record() {
    let outcome = parser().parse(&[record(json!("Sushi Zen"))]);
    assert!(outcome.invalid[0].has_code("NOT_AN_OBJECT"));
}

#[test]
fn test_name_rules() {
    let outcome = parser().parse(&[minimal("X"), minimal("Sushi <script>"), minimal("Joe's Bar & Grill!")]);
    assert_eq!(outcome.valid.len(), 1);
    assert_eq!(outcome.valid[0].name, "Joe's Bar & Grill!");
    assert!(outcome.invalid[0].has_code("INVALID_NAME_LENGTH"));
    assert!(outcome.invalid[1].has_code("INVALID_NAME_CHARACTERS"));
}

#[test]
fn test_cuisine_synonyms_and_modes() {
    let raw = |cuisine: &str| {
        record(json!({"name": "Casa Nova", "cuisine": cuisine, "address": "Tokyo"}))
    };

    let outcome = parser().parse(&[raw("trattoria"), raw("Neo-Nordic")]);
    assert_eq!(outcome.valid[0].cuisine, "Italian");
    assert!(outcome.valid[0].provenance.cuisine_normalized);
    assert_eq!(outcome.valid[1].cuisine, "Neo-nordic");
    assert!(!outcome.valid[1].provenance.cuisine_normalized);

    let strict = ResultParser::new(CuisineMode::Strict).parse(&[raw("Neo-Nordic")]);
    assert!(strict.invalid[0].has_code("UNKNOWN_CUISINE"));
}

#[test]
fn test_numeric_ranges() {
    let base = |extra: serde_json::Value| {
        let mut value = json!({"name": "Sushi Zen", "cuisine": "Japanese", "address": "Tokyo"});
        for (k, v) in extra.as_object().unwrap() {
            value[k] = v.clone();
        }
        record(value)
    };

    let outcome = parser().parse(&[
        base(json!({"priceLevel": 6})),
        base(json!({"priceLevel": 2.5})),
        base(json!({"rating": 5.5})),
        base(json!({"reviewCount": -3})),
        base(json!({"priceLevel": "$$$", "rating": "4.2", "reviewCount": "1,204"})),
    ]);

    assert!(outcome.invalid[0].has_code("INVALID_PRICE_LEVEL"));
    assert!(outcome.invalid[1].has_code("INVALID_PRICE_LEVEL"));
    assert!(outcome.invalid[2].has_code("INVALID_RATING"));
    assert!(outcome.invalid[3].has_code("INVALID_REVIEW_COUNT"));

    let ok = &outcome.valid[0];
    assert_eq!(ok.price_level, 3);
    assert_eq!(ok.rating, 4.2);
    assert_eq!(ok.review_count, 1204);
    assert!(!ok.provenance.is_synthesized("rating"));
}

#[test]
fn test_coordinates_validity_and_distance() {
    let near = record(json!({
        "name": "Near Place", "cuisine": "Japanese", "address": "Tokyo",
        "coordinates": {"latitude": 35.6895, "longitude": 139.6917}
    }));
    let far = record(json!({
        "name": "Osaka Place", "cuisine": "Japanese", "address": "Osaka",
        "lat": 34.6937, "lng": 135.5023
    }));
    let broken = record(json!({
        "name": "Broken Place", "cuisine": "Japanese", "address": "Tokyo",
        "coordinates": {"latitude": 135.0, "longitude": 10.0}
    }));

    let outcome = parser().parse(&[near, far, broken]);
    assert_eq!(outcome.valid.len(), 1);
    assert!(outcome.valid[0].distance.ends_with(" mi"));
    assert!(outcome.invalid[0].has_code("TOO_FAR"));
    assert!(outcome.invalid[1].has_code("INVALID_COORDINATES"));
}

#[test]
fn test_far_records_are_kept_without_origin() {
    let far = record(json!({
        "name": "Osaka Place", "cuisine": "Japanese", "address": "Osaka",
        "lat": 34.6937, "lng": 135.5023
    }));
    let outcome = ResultParser::new(CuisineMode::Lenient).parse(&[far]);
    assert_eq!(outcome.valid.len(), 1);
    assert_eq!(outcome.valid[0].distance, UNKNOWN_DISTANCE);
}

#[test]
fn test_bad_phone_and_website_are_warnings() {
    let outcome = parser().parse(&[record(json!({
        "name": "Sushi Zen", "cuisine": "Japanese", "address": "Tokyo",
        "phone": "call us", "website": "not a url"
    }))]);

    let restaurant = &outcome.valid[0];
    assert!(restaurant.phone.is_none());
    assert!(restaurant.website.is_none());
    let codes: Vec<&str> = restaurant
        .provenance
        .warnings
        .iter()
        .map(|w| w.code.as_str())
        .collect();
    assert_eq!(codes, vec!["INVALID_PHONE", "INVALID_WEBSITE"]);
    assert_eq!(outcome.stats.warnings, 2);
}

#[test]
fn test_valid_contact_details_are_kept() {
    let outcome = parser().parse(&[record(json!({
        "name": "Sushi Zen", "cuisine": "Japanese", "address": "Tokyo",
        "phone": "+81 3-1234-5678", "website": "https://sushizen.example.jp"
    }))]);
    let restaurant = &outcome.valid[0];
    assert_eq!(restaurant.phone.as_deref(), Some("+81 3-1234-5678"));
    assert_eq!(restaurant.website.as_deref(), Some("https://sushizen.example.jp"));
    assert!(restaurant.provenance.warnings.is_empty());
}

#[test]
fn test_synthesis_fills_every_generated_field() {
    let outcome = parser().parse(&[minimal("Quiet Garden")]);
    let r = &outcome.valid[0];

    assert!(!r.description.is_empty());
    assert!((1..=5).contains(&r.price_level));
    assert!((3.5..=4.8).contains(&r.rating));
    assert!((20..=500).contains(&r.review_count));
    assert!(r.hours.as_deref().is_some_and(|h| !h.is_empty()));
    assert!(!r.specialties.is_empty());
    assert!(!r.dietary_options.is_empty());
    assert!(!r.ambiance.is_empty());
    assert!(!r.best_for.is_empty());
    assert!(r.wait_time.is_some());
    assert!(!r.distance.is_empty());
    assert!(r.image_url.is_some());
    assert!(r.id.starts_with("rst_"));
    assert!(r.phone.is_none());
    assert!(r.website.is_none());

    for field in [
        "priceLevel",
        "rating",
        "reviewCount",
        "hours",
        "specialties",
        "dietaryOptions",
        "ambiance",
        "bestFor",
        "waitTime",
        "description",
        "imageUrl",
    ] {
        assert!(r.provenance.is_synthesized(field), "{} not flagged", field);
    }
    assert!(!r.provenance.is_synthesized("phone"));
    assert!(!r.provenance.is_synthesized("website"));
    assert_eq!(r.provenance.source, DataSource::Provider);
}

#[test]
fn test_synthesis_is_deterministic() {
    let a = parser().parse(&[minimal("Quiet Garden")]);
    let b = parser().parse(&[minimal("Quiet Garden")]);
    assert_eq!(a.valid[0], b.valid[0]);
}

#[test]
fn test_price_inference_from_name() {
    let outcome = parser().parse(&[minimal("Prime Cut House"), minimal("Noodle Express")]);
    assert_eq!(outcome.valid[0].price_level, 4);
    assert_eq!(outcome.valid[1].price_level, 1);
}

#[test]
fn test_provider_fields_pass_through() {
    let outcome = parser().parse(&[record(json!({
        "name": "Sushi Zen", "cuisine": "sushi bar", "address": "Tokyo",
        "hours": {"Mon": "11-22", "Tue": "11-22"},
        "specialties": "Omakase, Uni",
        "dietaryOptions": ["Gluten-free"],
        "description": "Counter seating only."
    }))]);
    let r = &outcome.valid[0];
    assert_eq!(r.cuisine, "Japanese");
    assert_eq!(r.hours.as_deref(), Some("Mon: 11-22; Tue: 11-22"));
    assert_eq!(r.specialties, vec!["Omakase", "Uni"]);
    assert_eq!(r.dietary_options, vec!["Gluten-free"]);
    assert_eq!(r.description, "Counter seating only.");
    assert!(!r.provenance.is_synthesized("hours"));
}

#[test]
fn test_stats() {
    let outcome = parser().parse(&[minimal("Sushi Zen"), minimal("?")]);
    assert_eq!(outcome.stats.total, 2);
    assert_eq!(outcome.stats.accepted, 1);
    assert_eq!(outcome.stats.rejected, 1);
    assert!(outcome.stats.synthesized_fields > 0);
}

#[test]
fn test_normalize_cuisine_table() {
    assert_eq!(normalize_cuisine("ITALIAN"), Some(CuisineCategory::Italian));
    assert_eq!(normalize_cuisine("Taqueria"), Some(CuisineCategory::Mexican));
    assert_eq!(normalize_cuisine("korean bbq"), Some(CuisineCategory::Korean));
    assert_eq!(normalize_cuisine("Texas BBQ"), Some(CuisineCategory::Barbecue));
    assert_eq!(normalize_cuisine("middle-eastern"), Some(CuisineCategory::MiddleEastern));
    assert_eq!(normalize_cuisine("gastropub"), None);
    assert_eq!(normalize_cuisine(""), None);
}
