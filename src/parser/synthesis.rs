//! Deterministic defaults for optional fields the provider left out.
//!
//! Every value is derived from the record's own name, address and cuisine, so the same
//! record always synthesizes the same restaurant. Pseudo-random picks use an RNG seeded
//! from a BLAKE3 hash of name and address.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::cuisine::CuisineCategory;
use crate::hashing::hash_parts;
use crate::text;

const HOURS_ROTATION: &[&str] = &[
    "Mon-Sun: 11:00 AM - 10:00 PM",
    "Mon-Thu: 11:30 AM - 9:30 PM; Fri-Sat: 11:30 AM - 11:00 PM; Sun: 12:00 PM - 9:00 PM",
    "Tue-Sun: 5:00 PM - 10:30 PM; Mon: Closed",
    "Mon-Fri: 7:00 AM - 3:00 PM; Sat-Sun: 8:00 AM - 4:00 PM",
];

const PREMIUM_NAME_KEYWORDS: &[&str] = &[
    "fine", "prime", "grand", "omakase", "chateau", "reserve", "steakhouse", "maison",
];
const BUDGET_NAME_KEYWORDS: &[&str] = &[
    "express", "deli", "diner", "truck", "snack", "shack", "corner", "fast", "taqueria",
];

/// Seeds the per-record RNG.
pub fn seeded_rng(name: &str, address: &str) -> StdRng {
    StdRng::seed_from_u64(hash_parts(&[&text::normalize(name), &text::normalize(address)]))
}

/// Price level from name keywords, else the cuisine's typical band.
pub fn infer_price_level(name: &str, category: Option<CuisineCategory>) -> u8 {
    let tokens = text::tokenize(name);
    if tokens.iter().any(|t| PREMIUM_NAME_KEYWORDS.contains(&t.as_str())) {
        return 4;
    }
    if tokens.iter().any(|t| BUDGET_NAME_KEYWORDS.contains(&t.as_str())) {
        return 1;
    }

    match category {
        Some(CuisineCategory::Steakhouse) => 4,
        Some(CuisineCategory::French | CuisineCategory::Japanese | CuisineCategory::Seafood) => 3,
        Some(
            CuisineCategory::Mexican
            | CuisineCategory::Pizza
            | CuisineCategory::Cafe
            | CuisineCategory::Bakery
            | CuisineCategory::Vietnamese,
        ) => 1,
        _ => 2,
    }
}

/// Rating in 3.5..=4.8, one decimal.
pub fn rating(rng: &mut StdRng) -> f64 {
    f64::from(rng.random_range(35u32..=48)) / 10.0
}

pub fn review_count(rng: &mut StdRng) -> u64 {
    rng.random_range(20..=500)
}

pub fn hours(rng: &mut StdRng) -> String {
    HOURS_ROTATION[rng.random_range(0..HOURS_ROTATION.len())].to_string()
}

pub fn specialties(category: Option<CuisineCategory>) -> Vec<String> {
    let items: &[&str] = match category {
        Some(CuisineCategory::American) => &["Smash burgers", "Buttermilk fried chicken", "Apple pie"],
        Some(CuisineCategory::Italian) => &["Handmade pasta", "Wood-fired pizza", "Tiramisu"],
        Some(CuisineCategory::Mexican) => &["Tacos al pastor", "Mole poblano", "Fresh guacamole"],
        Some(CuisineCategory::Chinese) => &["Dim sum", "Peking duck", "Mapo tofu"],
        Some(CuisineCategory::Japanese) => &["Nigiri", "Tonkotsu ramen", "Tempura"],
        Some(CuisineCategory::Korean) => &["Bulgogi", "Bibimbap", "Kimchi jjigae"],
        Some(CuisineCategory::Thai) => &["Pad thai", "Green curry", "Tom yum"],
        Some(CuisineCategory::Vietnamese) => &["Pho", "Banh mi", "Fresh spring rolls"],
        Some(CuisineCategory::Indian) => &["Butter chicken", "Lamb biryani", "Garlic naan"],
        Some(CuisineCategory::French) => &["Steak frites", "Coq au vin", "Creme brulee"],
        Some(CuisineCategory::Spanish) => &["Paella", "Patatas bravas", "Jamon iberico"],
        Some(CuisineCategory::Greek) => &["Souvlaki", "Moussaka", "Greek salad"],
        Some(CuisineCategory::Mediterranean) => &["Mezze platter", "Grilled halloumi", "Lamb kofta"],
        Some(CuisineCategory::MiddleEastern) => &["Shawarma", "Falafel", "Hummus"],
        Some(CuisineCategory::Seafood) => &["Oysters", "Grilled branzino", "Lobster roll"],
        Some(CuisineCategory::Steakhouse) => &["Dry-aged ribeye", "Filet mignon", "Creamed spinach"],
        Some(CuisineCategory::Pizza) => &["Margherita", "Pepperoni", "Garlic knots"],
        Some(CuisineCategory::Barbecue) => &["Smoked brisket", "Pulled pork", "Baby back ribs"],
        Some(CuisineCategory::Vegetarian) => &["Grain bowls", "Seasonal vegetables", "Plant-based burger"],
        Some(CuisineCategory::Cafe) => &["Espresso drinks", "Avocado toast", "Pastries"],
        Some(CuisineCategory::Bakery) => &["Croissants", "Sourdough", "Seasonal tarts"],
        None => &["Chef's specials", "Seasonal dishes", "House favorites"],
    };
    items.iter().map(|s| s.to_string()).collect()
}

pub fn dietary_options(category: Option<CuisineCategory>) -> Vec<String> {
    let items: &[&str] = match category {
        Some(CuisineCategory::Indian | CuisineCategory::Vegetarian | CuisineCategory::MiddleEastern) => {
            &["Vegetarian", "Vegan", "Gluten-free"]
        }
        Some(CuisineCategory::Japanese | CuisineCategory::Seafood) => &["Pescatarian", "Gluten-free options"],
        Some(CuisineCategory::Steakhouse | CuisineCategory::Barbecue) => &["Gluten-free options"],
        Some(CuisineCategory::Thai | CuisineCategory::Vietnamese | CuisineCategory::Mediterranean) => {
            &["Vegetarian", "Vegan options"]
        }
        _ => &["Vegetarian options"],
    };
    items.iter().map(|s| s.to_string()).collect()
}

pub fn ambiance(price_level: u8) -> String {
    match price_level {
        1 => "Casual and relaxed",
        2 => "Casual and friendly",
        3 => "Stylish and lively",
        4 => "Upscale and refined",
        _ => "Elegant fine dining",
    }
    .to_string()
}

pub fn best_for(price_level: u8) -> Vec<String> {
    let items: &[&str] = match price_level {
        1 => &["Quick bites", "Casual meals"],
        2 => &["Casual dining", "Families", "Groups"],
        3 => &["Date night", "Groups"],
        _ => &["Special occasions", "Business dinners"],
    };
    items.iter().map(|s| s.to_string()).collect()
}

pub fn wait_time(price_level: u8) -> String {
    match price_level {
        1 => "5-10 min",
        2 => "10-20 min",
        3 => "15-30 min",
        _ => "Reservations recommended",
    }
    .to_string()
}

/// Cuisine-keyed description template.
pub fn description(name: &str, cuisine: &str, specialties: &[String], ambiance: &str) -> String {
    let highlight = specialties
        .first()
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "house favorites".to_string());
    format!(
        "{} serves {} cuisine, known for {}. {} atmosphere.",
        name, cuisine, highlight, ambiance
    )
}

/// Placeholder image path for the cuisine.
pub fn image_path(category: Option<CuisineCategory>, cuisine: &str) -> String {
    let slug = match category {
        Some(c) => c.slug(),
        None => {
            let slug = text::tokenize(cuisine).join("-");
            if slug.is_empty() {
                "restaurant".to_string()
            } else {
                slug
            }
        }
    };
    format!("/images/cuisines/{}.jpg", slug)
}
