//! Closed cuisine categories and the synonym table used to normalise free text.

use std::str::FromStr;

use crate::text;

/// Known cuisine categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CuisineCategory {
    American,
    Italian,
    Mexican,
    Chinese,
    Japanese,
    Korean,
    Thai,
    Vietnamese,
    Indian,
    French,
    Spanish,
    Greek,
    Mediterranean,
    MiddleEastern,
    Seafood,
    Steakhouse,
    Pizza,
    Barbecue,
    Vegetarian,
    Cafe,
    Bakery,
}

impl CuisineCategory {
    pub const ALL: [CuisineCategory; 21] = [
        CuisineCategory::American,
        CuisineCategory::Italian,
        CuisineCategory::Mexican,
        CuisineCategory::Chinese,
        CuisineCategory::Japanese,
        CuisineCategory::Korean,
        CuisineCategory::Thai,
        CuisineCategory::Vietnamese,
        CuisineCategory::Indian,
        CuisineCategory::French,
        CuisineCategory::Spanish,
        CuisineCategory::Greek,
        CuisineCategory::Mediterranean,
        CuisineCategory::MiddleEastern,
        CuisineCategory::Seafood,
        CuisineCategory::Steakhouse,
        CuisineCategory::Pizza,
        CuisineCategory::Barbecue,
        CuisineCategory::Vegetarian,
        CuisineCategory::Cafe,
        CuisineCategory::Bakery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CuisineCategory::American => "American",
            CuisineCategory::Italian => "Italian",
            CuisineCategory::Mexican => "Mexican",
            CuisineCategory::Chinese => "Chinese",
            CuisineCategory::Japanese => "Japanese",
            CuisineCategory::Korean => "Korean",
            CuisineCategory::Thai => "Thai",
            CuisineCategory::Vietnamese => "Vietnamese",
            CuisineCategory::Indian => "Indian",
            CuisineCategory::French => "French",
            CuisineCategory::Spanish => "Spanish",
            CuisineCategory::Greek => "Greek",
            CuisineCategory::Mediterranean => "Mediterranean",
            CuisineCategory::MiddleEastern => "Middle Eastern",
            CuisineCategory::Seafood => "Seafood",
            CuisineCategory::Steakhouse => "Steakhouse",
            CuisineCategory::Pizza => "Pizza",
            CuisineCategory::Barbecue => "Barbecue",
            CuisineCategory::Vegetarian => "Vegetarian",
            CuisineCategory::Cafe => "Cafe",
            CuisineCategory::Bakery => "Bakery",
        }
    }

    /// Lowercase, hyphenated form used in image paths.
    pub fn slug(&self) -> String {
        self.as_str().to_lowercase().replace(' ', "-")
    }

    /// Exact (case- and whitespace-insensitive) category name lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = text::normalize(label);
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == wanted)
    }
}

impl std::fmt::Display for CuisineCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-word entries come first so "korean bbq" wins over "bbq".
const SYNONYMS: &[(&str, CuisineCategory)] = &[
    ("korean bbq", CuisineCategory::Korean),
    ("tex mex", CuisineCategory::Mexican),
    ("dim sum", CuisineCategory::Chinese),
    ("banh mi", CuisineCategory::Vietnamese),
    ("middle eastern", CuisineCategory::MiddleEastern),
    ("fine dining", CuisineCategory::French),
    ("trattoria", CuisineCategory::Italian),
    ("osteria", CuisineCategory::Italian),
    ("pasta", CuisineCategory::Italian),
    ("taqueria", CuisineCategory::Mexican),
    ("tacos", CuisineCategory::Mexican),
    ("taco", CuisineCategory::Mexican),
    ("burrito", CuisineCategory::Mexican),
    ("cantina", CuisineCategory::Mexican),
    ("sushi", CuisineCategory::Japanese),
    ("ramen", CuisineCategory::Japanese),
    ("izakaya", CuisineCategory::Japanese),
    ("udon", CuisineCategory::Japanese),
    ("yakitori", CuisineCategory::Japanese),
    ("omakase", CuisineCategory::Japanese),
    ("szechuan", CuisineCategory::Chinese),
    ("sichuan", CuisineCategory::Chinese),
    ("cantonese", CuisineCategory::Chinese),
    ("dumplings", CuisineCategory::Chinese),
    ("dumpling", CuisineCategory::Chinese),
    ("bibimbap", CuisineCategory::Korean),
    ("pho", CuisineCategory::Vietnamese),
    ("curry", CuisineCategory::Indian),
    ("tandoori", CuisineCategory::Indian),
    ("punjabi", CuisineCategory::Indian),
    ("bistro", CuisineCategory::French),
    ("brasserie", CuisineCategory::French),
    ("tapas", CuisineCategory::Spanish),
    ("paella", CuisineCategory::Spanish),
    ("gyro", CuisineCategory::Greek),
    ("souvlaki", CuisineCategory::Greek),
    ("falafel", CuisineCategory::MiddleEastern),
    ("shawarma", CuisineCategory::MiddleEastern),
    ("lebanese", CuisineCategory::MiddleEastern),
    ("persian", CuisineCategory::MiddleEastern),
    ("turkish", CuisineCategory::MiddleEastern),
    ("oyster", CuisineCategory::Seafood),
    ("fish", CuisineCategory::Seafood),
    ("steak", CuisineCategory::Steakhouse),
    ("chophouse", CuisineCategory::Steakhouse),
    ("pizzeria", CuisineCategory::Pizza),
    ("bbq", CuisineCategory::Barbecue),
    ("smokehouse", CuisineCategory::Barbecue),
    ("vegan", CuisineCategory::Vegetarian),
    ("plant based", CuisineCategory::Vegetarian),
    ("coffee", CuisineCategory::Cafe),
    ("espresso", CuisineCategory::Cafe),
    ("patisserie", CuisineCategory::Bakery),
    ("pastry", CuisineCategory::Bakery),
    ("burger", CuisineCategory::American),
    ("burgers", CuisineCategory::American),
    ("diner", CuisineCategory::American),
];

/// Maps free cuisine text to a category: exact name first, then whole-word synonyms.
pub fn normalize_cuisine(value: &str) -> Option<CuisineCategory> {
    if let Some(category) = CuisineCategory::from_label(value) {
        return Some(category);
    }

    let tokens = text::tokenize(value);
    if tokens.is_empty() {
        return None;
    }
    let padded = format!(" {} ", tokens.join(" "));

    if let Some(category) = CuisineCategory::ALL
        .into_iter()
        .find(|c| padded.contains(&format!(" {} ", c.as_str().to_lowercase())))
    {
        return Some(category);
    }

    SYNONYMS
        .iter()
        .find(|(synonym, _)| padded.contains(&format!(" {} ", synonym)))
        .map(|(_, category)| *category)
}

/// What to do with a cuisine that matches no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CuisineMode {
    /// Reject the record as `UNKNOWN_CUISINE`.
    Strict,
    /// Keep the value, title-cased, and mark it unnormalised.
    #[default]
    Lenient,
}

impl FromStr for CuisineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(CuisineMode::Strict),
            "lenient" => Ok(CuisineMode::Lenient),
            other => Err(format!("unknown cuisine mode: {}", other)),
        }
    }
}
