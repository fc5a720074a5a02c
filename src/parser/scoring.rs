//! Query relevance ("match score") and the reasons shown next to it.

use super::cuisine::{CuisineCategory, normalize_cuisine};
use crate::text;

const BASE_SCORE: i32 = 40;
const EXACT_NAME_POINTS: i32 = 35;
const PARTIAL_NAME_POINTS: i32 = 30;
const NAME_TOKEN_POINTS: i32 = 15;
const NAME_TOKEN_CAP: i32 = 25;
const CUISINE_POINTS: i32 = 20;
const MAX_REASONS: usize = 3;

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub struct MatchQuery {
    normalized: String,
    tokens: Vec<String>,
    category: Option<CuisineCategory>,
    filter: Option<String>,
    filter_category: Option<CuisineCategory>,
}

impl MatchQuery {
    pub fn new(query: &str, cuisine_filter: Option<&str>) -> Self {
        let normalized = text::normalize(query);
        Self {
            tokens: text::significant_tokens(&normalized),
            category: normalize_cuisine(&normalized),
            filter: cuisine_filter.map(text::normalize).filter(|f| !f.is_empty()),
            filter_category: cuisine_filter.and_then(normalize_cuisine),
            normalized,
        }
    }

    pub fn text(&self) -> &str {
        &self.normalized
    }

    /// `true` when the query text or cuisine filter points at this cuisine.
    pub fn wants_cuisine(&self, label: &str, category: Option<CuisineCategory>) -> bool {
        let label = text::normalize(label);
        if let Some(category) = category
            && (self.category == Some(category) || self.filter_category == Some(category))
        {
            return true;
        }
        if label.is_empty() {
            return false;
        }
        self.filter.as_deref() == Some(label.as_str())
            || text::tokenize(&label).iter().any(|t| self.tokens.contains(t))
    }
}

/// Signals a candidate exposes to scoring.
#[derive(Debug, Clone)]
pub struct MatchCandidate<'a> {
    pub name: &'a str,
    pub cuisine: &'a str,
    pub category: Option<CuisineCategory>,
    /// `None` when the rating was synthesized.
    pub rating: Option<f64>,
    /// `None` when the review count was synthesized.
    pub review_count: Option<u64>,
    pub has_phone: bool,
    pub has_website: bool,
    pub has_hours: bool,
}

/// 0-100 relevance score plus up to three reasons ordered by contribution.
pub fn match_score(query: &MatchQuery, candidate: &MatchCandidate<'_>) -> (u8, Vec<String>) {
    let mut score = BASE_SCORE;
    let mut reasons: Vec<(i32, String)> = Vec::new();

    let name = text::normalize(candidate.name);
    if !query.normalized.is_empty() {
        if name == query.normalized {
            score += EXACT_NAME_POINTS;
            reasons.push((EXACT_NAME_POINTS, format!("Exact name match for \"{}\"", query.normalized)));
        } else if name.contains(&query.normalized) {
            score += PARTIAL_NAME_POINTS;
            reasons.push((PARTIAL_NAME_POINTS, format!("Name contains \"{}\"", query.normalized)));
        } else {
            let name_tokens = text::tokenize(&name);
            let shared: Vec<&String> = query
                .tokens
                .iter()
                .filter(|t| name_tokens.contains(t))
                .collect();
            if !shared.is_empty() {
                let points = (shared.len() as i32 * NAME_TOKEN_POINTS).min(NAME_TOKEN_CAP);
                score += points;
                let words: Vec<&str> = shared.iter().map(|s| s.as_str()).collect();
                reasons.push((points, format!("Name mentions \"{}\"", words.join(" "))));
            }
        }
    }

    if query.wants_cuisine(candidate.cuisine, candidate.category) {
        score += CUISINE_POINTS;
        reasons.push((
            CUISINE_POINTS,
            format!("Matches {} cuisine preference", candidate.cuisine),
        ));
    }

    if let Some(rating) = candidate.rating {
        let (points, label) = if rating >= 4.5 {
            (10, "High rating")
        } else if rating >= 4.0 {
            (6, "Well rated")
        } else if rating >= 3.5 {
            (3, "Solid rating")
        } else {
            (0, "")
        };
        if points > 0 {
            score += points;
            reasons.push((points, format!("{} ({}/5)", label, rating)));
        }
    }

    if let Some(reviews) = candidate.review_count {
        let points = if reviews >= 100 {
            5
        } else if reviews >= 50 {
            3
        } else {
            0
        };
        if points > 0 {
            score += points;
            reasons.push((points, format!("Popular with {} reviews", reviews)));
        }
    }

    let mut presence = 0;
    if candidate.has_phone {
        presence += 2;
    }
    if candidate.has_website {
        presence += 2;
    }
    if candidate.has_hours {
        presence += 1;
    }
    if presence > 0 {
        score += presence;
        if candidate.has_phone && candidate.has_website {
            reasons.push((presence, "Contact details available".to_string()));
        }
    }

    // Stable sort keeps the push order for equal weights.
    reasons.sort_by(|a, b| b.0.cmp(&a.0));
    let reasons = reasons
        .into_iter()
        .take(MAX_REASONS)
        .map(|(_, r)| r)
        .collect();

    (score.clamp(0, 100) as u8, reasons)
}
