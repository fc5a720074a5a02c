//! Small text normalisation helpers shared by the key builder, parser, validator, and cache.

use std::collections::BTreeSet;

/// Lowercases, trims, and collapses internal whitespace runs to one space.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase alphanumeric tokens (apostrophes dropped, everything else splits).
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\'', "")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokens longer than two characters; short words carry little relevance signal.
pub fn significant_tokens(text: &str) -> Vec<String> {
    tokenize(text).into_iter().filter(|t| t.chars().count() > 2).collect()
}

/// Token-set Jaccard similarity in [0, 1]. Two empty sets are identical.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let a: BTreeSet<String> = tokenize(a).into_iter().collect();
    let b: BTreeSet<String> = tokenize(b).into_iter().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let intersection = a.intersection(&b).count() as f64;
    let union = a.union(&b).count() as f64;
    intersection / union
}

/// Uppercases the first letter of every whitespace-separated word.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  Best   SUSHI\tin town "), "best sushi in town");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        assert_eq!(
            tokenize("Joe's Pizza & Pasta!"),
            vec!["joes", "pizza", "pasta"]
        );
    }

    #[test]
    fn test_significant_tokens_drop_short_words() {
        assert_eq!(significant_tokens("a bar in NYC"), vec!["bar", "nyc"]);
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard("cheap sushi", "sushi cheap"), 1.0);
        assert_eq!(jaccard("sushi", "ramen"), 0.0);
        assert!((jaccard("cheap sushi tokyo", "sushi tokyo") - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(jaccard("", ""), 1.0);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("middle EASTERN"), "Middle Eastern");
    }
}
