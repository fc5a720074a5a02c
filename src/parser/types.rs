use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geo::Coordinates;

/// Untrusted record as returned by the provider. No field is guaranteed present or well typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCandidateRecord(Value);

impl RawCandidateRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// First present, non-null value among `keys`.
    pub fn field(&self, keys: &[&str]) -> Option<&Value> {
        let map = self.0.as_object()?;
        keys.iter()
            .filter_map(|k| map.get(*k))
            .find(|v| !v.is_null())
    }

    /// Trimmed, non-empty string value. Numbers are stringified.
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        let value = self.field(keys)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// A list of strings from an array or a comma-separated string.
    pub fn list(&self, keys: &[&str]) -> Option<Vec<String>> {
        let items: Vec<String> = match self.field(keys)? {
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Value::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => return None,
        };
        (!items.is_empty()).then_some(items)
    }
}

impl From<Value> for RawCandidateRecord {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Where a canonical record's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Provider,
    Fallback,
}

/// A non-fatal problem the parser noticed while accepting a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ParseWarning {
    pub fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// How much of a record was filled in by the parser rather than supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub source: DataSource,
    /// Field names (camelCase) whose values were synthesized.
    pub synthesized: Vec<String>,
    /// `false` when the cuisine was passed through without matching a known category.
    pub cuisine_normalized: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}

impl Provenance {
    pub fn is_synthesized(&self, field: &str) -> bool {
        self.synthesized.iter().any(|f| f == field)
    }

    pub(crate) fn mark(&mut self, field: &str) {
        self.synthesized.push(field.to_string());
    }
}

/// Canonical, schema-complete restaurant.
///
/// Every optional field is filled in by the parser except `phone` and `website`, which
/// stay `None` unless the provider supplied a plausible value; contact details are never
/// invented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub description: String,
    pub price_level: u8,
    pub rating: f64,
    pub review_count: u64,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    pub specialties: Vec<String>,
    pub dietary_options: Vec<String>,
    pub ambiance: String,
    pub best_for: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_time: Option<String>,
    pub distance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub match_score: u8,
    pub match_reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Validator quality score, set once the record has been validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<u8>,
    pub provenance: Provenance,
}

/// One reason a record was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectReason {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl RejectReason {
    pub fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// A candidate the parser refused, with every rule it broke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidRecord {
    /// Position in the provider's response.
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub reasons: Vec<RejectReason>,
}

impl InvalidRecord {
    pub fn has_code(&self, code: &str) -> bool {
        self.reasons.iter().any(|r| r.code == code)
    }
}

/// Parse counters, reported as `qualityStats` in search metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseStats {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub synthesized_fields: usize,
    pub warnings: usize,
}

/// Partitioned parser output.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub valid: Vec<Restaurant>,
    pub invalid: Vec<InvalidRecord>,
    pub stats: ParseStats,
}
