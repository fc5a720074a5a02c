use serde::{Deserialize, Serialize};

/// How much an issue matters. Only errors invalidate a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
    pub code: String,
}

impl ValidationIssue {
    pub fn error(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, field, code, message)
    }

    pub fn warning(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, field, code, message)
    }

    pub fn info(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, field, code, message)
    }

    fn new(severity: Severity, field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            field: field.to_string(),
            message: message.into(),
            code: code.to_string(),
        }
    }
}

/// Verdict for one restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// `true` iff no error-severity issue was recorded.
    pub is_valid: bool,
    /// Quality score clamped to 0-100.
    pub score: u8,
    /// Score before clamping.
    pub raw_score: i32,
    pub issues: Vec<ValidationIssue>,
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    pub fn errors(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Four-bucket histogram of quality scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityDistribution {
    /// Score >= 90.
    pub excellent: usize,
    /// 70 <= score < 90.
    pub good: usize,
    /// 50 <= score < 70.
    pub fair: usize,
    /// Score < 50.
    pub poor: usize,
}

impl QualityDistribution {
    pub fn record(&mut self, score: u8) {
        match score {
            90.. => self.excellent += 1,
            70..=89 => self.good += 1,
            50..=69 => self.fair += 1,
            _ => self.poor += 1,
        }
    }
}

/// List-level statistics, reported as `validationStats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub mean_score: f64,
    pub distribution: QualityDistribution,
}
