use serde::Serialize;

/// What one sweep removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Entries whose TTL had passed.
    pub purged: usize,
    /// Entries older than the sweeper's max age (TTL overrides included).
    pub aged_out: usize,
    /// Entries left afterwards.
    pub remaining: usize,
}

impl SweepReport {
    pub fn removed(&self) -> usize {
        self.purged + self.aged_out
    }
}
