//! Error classifier and fallback orchestrator.
//!
//! After every failed provider attempt the pipeline asks [`FallbackOrchestrator::assess`]
//! what to do. The orchestrator classifies the failure ([`classify`]), records it against
//! the request's origin bucket in the [`ErrorRateLimiter`], and returns a [`Decision`]:
//! retry, an ordered chain of [`FallbackStrategy`]s, or fail.

pub mod classify;
pub mod limiter;
pub mod strategy;
pub mod synth;


pub use classify::{ErrorKind, classify, classify_message};
pub use limiter::ErrorRateLimiter;
pub use strategy::{
    Decision, DecisionInput, ErrorContext, FallbackStrategy, SearchError, decide,
};
pub use synth::{FallbackGenerator, QualityTier};

use tracing::warn;

use crate::context::SearchContext;
use crate::parser::{RawCandidateRecord, Restaurant};
use crate::provider::ProviderError;

/// The classified error plus what to do next.
#[derive(Debug, Clone)]
pub struct FailureAssessment {
    pub error: SearchError,
    pub decision: Decision,
    /// Errors recorded for the origin bucket inside the limiter window, this one included.
    pub bucket_errors: usize,
}

/// Decides between retry, fallback and failure, and synthesizes fallback data.
#[derive(Debug)]
pub struct FallbackOrchestrator {
    limiter: ErrorRateLimiter,
    generator: FallbackGenerator,
    max_attempts: u32,
    fallback_enabled: bool,
    tier: QualityTier,
}

impl FallbackOrchestrator {
    pub fn new(
        limiter: ErrorRateLimiter,
        generator: FallbackGenerator,
        max_attempts: u32,
        fallback_enabled: bool,
        tier: QualityTier,
    ) -> Self {
        Self {
            limiter,
            generator,
            max_attempts: max_attempts.max(1),
            fallback_enabled,
            tier,
        }
    }

    /// Classifies a failed attempt (1-based `attempt`) and decides the next step.
    pub fn assess(
        &self,
        error: &ProviderError,
        context: &SearchContext,
        attempt: u32,
        simplified_tried: bool,
    ) -> FailureAssessment {
        let bucket = context.origin_bucket();
        let bucket_errors = self.limiter.record(&bucket);
        let rate_limited = bucket_errors >= self.limiter.limit();

        let error = SearchError::from_provider(
            error,
            ErrorContext {
                query: context.query().to_string(),
                location: context.location().display_name(),
                attempt,
            },
            self.fallback_enabled,
        );

        let decision = decide(
            error.kind,
            DecisionInput {
                attempt,
                max_attempts: self.max_attempts,
                rate_limited,
                fallback_enabled: self.fallback_enabled,
                simplified_tried,
            },
        );

        warn!(
            kind = %error.kind,
            attempt,
            bucket = %bucket,
            bucket_errors,
            rate_limited,
            decision = ?decision,
            message = %error.message,
            "Provider call failed"
        );

        FailureAssessment {
            error,
            decision,
            bucket_errors,
        }
    }

    /// Raw fallback records for `context`.
    pub fn synthesize(&self, context: &SearchContext) -> Vec<RawCandidateRecord> {
        self.generator.records(context, self.tier)
    }

    /// Places parsed fallback restaurants into the tier's score band.
    pub fn apply_band(&self, context: &SearchContext, restaurants: &mut [Restaurant]) {
        self.generator.apply_band(context, self.tier, restaurants);
    }

    pub fn limiter(&self) -> &ErrorRateLimiter {
        &self.limiter
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn fallback_enabled(&self) -> bool {
        self.fallback_enabled
    }
}
