//! Search orchestrator.
//!
//! One [`SearchPipeline::search`] call runs the whole per-request flow:
//!
//! ```text
//! context -> cache.get -> provider (timeout) -> parse -> validate -> filter -> cache.set -> respond
//!                              |
//!                              +-> assess: retry (fixed backoff) | fallback chain | fail
//! ```
//!
//! Fallback results are tagged `usedFallback` with a degraded confidence and are never
//! written to the primary cache; synthesized sets go to the short-TTL [`FallbackLane`].
//! Dropping the returned future cancels the provider call or backoff sleep in flight,
//! and the cache is only written after a complete parse and validation.

pub mod error;
pub mod types;


pub use error::{PipelineError, SearchFailure};
pub use types::{FailureBody, PipelineConfig, ResultSet, SearchMetadata, SearchResponse};

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::cache::{CacheMetadata, FallbackLane, SearchCache, SearchStatus};
use crate::constants::{
    FALLBACK_CONFIDENCE, FALLBACK_LANE_CAPACITY, MAX_LIVE_CONFIDENCE,
    SIMPLIFIED_QUERY_CONFIDENCE, STALE_CACHE_CONFIDENCE, STALE_MATCH_MIN_SIMILARITY,
};
use crate::context::{SearchContext, SearchRequest};
use crate::hashing::key_digest;
use crate::fallback::{
    Decision, ErrorRateLimiter, FallbackGenerator, FallbackOrchestrator, FallbackStrategy,
    SearchError,
};
use crate::parser::{DataSource, RawCandidateRecord, Restaurant, ResultParser};
use crate::provider::{ProviderError, SearchProvider};
use crate::validator::QualityValidator;

/// Status attached to a provider answer that contained nothing usable.
const NO_USABLE_RESULTS_STATUS: u16 = 422;

/// Per-request search control flow over a shared cache.
pub struct SearchPipeline {
    provider: Arc<dyn SearchProvider>,
    cache: Arc<SearchCache<ResultSet>>,
    lane: FallbackLane<ResultSet>,
    fallback: FallbackOrchestrator,
    config: PipelineConfig,
}

impl SearchPipeline {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        cache: Arc<SearchCache<ResultSet>>,
        config: PipelineConfig,
    ) -> Self {
        let limiter = ErrorRateLimiter::new(config.error_rate_limit, config.error_rate_window);
        let fallback = FallbackOrchestrator::new(
            limiter,
            FallbackGenerator::new(config.fallback_seed),
            config.max_attempts,
            config.fallback_enabled,
            config.fallback_tier,
        );
        Self {
            provider,
            cache,
            lane: FallbackLane::new(FALLBACK_LANE_CAPACITY, config.fallback_lane_ttl),
            fallback,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<SearchCache<ResultSet>> {
        &self.cache
    }

    pub fn lane(&self) -> &FallbackLane<ResultSet> {
        &self.lane
    }

    pub fn fallback(&self) -> &FallbackOrchestrator {
        &self.fallback
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Answers one search request.
    ///
    /// Returns `Err` only for a request that cannot form a context, or when every
    /// attempt failed and no fallback applies.
    #[instrument(skip(self, request), fields(key_digest = tracing::field::Empty))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, PipelineError> {
        let context = SearchContext::from_request(request, self.config.max_results)?;
        tracing::Span::current().record("key_digest", key_digest(context.cache_key()).as_str());

        if let Some(hit) = self.cache.get(context.cache_key()) {
            info!(results = hit.restaurants.len(), "Search cache hit");
            return Ok(self.respond(request, &context, &hit, SearchStatus::Hit, 0));
        }

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let failure = match self.fetch(&context).await {
                Ok(set) => {
                    self.store(&context, &set);
                    info!(
                        attempt,
                        results = set.restaurants.len(),
                        confidence = set.confidence,
                        "Search served from provider"
                    );
                    return Ok(self.respond(request, &context, &set, SearchStatus::Miss, attempt));
                }
                Err(failure) => failure,
            };

            let assessment = self.fallback.assess(&failure, &context, attempt, false);
            match assessment.decision {
                Decision::Retry => {
                    debug!(
                        attempt,
                        backoff_ms = self.config.retry_backoff.as_millis() as u64,
                        "Retrying provider call"
                    );
                    tokio::time::sleep(self.config.retry_backoff).await;
                }
                Decision::Fallback(chain) => {
                    return self
                        .run_fallback(request, &context, &chain, assessment.error, attempt)
                        .await;
                }
                Decision::Fail => return Err(SearchFailure::new(assessment.error).into()),
            }
        }
    }

    /// One provider attempt through parse, validate and filter.
    async fn fetch(&self, context: &SearchContext) -> Result<ResultSet, ProviderError> {
        let records = self.call_provider(context).await?;
        let mut set = self.evaluate(
            context,
            &records,
            DataSource::Provider,
            self.config.acceptance_threshold,
        );

        if set.restaurants.is_empty() {
            return Err(ProviderError::with_status(
                NO_USABLE_RESULTS_STATUS,
                format!(
                    "no usable restaurants in provider response ({} records, {} rejected by the parser)",
                    set.quality_stats.total, set.quality_stats.rejected
                ),
            ));
        }

        set.confidence = live_confidence(&set.restaurants);
        Ok(set)
    }

    #[instrument(skip(self, context), fields(provider = %self.provider.name()))]
    async fn call_provider(
        &self,
        context: &SearchContext,
    ) -> Result<Vec<RawCandidateRecord>, ProviderError> {
        let query = context.provider_query();
        let hint = context.location_hint();
        let budget = self.config.provider_timeout;

        match tokio::time::timeout(budget, self.provider.search(&query, &hint)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout(budget)),
        }
    }

    /// Parses, validates and ranks `records`, keeping those valid and scoring at least
    /// `threshold`. Confidence and fallback tagging are left to the caller.
    fn evaluate(
        &self,
        context: &SearchContext,
        records: &[RawCandidateRecord],
        source: DataSource,
        threshold: u8,
    ) -> ResultSet {
        let outcome = ResultParser::for_context(context, self.config.cuisine_mode)
            .with_source(source)
            .parse(records);
        for invalid in &outcome.invalid {
            let codes: Vec<&str> = invalid.reasons.iter().map(|r| r.code.as_str()).collect();
            debug!(index = invalid.index, name = ?invalid.name, codes = ?codes, "Rejected candidate");
        }

        let mut valid = outcome.valid;
        if source == DataSource::Fallback {
            self.fallback.apply_band(context, &mut valid);
        }

        let report = QualityValidator::for_context(context).validate_batch(&valid);
        let mut accepted: Vec<Restaurant> = valid
            .into_iter()
            .zip(report.results)
            .filter_map(|(mut restaurant, verdict)| {
                if verdict.is_valid && verdict.score >= threshold {
                    restaurant.quality_score = Some(verdict.score);
                    Some(restaurant)
                } else {
                    debug!(
                        name = %restaurant.name,
                        score = verdict.score,
                        errors = verdict.errors(),
                        "Filtered below quality threshold"
                    );
                    None
                }
            })
            .collect();

        accepted.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then_with(|| b.quality_score.cmp(&a.quality_score))
                .then_with(|| a.name.cmp(&b.name))
        });

        ResultSet {
            restaurants: accepted,
            confidence: 0.0,
            quality_stats: outcome.stats,
            validation_stats: report.stats,
            fallback_strategy: None,
            message: String::new(),
        }
    }

    fn store(&self, context: &SearchContext, set: &ResultSet) {
        let metadata = CacheMetadata {
            query: search_terms(context),
            city: context.city(),
            origin: context.origin(),
            radius_miles: context.radius_miles(),
        };
        self.cache
            .set(context.cache_key().to_string(), set.clone(), metadata);
    }

    async fn run_fallback(
        &self,
        request: &SearchRequest,
        context: &SearchContext,
        chain: &[FallbackStrategy],
        error: SearchError,
        attempts: u32,
    ) -> Result<SearchResponse, PipelineError> {
        for &strategy in chain {
            let set = match strategy {
                FallbackStrategy::StaleCache => self.stale_cache(context, &error),
                FallbackStrategy::SimplifiedQuery => self.simplified_query(context, &error).await,
                FallbackStrategy::Mock => self.synthesized(context, &error),
            };

            match set {
                Some(set) => {
                    info!(
                        strategy = %strategy,
                        results = set.restaurants.len(),
                        confidence = set.confidence,
                        "Serving fallback results"
                    );
                    return Ok(self.respond(request, context, &set, SearchStatus::Fallback, attempts));
                }
                None => debug!(strategy = %strategy, "Fallback strategy produced nothing"),
            }
        }

        warn!(kind = %error.kind, "Every fallback strategy came up empty");
        Err(SearchFailure::new(error).into())
    }

    /// A cached set for a similar query near the same place, expired entries included.
    fn stale_cache(&self, context: &SearchContext, error: &SearchError) -> Option<ResultSet> {
        let entry = self
            .cache
            .find_similar(&search_terms(context), STALE_MATCH_MIN_SIMILARITY)
            .into_iter()
            .find(|entry| is_nearby(context, &entry.metadata))?;

        debug!(
            key_digest = %key_digest(&entry.key),
            similarity = entry.similarity,
            stale = entry.stale,
            "Reusing cached results"
        );

        let mut set = (*entry.payload).clone();
        set.confidence = STALE_CACHE_CONFIDENCE;
        set.fallback_strategy = Some(FallbackStrategy::StaleCache);
        set.message = format!(
            "{} Showing recent results for \"{}\".",
            error.kind.user_message(),
            entry.metadata.query
        );
        Some(set)
    }

    /// One more provider call with a shorter, filter-free query.
    async fn simplified_query(
        &self,
        context: &SearchContext,
        error: &SearchError,
    ) -> Option<ResultSet> {
        let simplified = context.simplified()?;

        match self.fetch(&simplified).await {
            Ok(live) => {
                self.store(&simplified, &live);
                let mut set = live;
                set.confidence = set.confidence.min(SIMPLIFIED_QUERY_CONFIDENCE);
                set.fallback_strategy = Some(FallbackStrategy::SimplifiedQuery);
                set.message = format!(
                    "{} Showing results for the broader search \"{}\".",
                    error.kind.user_message(),
                    simplified.provider_query()
                );
                Some(set)
            }
            Err(failure) => {
                warn!(error = %failure, query = %simplified.query(), "Simplified query failed");
                None
            }
        }
    }

    /// Synthesized sample restaurants, reused from the fallback lane when present.
    fn synthesized(&self, context: &SearchContext, error: &SearchError) -> Option<ResultSet> {
        if let Some(set) = self.lane.get(context.cache_key()) {
            debug!("Fallback lane hit");
            return Some((*set).clone());
        }

        let records = self.fallback.synthesize(context);
        let mut set = self.evaluate(
            context,
            &records,
            DataSource::Fallback,
            self.config.fallback_threshold,
        );
        if set.restaurants.is_empty() {
            return None;
        }

        set.confidence = FALLBACK_CONFIDENCE;
        set.fallback_strategy = Some(FallbackStrategy::Mock);
        set.message = format!(
            "{} Showing sample restaurants; details may not be accurate.",
            error.kind.user_message()
        );
        self.lane.insert(context.cache_key(), set.clone());
        Some(set)
    }

    fn respond(
        &self,
        request: &SearchRequest,
        context: &SearchContext,
        set: &ResultSet,
        status: SearchStatus,
        attempts: u32,
    ) -> SearchResponse {
        let restaurants: Vec<Restaurant> = set
            .restaurants
            .iter()
            .take(context.max_results())
            .cloned()
            .collect();

        let found = set.restaurants.len();
        let message = match status {
            _ if set.used_fallback() => set.message.clone(),
            SearchStatus::Hit => format!("Found {} restaurants (from recent results)", found),
            _ if attempts > 1 => format!("Found {} restaurants after {} attempts", found, attempts),
            _ => format!("Found {} restaurants", found),
        };

        SearchResponse {
            total_results: restaurants.len(),
            search_metadata: SearchMetadata {
                request_id: Uuid::new_v4().to_string(),
                query: context.query().to_string(),
                location: context.location().display_name(),
                total_found: found,
                search_timestamp: Utc::now(),
                confidence: set.confidence,
                used_fallback: set.used_fallback(),
                fallback_strategy: set.fallback_strategy,
                message,
                quality_stats: set.quality_stats,
                validation_stats: set.validation_stats,
            },
            restaurants,
            search_params: request.clone(),
            cached: status.is_hit(),
            status,
        }
    }
}

impl std::fmt::Debug for SearchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPipeline")
            .field("provider", &self.provider.name())
            .field("cache", &self.cache)
            .field("lane", &self.lane)
            .field("config", &self.config)
            .finish()
    }
}

/// The text similarity is measured on: the query, or the cuisine filter without one.
fn search_terms(context: &SearchContext) -> String {
    if context.normalized_query().is_empty() {
        context.cuisine().unwrap_or_default().to_string()
    } else {
        context.normalized_query().to_string()
    }
}

fn is_nearby(context: &SearchContext, metadata: &CacheMetadata) -> bool {
    match (context.origin(), metadata.origin) {
        (Some(here), Some(there)) => here.distance_miles(&there) <= context.radius_miles(),
        _ => context.city().is_some() && context.city() == metadata.city,
    }
}

/// Mean quality over 100, capped below certainty and rounded to two places.
fn live_confidence(restaurants: &[Restaurant]) -> f64 {
    if restaurants.is_empty() {
        return 0.0;
    }
    let sum: f64 = restaurants
        .iter()
        .map(|r| f64::from(r.quality_score.unwrap_or(0)))
        .sum();
    let mean = sum / restaurants.len() as f64 / 100.0;
    (mean.min(MAX_LIVE_CONFIDENCE) * 100.0).round() / 100.0
}
