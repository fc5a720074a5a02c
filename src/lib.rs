//! Dinescout library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! The crate turns untrusted restaurant records from an external knowledge-search
//! provider into validated, ranked, cached search results, degrading to clearly tagged
//! fallback data when the provider misbehaves.
//!
//! ## Pipeline
//! - [`SearchPipeline`], [`PipelineConfig`] - Per-request orchestration
//! - [`SearchRequest`], [`SearchContext`] - Request normalisation and cache keys
//! - [`SearchResponse`], [`SearchFailure`] - Outcomes
//!
//! ## Stages
//! - [`SearchCache`], [`FallbackLane`] - LRU + TTL result cache and fallback lane
//! - [`ResultParser`], [`Restaurant`] - Record acceptance and field synthesis
//! - [`QualityValidator`] - Quality scoring
//! - [`FallbackOrchestrator`], [`ErrorKind`] - Failure classification and fallback
//!
//! ## Integration
//! - [`SearchProvider`] - Provider seam, with [`HttpSearchProvider`] and
//!   [`MockSearchProvider`]
//! - [`Config`] - Environment configuration
//! - [`CacheSweeper`] - Background cache maintenance

pub mod cache;
pub mod config;
pub mod constants;
pub mod context;
pub mod fallback;
pub mod gateway;
pub mod geo;
pub mod hashing;
pub mod lifecycle;
pub mod parser;
pub mod pipeline;
pub mod provider;
pub mod text;
pub mod validator;

pub use cache::{
    CacheEntry, CacheMetadata, CacheStats, DINESCOUT_STATUS_HEADER, DINESCOUT_STATUS_READY,
    FallbackLane, SearchCache, SearchStatus,
};
pub use config::{Config, ConfigError};
pub use context::{ContextError, LocationData, SearchContext, SearchRequest};
pub use fallback::{
    ErrorKind, FallbackOrchestrator, FallbackStrategy, QualityTier, SearchError, classify,
};
pub use geo::Coordinates;
pub use lifecycle::{CacheSweeper, SweepReport};
pub use parser::{
    CuisineCategory, CuisineMode, ParseOutcome, RawCandidateRecord, Restaurant, ResultParser,
    normalize_cuisine,
};
pub use pipeline::{
    FailureBody, PipelineConfig, PipelineError, ResultSet, SearchFailure, SearchPipeline,
    SearchResponse,
};
pub use provider::{
    HttpSearchProvider, LocationHint, MockSearchProvider, ProviderError, SearchProvider,
};
pub use validator::{QualityValidator, ValidationResult, ValidationStats};
