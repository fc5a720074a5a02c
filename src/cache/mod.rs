//! Search cache (LRU + TTL) and the fallback lane.

pub mod lane;
pub mod search;
pub mod types;


pub use lane::FallbackLane;
pub use search::SearchCache;
pub use types::{
    CacheEntry, CacheMetadata, CacheStats, DINESCOUT_STATUS_HEADER, DINESCOUT_STATUS_HEALTHY,
    DINESCOUT_STATUS_NOT_READY, DINESCOUT_STATUS_READY, SearchStatus, SimilarEntry,
};
