//! # Server Crate
//!
//! Serves the "Recommended for you" rail.
//!
//! ## Components
//!
//! ### Orchestrator
//! `RecommendationOrchestrator` runs the collaborative, content-based and
//! hybrid stages in order and stops at the first one that yields films.
//!
//! ### Hybrid Merger
//! `HybridMerger` unions both strategies, deduplicates, caps at
//! `MAX_RESULTS` and hydrates each id on its own.
//!
//! ### HTTP
//! axum router exposing `GET /recommendations?userId=` and `GET /health`,
//! with an optional injected `ResponseCache`.
//!
//! ## Example Usage
//!
//! ```ignore
//! use server::{Config, app_state, http};
//!
//! let config = Config::from_env()?;
//! let index = Arc::new(CatalogIndex::load_from_files(&config.data_dir)?);
//! http::serve(config.bind_addr()?, app_state(index, &config)).await?;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod hydrate;
pub mod merger;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use catalog::CatalogIndex;
use sources::CatalogStore;

pub use cache::{MemoryCache, ResponseCache};
pub use config::Config;
pub use error::RecommendError;
pub use hydrate::{Hydrated, hydrate_best_effort};
pub use merger::{HybridMerger, MAX_RESULTS, dedup_ids};
pub use orchestrator::{RecommendationOrchestrator, Recommendations, Stage};

/// Wire the catalog-backed orchestrator and, unless disabled, the memory
/// cache into HTTP state
pub fn app_state(index: Arc<CatalogIndex>, config: &Config) -> http::AppState {
    let store = Arc::new(CatalogStore::new(index));
    let state = http::AppState::new(
        RecommendationOrchestrator::from_store(store),
        config.request_timeout(),
    );

    match config.cache_ttl() {
        Some(ttl) => state.with_cache(Arc::new(MemoryCache::new()), ttl),
        None => state,
    }
}
