use std::sync::Arc;
use std::time::Duration;

use crate::cache::ResponseCache;
use crate::orchestrator::RecommendationOrchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<RecommendationOrchestrator>,
    /// Deadline given to each request's `RequestContext`
    pub request_timeout: Duration,
    pub cache: Option<CacheConfig>,
}

/// Injected response cache and the TTL used for new entries
#[derive(Clone)]
pub struct CacheConfig {
    pub store: Arc<dyn ResponseCache>,
    pub ttl: Duration,
}

impl AppState {
    pub fn new(orchestrator: RecommendationOrchestrator, request_timeout: Duration) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            request_timeout,
            cache: None,
        }
    }

    pub fn with_cache(mut self, store: Arc<dyn ResponseCache>, ttl: Duration) -> Self {
        self.cache = Some(CacheConfig { store, ttl });
        self
    }
}
