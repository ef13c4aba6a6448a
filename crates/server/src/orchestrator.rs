//! # Recommendation Orchestrator
//!
//! Runs the fallback chain that fills the "Recommended for you" rail:
//! 1. Collaborative: hydrate the collaborative candidate ids
//! 2. Content-based: films from the user's watchlist categories
//! 3. Hybrid: merge of both, hydrated id by id
//!
//! A stage is only attempted when every earlier stage came back empty. A
//! stage that errors is logged and counts as empty; the last stage returns
//! whatever it produced, even nothing.
//!
//! The only error surfaced to callers is `RecommendError::StoreUnavailable`,
//! returned when the store was unreachable from all three stages.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use catalog::Film;
use sources::{
    CandidateSet, CandidateStrategy, CollaborativeStrategy, ContentBasedStrategy, FilmStore,
    InteractionStore, RequestContext, StoreError, StoreResult, WatchlistStore,
};
use tracing::{debug, info, instrument, warn};

use crate::error::RecommendError;
use crate::hydrate::hydrate_best_effort;
use crate::merger::{HybridMerger, MAX_RESULTS, dedup_ids, first_error};

/// Stage of the fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Collaborative,
    ContentBased,
    Hybrid,
}

impl Stage {
    /// All stages in the order they are attempted
    pub const ALL: [Stage; 3] = [Stage::Collaborative, Stage::ContentBased, Stage::Hybrid];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Collaborative => write!(f, "collaborative"),
            Stage::ContentBased => write!(f, "content-based"),
            Stage::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Result of one orchestrator run
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    /// At most `MAX_RESULTS` films, unique by id
    pub films: Vec<Film>,
    /// Stage that produced `films` (the last stage attempted when empty)
    pub stage: Stage,
}

/// Coordinates the strategies and the hybrid merger
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    collaborative: Arc<dyn CandidateStrategy>,
    content: Arc<dyn CandidateStrategy>,
    merger: HybridMerger,
    films: Arc<dyn FilmStore>,
}

impl RecommendationOrchestrator {
    /// Build the default chain over the three stores
    pub fn new(
        interactions: Arc<dyn InteractionStore>,
        watchlist: Arc<dyn WatchlistStore>,
        films: Arc<dyn FilmStore>,
    ) -> Self {
        let collaborative: Arc<dyn CandidateStrategy> =
            Arc::new(CollaborativeStrategy::new(interactions));
        let content: Arc<dyn CandidateStrategy> =
            Arc::new(ContentBasedStrategy::new(watchlist, films.clone()));
        Self::with_strategies(collaborative, content, films)
    }

    /// Build the default chain over one store that serves all three traits
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: InteractionStore + WatchlistStore + FilmStore + 'static,
    {
        Self::new(store.clone(), store.clone(), store)
    }

    /// Build a chain from arbitrary strategies, e.g. a different
    /// collaborative model
    pub fn with_strategies(
        collaborative: Arc<dyn CandidateStrategy>,
        content: Arc<dyn CandidateStrategy>,
        films: Arc<dyn FilmStore>,
    ) -> Self {
        let merger = HybridMerger::new(collaborative.clone(), content.clone(), films.clone());
        Self {
            collaborative,
            content,
            merger,
            films,
        }
    }

    /// Main entry point: recommendations for one user
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn recommend(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> Result<Recommendations, RecommendError> {
        let start_time = Instant::now();
        let mut failures: Vec<StoreError> = Vec::new();
        let mut last_stage = Stage::Collaborative;

        for stage in Stage::ALL {
            if stage != Stage::Collaborative && ctx.is_done() {
                info!(
                    "Request for user {} out of time before {} stage, returning empty",
                    user_id, stage
                );
                return Ok(Recommendations {
                    films: Vec::new(),
                    stage: last_stage,
                });
            }
            last_stage = stage;

            match self.run_stage(stage, ctx, user_id).await {
                Ok(films) if !films.is_empty() => {
                    info!(
                        "Served {} films to user {} from {} stage in {:.2?}",
                        films.len(),
                        user_id,
                        stage,
                        start_time.elapsed()
                    );
                    return Ok(Recommendations { films, stage });
                }
                Ok(_) => debug!("{} stage empty for user {}", stage, user_id),
                Err(e) if e.is_interrupted() => {
                    info!(%stage, user_id, "Stage interrupted: {}", e);
                    failures.push(e);
                }
                Err(e) => {
                    warn!(%stage, user_id, "Stage failed, treating as empty: {}", e);
                    failures.push(e);
                }
            }
        }

        if failures.len() == Stage::ALL.len() && failures.iter().all(StoreError::is_unavailable) {
            return Err(RecommendError::StoreUnavailable(
                failures
                    .into_iter()
                    .next()
                    .map(|e| e.to_string())
                    .unwrap_or_default(),
            ));
        }

        info!(
            "No recommendations for user {} after {:.2?}",
            user_id,
            start_time.elapsed()
        );
        Ok(Recommendations {
            films: Vec::new(),
            stage: Stage::Hybrid,
        })
    }

    async fn run_stage(
        &self,
        stage: Stage,
        ctx: &RequestContext,
        user_id: &str,
    ) -> StoreResult<Vec<Film>> {
        let mut films = match stage {
            Stage::Collaborative => {
                let set = self.collaborative.candidates(ctx, user_id).await?;
                self.resolve(ctx, set).await?
            }
            Stage::ContentBased => {
                let set = self.content.candidates(ctx, user_id).await?;
                self.resolve(ctx, set).await?
            }
            Stage::Hybrid => self.merger.merge(ctx, user_id).await?,
        };
        films.truncate(MAX_RESULTS);
        Ok(films)
    }

    /// Turn a candidate set into films unique by id, hydrating bare ids
    async fn resolve(&self, ctx: &RequestContext, set: CandidateSet) -> StoreResult<Vec<Film>> {
        match set {
            CandidateSet::Films(mut films) => {
                let mut seen = HashSet::new();
                films.retain(|film| seen.insert(film.id));
                Ok(films)
            }
            CandidateSet::Ids(ids) => {
                let ids = dedup_ids(ids);
                let hydrated = hydrate_best_effort(self.films.as_ref(), ctx, &ids).await;
                if hydrated.all_unavailable() {
                    return Err(first_error(hydrated.failures));
                }
                Ok(hydrated.films)
            }
        }
    }
}
