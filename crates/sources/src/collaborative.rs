//! Collaborative Source - Interaction Co-occurrence
//!
//! Derives candidate film ids from the user's own interaction history.
//!
//! ## Algorithm
//! 1. Fetch the set `S` of films the user interacted with
//! 2. If `S` is empty (cold start) return no candidates
//! 3. Query interaction records whose film is in `S`
//! 4. Collect the distinct film ids those records reference, capped
//!
//! This is a correlation heuristic, not user-to-user similarity. Because
//! the records are selected by film, every id it returns is one the user
//! already touched. Downstream code relies on that exact output, so keep
//! it as is; a true similarity model belongs in a separate
//! `CandidateStrategy`.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use catalog::FilmId;
use tracing::{debug, instrument};

use crate::context::RequestContext;
use crate::error::StoreResult;
use crate::store::InteractionStore;
use crate::traits::CandidateStrategy;
use crate::types::{CandidateSet, CandidateSource};

/// Default cap on candidate ids
pub const DEFAULT_COLLABORATIVE_LIMIT: usize = 10;

/// Collaborative strategy over an interaction store
#[derive(Clone)]
pub struct CollaborativeStrategy {
    interactions: Arc<dyn InteractionStore>,

    /// Maximum number of distinct ids returned
    limit: usize,
}

impl CollaborativeStrategy {
    pub fn new(interactions: Arc<dyn InteractionStore>) -> Self {
        Self {
            interactions,
            limit: DEFAULT_COLLABORATIVE_LIMIT,
        }
    }

    /// Configure the candidate cap (default: 10)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Candidate film ids for a user; empty on cold start
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn recommend(&self, ctx: &RequestContext, user_id: &str) -> StoreResult<Vec<FilmId>> {
        let interacted = ctx
            .run(self.interactions.film_ids_interacted_with(ctx, user_id))
            .await?;

        if interacted.is_empty() {
            debug!("No interactions for user {}, cold start", user_id);
            return Ok(Vec::new());
        }
        debug!("User {} interacted with {} films", user_id, interacted.len());

        let co_occurring = ctx
            .run(
                self.interactions
                    .film_ids_co_occurring(ctx, &interacted, self.limit),
            )
            .await?;

        // Distinct and capped regardless of what the store hands back
        let mut seen = HashSet::new();
        let candidates: Vec<FilmId> = co_occurring
            .into_iter()
            .filter(|id| seen.insert(*id))
            .take(self.limit)
            .collect();

        debug!("Generated {} collaborative candidates", candidates.len());
        Ok(candidates)
    }
}

#[async_trait]
impl CandidateStrategy for CollaborativeStrategy {
    fn name(&self) -> &str {
        "CollaborativeStrategy"
    }

    fn source(&self) -> CandidateSource {
        CandidateSource::Collaborative
    }

    async fn candidates(&self, ctx: &RequestContext, user_id: &str) -> StoreResult<CandidateSet> {
        self.recommend(ctx, user_id).await.map(CandidateSet::Ids)
    }
}
