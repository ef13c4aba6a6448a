//! Content-Based Source - Watchlist Category Overlap
//!
//! Recommends the highest-ranked films in the categories the user has
//! saved to their watchlist.
//!
//! ## Algorithm
//! 1. Fetch the user's watchlist film ids `W`
//! 2. `W` empty: return the global top films by rank (cold start)
//! 3. Derive the distinct category set `C` of the films in `W`
//! 4. `C` empty (films missing a category): same top-by-rank fallback
//! 5. Otherwise: films whose category is in `C`, rank descending, capped
//!
//! Unlike the collaborative source this one returns full film rows, so no
//! separate hydration step is needed.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use catalog::{Category, Film};
use tracing::{debug, instrument};

use crate::context::RequestContext;
use crate::error::StoreResult;
use crate::store::{FilmStore, WatchlistStore};
use crate::traits::CandidateStrategy;
use crate::types::{CandidateSet, CandidateSource};

/// Default cap on returned films
pub const DEFAULT_CONTENT_LIMIT: usize = 10;

/// Content-based strategy over a watchlist store and a film store
#[derive(Clone)]
pub struct ContentBasedStrategy {
    watchlist: Arc<dyn WatchlistStore>,
    films: Arc<dyn FilmStore>,

    /// Maximum number of films returned
    limit: usize,
}

impl ContentBasedStrategy {
    pub fn new(watchlist: Arc<dyn WatchlistStore>, films: Arc<dyn FilmStore>) -> Self {
        Self {
            watchlist,
            films,
            limit: DEFAULT_CONTENT_LIMIT,
        }
    }

    /// Configure the film cap (default: 10)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Candidate films for a user, rank descending
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn recommend(&self, ctx: &RequestContext, user_id: &str) -> StoreResult<Vec<Film>> {
        let watchlist = ctx.run(self.watchlist.film_ids(ctx, user_id)).await?;

        if watchlist.is_empty() {
            debug!("Empty watchlist for user {}, using top ranked", user_id);
            return self.top_ranked(ctx).await;
        }

        let categories = ctx.run(self.films.categories_of(ctx, &watchlist)).await?;
        let categories = distinct_categories(categories);

        if categories.is_empty() {
            debug!(
                "Watchlist of user {} has no categorised films, using top ranked",
                user_id
            );
            return self.top_ranked(ctx).await;
        }
        debug!("User {} watchlist categories: {:?}", user_id, categories);

        let mut films = ctx
            .run(self.films.by_category(ctx, &categories, self.limit))
            .await?;
        films.truncate(self.limit);

        debug!("Generated {} content-based candidates", films.len());
        Ok(films)
    }

    async fn top_ranked(&self, ctx: &RequestContext) -> StoreResult<Vec<Film>> {
        let mut films = ctx.run(self.films.top_ranked(ctx, self.limit)).await?;
        films.truncate(self.limit);
        Ok(films)
    }
}

/// Drop blanks and repeats, keeping first-seen order
fn distinct_categories(categories: Vec<Category>) -> Vec<Category> {
    let mut seen = HashSet::new();
    categories
        .into_iter()
        .filter(|c| !c.trim().is_empty())
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

#[async_trait]
impl CandidateStrategy for ContentBasedStrategy {
    fn name(&self) -> &str {
        "ContentBasedStrategy"
    }

    fn source(&self) -> CandidateSource {
        CandidateSource::ContentBased
    }

    async fn candidates(&self, ctx: &RequestContext, user_id: &str) -> StoreResult<CandidateSet> {
        self.recommend(ctx, user_id).await.map(CandidateSet::Films)
    }
}
