//! Hybrid Merger - Union of Both Candidate Sources
//!
//! ## Algorithm
//! 1. Run the collaborative and content-based strategies concurrently
//! 2. Collaborative ids first, then content-based ids, first occurrence wins
//! 3. Truncate to `MAX_RESULTS` ids
//! 4. Hydrate each id with `FilmStore::get_by_id`, skipping failed lookups
//!
//! A failing strategy contributes nothing; the merge only fails when both
//! strategies fail, or when every lookup hit an unreachable store.

use std::collections::HashSet;
use std::sync::Arc;

use catalog::{Film, FilmId};
use sources::{CandidateStrategy, FilmStore, RequestContext, StoreError, StoreResult};
use tracing::{debug, instrument, warn};

use crate::hydrate::hydrate_best_effort;

/// Maximum number of films in any recommendation list
pub const MAX_RESULTS: usize = 8;

/// Merges two candidate strategies into one deduplicated, hydrated list
#[derive(Clone)]
pub struct HybridMerger {
    collaborative: Arc<dyn CandidateStrategy>,
    content: Arc<dyn CandidateStrategy>,
    films: Arc<dyn FilmStore>,
}

impl HybridMerger {
    pub fn new(
        collaborative: Arc<dyn CandidateStrategy>,
        content: Arc<dyn CandidateStrategy>,
        films: Arc<dyn FilmStore>,
    ) -> Self {
        Self {
            collaborative,
            content,
            films,
        }
    }

    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn merge(&self, ctx: &RequestContext, user_id: &str) -> StoreResult<Vec<Film>> {
        let (collaborative, content) = tokio::join!(
            self.collaborative.candidates(ctx, user_id),
            self.content.candidates(ctx, user_id),
        );

        let (collaborative_ids, content_ids) = match (collaborative, content) {
            (Err(a), Err(b)) => return Err(if a.is_unavailable() { b } else { a }),
            (collaborative, content) => (
                self.ids_or_empty(collaborative, self.collaborative.name(), user_id),
                self.ids_or_empty(content, self.content.name(), user_id),
            ),
        };

        let mut ids = dedup_ids(collaborative_ids.into_iter().chain(content_ids));
        ids.truncate(MAX_RESULTS);
        debug!("Hybrid merge of {} distinct ids for user {}", ids.len(), user_id);

        let hydrated = hydrate_best_effort(self.films.as_ref(), ctx, &ids).await;
        if hydrated.all_unavailable() {
            return Err(first_error(hydrated.failures));
        }
        Ok(hydrated.films)
    }

    fn ids_or_empty(
        &self,
        result: StoreResult<sources::CandidateSet>,
        strategy: &str,
        user_id: &str,
    ) -> Vec<FilmId> {
        match result {
            Ok(set) => set.ids(),
            Err(e) => {
                warn!(strategy, user_id, "Strategy failed during hybrid merge: {}", e);
                Vec::new()
            }
        }
    }
}

/// Remove repeated ids, keeping the first occurrence of each
pub fn dedup_ids(ids: impl IntoIterator<Item = FilmId>) -> Vec<FilmId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

pub(crate) fn first_error(failures: Vec<(FilmId, StoreError)>) -> StoreError {
    failures
        .into_iter()
        .next()
        .map(|(_, e)| e)
        .unwrap_or_else(|| StoreError::Unavailable("no lookups attempted".to_string()))
}
