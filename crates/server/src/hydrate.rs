//! Best-effort hydration of film ids into full `Film` records.
//!
//! Each id is looked up on its own; a failed lookup drops that id and is
//! reported in `Hydrated::failures`, the rest of the batch proceeds.

use catalog::{Film, FilmId};
use futures_util::stream::{self, StreamExt};
use sources::{FilmStore, RequestContext, StoreError};
use tracing::warn;

/// Upper bound on concurrent `get_by_id` lookups for one request
pub const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Outcome of hydrating a batch of ids
#[derive(Debug, Default)]
pub struct Hydrated {
    /// Successfully hydrated films, in input order
    pub films: Vec<Film>,
    /// Ids whose lookup failed, with the error
    pub failures: Vec<(FilmId, StoreError)>,
}

impl Hydrated {
    /// True when there was at least one lookup and every one of them failed
    /// because the store was unreachable
    pub fn all_unavailable(&self) -> bool {
        self.films.is_empty()
            && !self.failures.is_empty()
            && self.failures.iter().all(|(_, e)| e.is_unavailable())
    }
}

/// Look up every id concurrently, keeping the successes in input order
pub async fn hydrate_best_effort(
    store: &dyn FilmStore,
    ctx: &RequestContext,
    ids: &[FilmId],
) -> Hydrated {
    let outcomes: Vec<(FilmId, Result<Film, StoreError>)> = stream::iter(ids.iter().copied())
        .map(|id| async move { (id, ctx.run(store.get_by_id(ctx, id)).await) })
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .collect()
        .await;

    let mut hydrated = Hydrated::default();
    for (id, outcome) in outcomes {
        match outcome {
            Ok(film) => hydrated.films.push(film),
            Err(e) => {
                warn!(request_id = %ctx.request_id, film_id = id, "Hydration failed: {}", e);
                hydrated.failures.push((id, e));
            }
        }
    }
    hydrated
}
