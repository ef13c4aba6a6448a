//! Test fixtures and a scriptable mock store.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use catalog::{CatalogIndex, Category, Film, FilmId, InteractionRecord, WatchlistEntry};
use sources::{
    CatalogStore, FilmStore, InteractionStore, RequestContext, StoreError, StoreResult,
    WatchlistStore,
};

pub fn ctx() -> RequestContext {
    RequestContext::new(Duration::from_secs(5))
}

pub fn film(id: FilmId, category: &str, rank: i32) -> Film {
    Film {
        id,
        title: format!("Film {}", id),
        overview: format!("Overview of film {}", id),
        release_year: 2015,
        duration_minutes: 100,
        age_rating: 15,
        category: category.to_string(),
        image_url: format!("https://img.example/{}.jpg", id),
        trailer_url: format!("https://video.example/{}.mp4", id),
        rank,
    }
}

pub fn ids(films: &[Film]) -> Vec<FilmId> {
    films.iter().map(|f| f.id).collect()
}

/// Catalog used by the orchestrator tests:
/// - Horror 5, 6, 7 (ranks 90, 85, 80), Horror 3 (10)
/// - Drama 10 (60), Comedy 20 (40), Drama 1, 2, 4 (ranks 99, 98, 97)
/// - Action 30..=39 (ranks 39 down to 30, so 30 is highest)
/// - u1 interacted with 10 and 20; u9 also interacted with 10
/// - u2 saved film 3 (Horror) and has no interactions
/// - u5 interacted with 30..=39 (ten films)
pub fn create_test_index() -> CatalogIndex {
    let mut index = CatalogIndex::new();
    for (id, category, rank) in [
        (1, "Drama", 99),
        (2, "Drama", 98),
        (4, "Drama", 97),
        (5, "Horror", 90),
        (6, "Horror", 85),
        (7, "Horror", 80),
        (3, "Horror", 10),
        (10, "Drama", 60),
        (20, "Comedy", 40),
    ] {
        index.insert_film(film(id, category, rank));
    }
    for id in 30..=39 {
        index.insert_film(film(id, "Action", 69 - id as i32));
    }

    let mut interact = |user: &str, film_id: FilmId| {
        index.insert_interaction(InteractionRecord {
            user_id: user.to_string(),
            film_id,
            timestamp: 1_700_000_000,
        })
    };
    interact("u1", 10);
    interact("u1", 20);
    interact("u9", 10);
    for id in 30..=39 {
        interact("u5", id);
    }

    index.insert_watchlist_entry(WatchlistEntry {
        user_id: "u2".to_string(),
        film_id: 3,
    });

    index.build_secondary_indices();
    index
}

/// Store wrapper that can fail on demand and counts every call.
pub struct MockStore {
    inner: CatalogStore,
    /// `get_by_id` fails with a query error for these ids
    pub failing_ids: HashSet<FilmId>,
    /// Every call fails with `StoreError::Unavailable`
    pub unavailable: bool,
    /// Interaction reads fail with a query error
    pub broken_interactions: bool,
    /// Sleep this long inside every call
    pub latency: Option<Duration>,

    pub interaction_calls: AtomicUsize,
    pub watchlist_calls: AtomicUsize,
    pub film_query_calls: AtomicUsize,
    pub get_by_id_calls: AtomicUsize,
}

impl MockStore {
    pub fn new(index: CatalogIndex) -> Self {
        Self {
            inner: CatalogStore::new(Arc::new(index)),
            failing_ids: HashSet::new(),
            unavailable: false,
            broken_interactions: false,
            latency: None,
            interaction_calls: AtomicUsize::new(0),
            watchlist_calls: AtomicUsize::new(0),
            film_query_calls: AtomicUsize::new(0),
            get_by_id_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_failing_ids(mut self, ids: impl IntoIterator<Item = FilmId>) -> Self {
        self.failing_ids.extend(ids);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn with_broken_interactions(mut self) -> Self {
        self.broken_interactions = true;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Calls that only the content-based strategy issues
    pub fn content_calls(&self) -> usize {
        self.watchlist_calls.load(Ordering::SeqCst) + self.film_query_calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, counter: &AtomicUsize) -> StoreResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl InteractionStore for MockStore {
    async fn film_ids_interacted_with(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> StoreResult<Vec<FilmId>> {
        self.enter(&self.interaction_calls).await?;
        if self.broken_interactions {
            return Err(StoreError::Query("userInteractions scan failed".to_string()));
        }
        self.inner.film_ids_interacted_with(ctx, user_id).await
    }

    async fn film_ids_co_occurring(
        &self,
        ctx: &RequestContext,
        film_ids: &[FilmId],
        limit: usize,
    ) -> StoreResult<Vec<FilmId>> {
        self.enter(&self.interaction_calls).await?;
        self.inner.film_ids_co_occurring(ctx, film_ids, limit).await
    }
}

#[async_trait]
impl WatchlistStore for MockStore {
    async fn film_ids(&self, ctx: &RequestContext, user_id: &str) -> StoreResult<Vec<FilmId>> {
        self.enter(&self.watchlist_calls).await?;
        self.inner.film_ids(ctx, user_id).await
    }
}

#[async_trait]
impl FilmStore for MockStore {
    async fn categories_of(
        &self,
        ctx: &RequestContext,
        film_ids: &[FilmId],
    ) -> StoreResult<Vec<Category>> {
        self.enter(&self.film_query_calls).await?;
        self.inner.categories_of(ctx, film_ids).await
    }

    async fn top_ranked(&self, ctx: &RequestContext, limit: usize) -> StoreResult<Vec<Film>> {
        self.enter(&self.film_query_calls).await?;
        self.inner.top_ranked(ctx, limit).await
    }

    async fn by_category(
        &self,
        ctx: &RequestContext,
        categories: &[Category],
        limit: usize,
    ) -> StoreResult<Vec<Film>> {
        self.enter(&self.film_query_calls).await?;
        self.inner.by_category(ctx, categories, limit).await
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: FilmId) -> StoreResult<Film> {
        self.enter(&self.get_by_id_calls).await?;
        if self.failing_ids.contains(&id) {
            return Err(StoreError::Query(format!("lookup of film {} failed", id)));
        }
        self.inner.get_by_id(ctx, id).await
    }
}
