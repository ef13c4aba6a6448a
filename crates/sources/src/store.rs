//! Read-side interfaces to the surrounding application's data.
//!
//! The recommendation engine never writes. These traits describe the
//! handful of queries it needs; `CatalogStore` answers them from an
//! in-memory `CatalogIndex`, and a database-backed implementation can be
//! dropped in without touching the strategies.

use std::sync::Arc;

use async_trait::async_trait;
use catalog::{CatalogIndex, Category, Film, FilmId};

use crate::context::RequestContext;
use crate::error::{StoreError, StoreResult};

/// Read access to "user interacted with film" facts.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Film ids the user has interacted with
    async fn film_ids_interacted_with(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> StoreResult<Vec<FilmId>>;

    /// Film ids referenced by interaction records whose film is in
    /// `film_ids`, at most `limit` of them
    async fn film_ids_co_occurring(
        &self,
        ctx: &RequestContext,
        film_ids: &[FilmId],
        limit: usize,
    ) -> StoreResult<Vec<FilmId>>;
}

/// Read access to "user saved film" facts.
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    async fn film_ids(&self, ctx: &RequestContext, user_id: &str) -> StoreResult<Vec<FilmId>>;
}

/// Read access to film rows.
#[async_trait]
pub trait FilmStore: Send + Sync {
    /// Categories of the given films
    async fn categories_of(
        &self,
        ctx: &RequestContext,
        film_ids: &[FilmId],
    ) -> StoreResult<Vec<Category>>;

    /// Highest-ranked films, rank descending
    async fn top_ranked(&self, ctx: &RequestContext, limit: usize) -> StoreResult<Vec<Film>>;

    /// Films in any of `categories`, rank descending
    async fn by_category(
        &self,
        ctx: &RequestContext,
        categories: &[Category],
        limit: usize,
    ) -> StoreResult<Vec<Film>>;

    /// A single film by id; `StoreError::NotFound` when there is no such row
    async fn get_by_id(&self, ctx: &RequestContext, id: FilmId) -> StoreResult<Film>;
}

/// All three stores backed by one shared `CatalogIndex`.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    index: Arc<CatalogIndex>,
}

impl CatalogStore {
    pub fn new(index: Arc<CatalogIndex>) -> Self {
        Self { index }
    }

    /// The underlying index, for callers that need direct reads (CLI output)
    pub fn index(&self) -> &Arc<CatalogIndex> {
        &self.index
    }
}

#[async_trait]
impl InteractionStore for CatalogStore {
    async fn film_ids_interacted_with(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> StoreResult<Vec<FilmId>> {
        ctx.check()?;
        Ok(self.index.films_interacted_with(user_id))
    }

    async fn film_ids_co_occurring(
        &self,
        ctx: &RequestContext,
        film_ids: &[FilmId],
        limit: usize,
    ) -> StoreResult<Vec<FilmId>> {
        ctx.check()?;
        Ok(self.index.co_occurring(film_ids, limit))
    }
}

#[async_trait]
impl WatchlistStore for CatalogStore {
    async fn film_ids(&self, ctx: &RequestContext, user_id: &str) -> StoreResult<Vec<FilmId>> {
        ctx.check()?;
        Ok(self.index.watchlist(user_id).to_vec())
    }
}

#[async_trait]
impl FilmStore for CatalogStore {
    async fn categories_of(
        &self,
        ctx: &RequestContext,
        film_ids: &[FilmId],
    ) -> StoreResult<Vec<Category>> {
        ctx.check()?;
        Ok(self.index.categories_of(film_ids))
    }

    async fn top_ranked(&self, ctx: &RequestContext, limit: usize) -> StoreResult<Vec<Film>> {
        ctx.check()?;
        Ok(self.index.top_ranked(limit).into_iter().cloned().collect())
    }

    async fn by_category(
        &self,
        ctx: &RequestContext,
        categories: &[Category],
        limit: usize,
    ) -> StoreResult<Vec<Film>> {
        ctx.check()?;
        Ok(self
            .index
            .by_category(categories, limit)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: FilmId) -> StoreResult<Film> {
        ctx.check()?;
        self.index
            .get_film(id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }
}
