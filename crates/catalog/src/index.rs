//! CatalogIndex building and query logic.
//!
//! Loading parses the three data files in parallel, fills the primary
//! stores, derives the rank-ordered secondary indices and validates
//! references. The query methods mirror the reads the recommendation
//! strategies issue against the relational store.

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

impl CatalogIndex {
    /// Load the catalog from a directory containing `films.dat`,
    /// `interactions.dat` and `watchlists.dat`.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading film catalog from {:?}", data_dir);

        let films_path = data_dir.join("films.dat");
        let interactions_path = data_dir.join("interactions.dat");
        let watchlists_path = data_dir.join("watchlists.dat");

        // Three-way parallel parse with nested rayon joins
        let ((films, interactions), watchlists) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_films(&films_path),
                    || parser::parse_interactions(&interactions_path),
                )
            },
            || parser::parse_watchlists(&watchlists_path),
        );

        let films = films?;
        let interactions = interactions?;
        let watchlists = watchlists?;

        info!(
            "Parsed {} films, {} interactions, {} watchlist entries",
            films.len(),
            interactions.len(),
            watchlists.len()
        );

        let mut index = CatalogIndex::new();
        for film in films {
            index.insert_film(film);
        }
        for record in interactions {
            index.insert_interaction(record);
        }
        for entry in watchlists {
            index.insert_watchlist_entry(entry);
        }

        index.build_secondary_indices();
        index.validate()?;

        info!("Catalog index built and validated");
        Ok(index)
    }

    /// Rebuild the rank-ordered indices from the primary film store.
    ///
    /// Ties on rank are broken by ascending id so every query is
    /// deterministic.
    pub fn build_secondary_indices(&mut self) {
        let mut ranked: Vec<&Film> = self.films.values().collect();
        ranked.par_sort_unstable_by(|a, b| b.rank.cmp(&a.rank).then(a.id.cmp(&b.id)));

        self.category_index.clear();
        for film in &ranked {
            if film.category.is_empty() {
                continue;
            }
            self.category_index
                .entry(film.category.clone())
                .or_default()
                .push(film.id);
        }
        self.ranked = ranked.into_iter().map(|f| f.id).collect();
    }

    /// Check that every interaction and watchlist entry references a known film
    pub fn validate(&self) -> Result<()> {
        let dangling_interaction = self
            .interactions
            .par_iter()
            .find_any(|r| !self.films.contains_key(&r.film_id));
        if let Some(record) = dangling_interaction {
            return Err(CatalogError::MissingReference {
                entity: "Film (interaction)".to_string(),
                id: record.film_id,
            });
        }

        for (_, film_id) in &self.watchlist_pairs {
            if !self.films.contains_key(film_id) {
                return Err(CatalogError::MissingReference {
                    entity: "Film (watchlist)".to_string(),
                    id: *film_id,
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Recommendation queries
    // =========================================================================

    /// Distinct film ids the user interacted with, in first-interaction order
    pub fn films_interacted_with(&self, user_id: &str) -> Vec<FilmId> {
        let mut seen = HashSet::new();
        self.user_interactions(user_id)
            .into_iter()
            .map(|r| r.film_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Distinct film ids referenced by interaction records whose film is in
    /// `film_ids`, scanning the log in insertion order, capped at `limit`.
    pub fn co_occurring(&self, film_ids: &[FilmId], limit: usize) -> Vec<FilmId> {
        let wanted: HashSet<FilmId> = film_ids.iter().copied().collect();
        let mut seen = HashSet::new();
        self.interactions
            .iter()
            .map(|r| r.film_id)
            .filter(|id| wanted.contains(id) && seen.insert(*id))
            .take(limit)
            .collect()
    }

    /// Distinct, non-empty categories of the given films, first-seen order
    pub fn categories_of(&self, film_ids: &[FilmId]) -> Vec<Category> {
        let mut seen = HashSet::new();
        film_ids
            .iter()
            .filter_map(|id| self.films.get(id))
            .map(|film| film.category.as_str())
            .filter(|category| !category.is_empty() && seen.insert(*category))
            .map(str::to_string)
            .collect()
    }

    /// Highest-ranked films, rank descending
    pub fn top_ranked(&self, limit: usize) -> Vec<&Film> {
        self.ranked
            .iter()
            .take(limit)
            .filter_map(|id| self.films.get(id))
            .collect()
    }

    /// Films in any of `categories`, rank descending, capped at `limit`.
    ///
    /// Only the head of each per-category list can reach the result, so at
    /// most `limit` films per distinct category are merged.
    pub fn by_category(&self, categories: &[Category], limit: usize) -> Vec<&Film> {
        let mut seen = HashSet::new();
        let mut films: Vec<&Film> = categories
            .iter()
            .filter(|category| seen.insert(category.as_str()))
            .flat_map(|category| self.category_film_ids(category).iter().take(limit))
            .filter_map(|id| self.films.get(id))
            .collect();

        films.sort_unstable_by(|a, b| b.rank.cmp(&a.rank).then(a.id.cmp(&b.id)));
        films.truncate(limit);
        films
    }

    /// Film ids in a single category, rank descending
    pub fn category_film_ids(&self, category: &str) -> &[FilmId] {
        self.category_index
            .get(category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
