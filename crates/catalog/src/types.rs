//! Core domain types for the film catalog.
//!
//! Everything in here is read-only from the recommendation engine's point of
//! view: films, interactions and watchlist entries are written by other parts
//! of the application and only ever loaded and queried here.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a film (serial primary key in the film table)
pub type FilmId = u32;

/// Opaque user identifier issued by the auth provider
pub type UserId = String;

/// Film category ("Horror", "Drama", ...)
pub type Category = String;

// =============================================================================
// Film
// =============================================================================

/// A film row as served to the UI.
///
/// Serialized in camelCase so the JSON shape matches what the sliders expect:
/// `id, title, overview, releaseYear, durationMinutes, ageRating, category,
/// imageUrl, trailerUrl, rank`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    pub overview: String,
    pub release_year: u16,
    pub duration_minutes: u32,
    pub age_rating: u8,
    pub category: Category,
    pub image_url: String,
    pub trailer_url: String,
    /// Precomputed popularity/quality score. Sole ordering key for the
    /// non-personalized fallback.
    pub rank: i32,
}

// =============================================================================
// User Facts
// =============================================================================

/// A user watched or otherwise engaged with a film
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub user_id: UserId,
    pub film_id: FilmId,
    /// Unix timestamp of the interaction
    pub timestamp: i64,
}

/// A user saved a film to their watchlist
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub user_id: UserId,
    pub film_id: FilmId,
}

// =============================================================================
// CatalogIndex - In-Memory Read Model
// =============================================================================

/// Holds all catalog data plus the indices the recommendation queries need.
///
/// Built once at startup and shared behind an `Arc`; every query method takes
/// `&self`.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    // Primary data
    pub(crate) films: HashMap<FilmId, Film>,

    /// Interaction log in insertion order
    pub(crate) interactions: Vec<InteractionRecord>,
    /// Positions into `interactions` for each user
    pub(crate) user_interactions: HashMap<UserId, Vec<usize>>,

    /// Watchlist film ids per user, unique per (user, film)
    pub(crate) watchlists: HashMap<UserId, Vec<FilmId>>,
    pub(crate) watchlist_pairs: HashSet<(UserId, FilmId)>,

    // Secondary indices, rebuilt by `build_secondary_indices`
    /// All film ids ordered by rank descending
    pub(crate) ranked: Vec<FilmId>,
    /// Film ids per category, each list ordered by rank descending
    pub(crate) category_index: HashMap<Category, Vec<FilmId>>,
}

impl CatalogIndex {
    /// Creates a new, empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a film by id
    pub fn get_film(&self, id: FilmId) -> Option<&Film> {
        self.films.get(&id)
    }

    /// All film ids, ordered by rank descending
    pub fn ranked_film_ids(&self) -> &[FilmId] {
        &self.ranked
    }

    /// Interaction records of one user, in the order they were logged
    pub fn user_interactions(&self, user_id: &str) -> Vec<&InteractionRecord> {
        self.user_interactions
            .get(user_id)
            .map(|positions| positions.iter().map(|&i| &self.interactions[i]).collect())
            .unwrap_or_default()
    }

    /// Film ids on a user's watchlist, in the order they were added
    pub fn watchlist(&self, user_id: &str) -> &[FilmId] {
        self.watchlists
            .get(user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every user id that appears in the interaction log or a watchlist,
    /// sorted so callers get a stable order.
    pub fn known_user_ids(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .user_interactions
            .keys()
            .chain(self.watchlists.keys())
            .cloned()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        users.sort();
        users
    }

    /// Insert a film. Secondary indices are stale until
    /// `build_secondary_indices` runs again.
    pub fn insert_film(&mut self, film: Film) {
        self.films.insert(film.id, film);
    }

    /// Append an interaction to the log
    pub fn insert_interaction(&mut self, record: InteractionRecord) {
        let position = self.interactions.len();
        self.user_interactions
            .entry(record.user_id.clone())
            .or_default()
            .push(position);
        self.interactions.push(record);
    }

    /// Add a watchlist entry. A repeated (user, film) pair is ignored.
    pub fn insert_watchlist_entry(&mut self, entry: WatchlistEntry) {
        if !self
            .watchlist_pairs
            .insert((entry.user_id.clone(), entry.film_id))
        {
            return;
        }
        self.watchlists
            .entry(entry.user_id)
            .or_default()
            .push(entry.film_id);
    }

    /// Get counts for debugging/validation: (films, interactions, watchlist entries)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.films.len(),
            self.interactions.len(),
            self.watchlist_pairs.len(),
        )
    }
}
