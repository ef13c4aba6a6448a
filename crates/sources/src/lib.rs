//! # Sources Crate
//!
//! Candidate generation for the "Recommended for you" rail.
//!
//! ## Components
//!
//! ### Stores
//! Read-only interfaces to the application's data (`FilmStore`,
//! `InteractionStore`, `WatchlistStore`) and `CatalogStore`, which serves
//! all three from an in-memory `CatalogIndex`.
//!
//! ### Collaborative Source
//! Film ids that co-occur in the interaction log with films the user
//! already interacted with. Empty on cold start.
//!
//! ### Content-Based Source
//! Highest-ranked films in the categories of the user's watchlist, falling
//! back to the global top films by rank.
//!
//! Both implement `CandidateStrategy`, the seam the orchestrator depends on.
//! Every store call takes a `RequestContext` carrying the request deadline
//! and cancellation token.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{CatalogStore, CollaborativeStrategy, ContentBasedStrategy, RequestContext};
//! use std::{sync::Arc, time::Duration};
//!
//! let store = Arc::new(CatalogStore::new(index));
//! let collaborative = CollaborativeStrategy::new(store.clone());
//! let content = ContentBasedStrategy::new(store.clone(), store);
//!
//! let ctx = RequestContext::new(Duration::from_secs(2));
//! let ids = collaborative.recommend(&ctx, "u1").await?;
//! let films = content.recommend(&ctx, "u1").await?;
//! ```

pub mod collaborative;
pub mod content_based;
pub mod context;
pub mod error;
pub mod store;
pub mod traits;
pub mod types;

pub use collaborative::CollaborativeStrategy;
pub use content_based::ContentBasedStrategy;
pub use context::RequestContext;
pub use error::{StoreError, StoreResult};
pub use store::{CatalogStore, FilmStore, InteractionStore, WatchlistStore};
pub use traits::CandidateStrategy;
pub use types::{CandidateSet, CandidateSource};

#[cfg(test)]
pub(crate) mod test_fixtures {
    use catalog::{CatalogIndex, Film, FilmId, InteractionRecord, WatchlistEntry};

    pub fn film(id: FilmId, category: &str, rank: i32) -> Film {
        Film {
            id,
            title: format!("Film {}", id),
            overview: String::new(),
            release_year: 2010,
            duration_minutes: 95,
            age_rating: 12,
            category: category.to_string(),
            image_url: format!("{}.jpg", id),
            trailer_url: format!("{}.mp4", id),
            rank,
        }
    }

    /// Small catalog:
    /// - Horror 5, 6, 7, 8 (ranks 90, 80, 70, 10), Drama 10 (95),
    ///   Comedy 20 (50), uncategorised 40 (5)
    /// - u1 interacted with 10 and 20, u3 with 10
    /// - u2 saved 8 (Horror), u4 saved 40 (no category)
    pub fn create_test_index() -> CatalogIndex {
        let mut index = CatalogIndex::new();
        for (id, category, rank) in [
            (5, "Horror", 90),
            (6, "Horror", 80),
            (7, "Horror", 70),
            (8, "Horror", 10),
            (10, "Drama", 95),
            (20, "Comedy", 50),
            (40, "", 5),
        ] {
            index.insert_film(film(id, category, rank));
        }

        for (user, film_id) in [("u1", 10), ("u1", 20), ("u3", 10)] {
            index.insert_interaction(InteractionRecord {
                user_id: user.to_string(),
                film_id,
                timestamp: 1_700_000_000,
            });
        }

        for (user, film_id) in [("u2", 8), ("u4", 40)] {
            index.insert_watchlist_entry(WatchlistEntry {
                user_id: user.to_string(),
                film_id,
            });
        }

        index.build_secondary_indices();
        index
    }
}
