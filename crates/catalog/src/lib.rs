//! # Catalog Crate
//!
//! This crate loads and indexes the film catalog that the recommendation
//! engine reads from.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Film, InteractionRecord, WatchlistEntry, CatalogIndex)
//! - **parser**: Parse `::`-delimited .dat files into Rust structs
//! - **index**: Build rank-ordered indices and answer recommendation queries
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::CatalogIndex;
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_files(Path::new("data/catalog"))?;
//!
//! let watched = index.films_interacted_with("u1");
//! let top = index.top_ranked(10);
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{CatalogError, Result};
pub use types::{
    // Type aliases
    Category,
    FilmId,
    UserId,
    // Core types
    CatalogIndex,
    Film,
    InteractionRecord,
    WatchlistEntry,
};
