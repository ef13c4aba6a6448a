//! Example: Generate candidates for a user
//!
//! Run with: cargo run --package sources --example generate_candidates -- alice
//!
//! This example shows how to:
//! 1. Load the film catalog
//! 2. Run the collaborative strategy
//! 3. Run the content-based strategy
//! 4. Display the results

use catalog::CatalogIndex;
use sources::{
    CandidateStrategy, CatalogStore, CollaborativeStrategy, ContentBasedStrategy, RequestContext,
};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== Film Candidate Generation Example ===\n");

    let user_id = std::env::args().nth(1).unwrap_or_else(|| "alice".to_string());

    println!("Loading film catalog...");
    let start = Instant::now();
    let index = Arc::new(CatalogIndex::load_from_files(Path::new("data/catalog"))?);
    println!("Loaded catalog in {:?}\n", start.elapsed());

    println!("Target User: {}", user_id);
    println!("  Interactions: {}", index.user_interactions(&user_id).len());
    println!("  Watchlist: {}\n", index.watchlist(&user_id).len());

    let store = Arc::new(CatalogStore::new(index.clone()));
    let strategies: Vec<Box<dyn CandidateStrategy>> = vec![
        Box::new(CollaborativeStrategy::new(store.clone())),
        Box::new(ContentBasedStrategy::new(store.clone(), store)),
    ];

    for strategy in &strategies {
        let ctx = RequestContext::new(Duration::from_secs(2));
        let start = Instant::now();
        let candidates = strategy.candidates(&ctx, &user_id).await?;
        println!(
            "{} ({}) produced {} candidates in {:?}",
            strategy.name(),
            strategy.source(),
            candidates.len(),
            start.elapsed()
        );

        for (i, id) in candidates.ids().iter().enumerate() {
            if let Some(film) = index.get_film(*id) {
                println!("  {}. {} [{}] rank {}", i + 1, film.title, film.category, film.rank);
            }
        }
        println!();
    }

    Ok(())
}
