use anyhow::{Context, Result, anyhow};
use catalog::{CatalogIndex, Film};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::seq::IndexedRandom;
use server::{Config, RecommendationOrchestrator, Recommendations, app_state, http};
use sources::{CatalogStore, RequestContext};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// film-recs - "Recommended for you" engine
#[derive(Parser)]
#[command(name = "film-recs")]
#[command(about = "Film recommendations from interactions and watchlists", long_about = None)]
struct Cli {
    /// Directory holding films.dat, interactions.dat and watchlists.dat
    /// (overrides FILM_RECS_DATA_DIR)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve GET /recommendations over HTTP until Ctrl-C
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Get film recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: String,

        /// Show which stage produced the list and each film's category and rank
        #[arg(long)]
        explain: bool,
    },

    /// Show a user's interactions and watchlist
    User {
        /// User ID to display
        #[arg(long)]
        user_id: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    println!("Loading film catalog from {}...", config.data_dir.display());
    let start = Instant::now();
    let index = Arc::new(
        CatalogIndex::load_from_files(&config.data_dir).context("Failed to load film catalog")?,
    );
    let (films, interactions, watchlist_entries) = index.counts();
    println!(
        "{} Loaded {} films, {} interactions, {} watchlist entries in {:?}",
        "✓".green(),
        films,
        interactions,
        watchlist_entries,
        start.elapsed()
    );

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            handle_serve(index, config).await?
        }
        Commands::Recommend { user_id, explain } => {
            handle_recommend(index, &config, &user_id, explain).await?
        }
        Commands::User { user_id } => handle_user(&index, &user_id)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(index, &config, requests, concurrent).await?,
    }

    Ok(())
}

fn build_orchestrator(index: Arc<CatalogIndex>) -> RecommendationOrchestrator {
    RecommendationOrchestrator::from_store(Arc::new(CatalogStore::new(index)))
}

/// Handle the 'serve' command
async fn handle_serve(index: Arc<CatalogIndex>, config: Config) -> Result<()> {
    let addr = config.bind_addr()?;
    let state = app_state(index, &config);
    match config.cache_ttl() {
        Some(ttl) => info!(?ttl, "Response cache enabled"),
        None => info!("Response cache disabled"),
    }
    info!(timeout = ?config.request_timeout(), "Per-request deadline");
    http::serve(addr, state).await
}

/// Handle the 'recommend' command
async fn handle_recommend(
    index: Arc<CatalogIndex>,
    config: &Config,
    user_id: &str,
    explain: bool,
) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(anyhow!("User ID is required"));
    }

    let orchestrator = build_orchestrator(index);
    let ctx = RequestContext::new(config.request_timeout());
    let start = Instant::now();
    let recommendations = orchestrator
        .recommend(&ctx, user_id)
        .await
        .context("Failed to fetch recommendations")?;

    print_recommendations(user_id, &recommendations, explain);
    if explain {
        println!(
            "\nServed by the {} stage in {:?} (request {})",
            recommendations.stage.to_string().yellow(),
            start.elapsed(),
            ctx.request_id
        );
    }
    Ok(())
}

/// Handle the 'user' command
fn handle_user(index: &CatalogIndex, user_id: &str) -> Result<()> {
    let interactions = index.user_interactions(user_id);
    let watchlist = index.watchlist(user_id);

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    if interactions.is_empty() && watchlist.is_empty() {
        println!("{}No interactions or watchlist entries (cold start)", "• ".yellow());
        return Ok(());
    }

    println!("{}Interactions: {}", "• ".green(), interactions.len());
    for record in interactions {
        println!(
            "  - {} (at {})",
            film_label(index, record.film_id),
            record.timestamp
        );
    }

    println!("{}Watchlist: {}", "• ".green(), watchlist.len());
    for film_id in watchlist {
        println!("  - {}", film_label(index, *film_id));
    }

    let categories = index.categories_of(watchlist);
    if !categories.is_empty() {
        println!("{}Watchlist categories: {}", "• ".cyan(), categories.join(", "));
    }
    Ok(())
}

fn film_label(index: &CatalogIndex, film_id: u32) -> String {
    match index.get_film(film_id) {
        Some(film) => format!("{} [{}] ({})", film.title, film.category, film.id),
        None => format!("unknown film {}", film_id),
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    index: Arc<CatalogIndex>,
    config: &Config,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("--requests must be at least 1"));
    }

    let mut users = index.known_user_ids();
    // Always include a cold-start user
    users.push("benchmark-newcomer".to_string());

    let user_ids: Vec<String> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| users.choose(&mut rng).cloned())
            .collect()
    };

    let orchestrator = Arc::new(build_orchestrator(index));
    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));
    let timeout = config.request_timeout();

    let wall_clock = Instant::now();
    let mut handles = Vec::with_capacity(user_ids.len());
    for user in user_ids {
        let orchestrator = orchestrator.clone();
        let semaphore = semaphore.clone();
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let ctx = RequestContext::new(timeout);
            let start = Instant::now();
            orchestrator.recommend(&ctx, &user).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();
    timings.sort();

    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    let throughput = timings.len() as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", timings.len(), concurrent.max(1));
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Nearest-rank percentile of an ascending slice
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Format and print a recommendation list
fn print_recommendations(user_id: &str, recommendations: &Recommendations, explain: bool) {
    println!(
        "{}",
        format!("Recommended for {}:", user_id).bold().blue()
    );
    if recommendations.films.is_empty() {
        println!("  (nothing to recommend yet)");
        return;
    }

    for (position, film) in recommendations.films.iter().enumerate() {
        print_film(position + 1, film, explain);
    }
}

fn print_film(position: usize, film: &Film, explain: bool) {
    println!(
        "{}. {} ({}) - {} min, {}+",
        position.to_string().green(),
        film.title,
        film.release_year,
        film.duration_minutes,
        film.age_rating
    );
    if explain {
        println!("   Category: {}, rank {}, id {}", film.category, film.rank, film.id);
    }
}
