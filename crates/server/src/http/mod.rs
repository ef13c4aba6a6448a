//! HTTP surface: `GET /recommendations?userId=` and `GET /health`.

pub mod error;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;

use anyhow::Context;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, CacheConfig};

/// Creates the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/recommendations", get(handlers::get_recommendations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C, then drain in-flight requests
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryCache, ResponseCache};
    use crate::orchestrator::RecommendationOrchestrator;
    use crate::test_support::{MockStore, create_test_index};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state(store: Arc<MockStore>) -> AppState {
        AppState::new(
            RecommendationOrchestrator::from_store(store),
            Duration::from_secs(2),
        )
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(test_state(Arc::new(MockStore::new(create_test_index()))));
        let response = get(app, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_missing_user_id_is_bad_request() {
        let store = Arc::new(MockStore::new(create_test_index()));

        for uri in ["/recommendations", "/recommendations?userId=", "/recommendations?userId=%20"] {
            let response = get(create_router(test_state(store.clone())), uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(
                body_json(response).await,
                serde_json::json!({ "error": "User ID is required" })
            );
        }
        assert_eq!(store.interaction_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_recommendations_json_shape() {
        let app = create_router(test_state(Arc::new(MockStore::new(create_test_index()))));
        let response = get(app, "/recommendations?userId=u2").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let films = json.as_array().unwrap();
        assert_eq!(films.len(), 4);
        assert_eq!(films[0]["id"], 5);
        for key in [
            "id",
            "title",
            "overview",
            "releaseYear",
            "durationMinutes",
            "ageRating",
            "category",
            "imageUrl",
            "trailerUrl",
            "rank",
        ] {
            assert!(films[0].get(key).is_some(), "missing {}", key);
        }
    }

    #[tokio::test]
    async fn test_no_signal_anywhere_is_empty_ok() {
        let store = Arc::new(MockStore::new(create_test_index()).with_broken_interactions());
        let orchestrator = RecommendationOrchestrator::with_strategies(
            Arc::new(sources::CollaborativeStrategy::new(store.clone())),
            Arc::new(sources::CollaborativeStrategy::new(store.clone())),
            store,
        );
        let app = create_router(AppState::new(orchestrator, Duration::from_secs(2)));

        let response = get(app, "/recommendations?userId=u1").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_internal_error() {
        let app = create_router(test_state(Arc::new(
            MockStore::new(create_test_index()).unavailable(),
        )));
        let response = get(app, "/recommendations?userId=u1").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Failed to fetch recommendations" })
        );
    }

    #[tokio::test]
    async fn test_cached_response_skips_the_store() {
        let store = Arc::new(MockStore::new(create_test_index()));
        let cache = Arc::new(MemoryCache::new());
        let state = test_state(store.clone()).with_cache(cache.clone(), Duration::from_secs(60));

        let first =
            body_json(get(create_router(state.clone()), "/recommendations?userId=u1").await).await;
        let calls = store.interaction_calls.load(Ordering::SeqCst);
        let second =
            body_json(get(create_router(state), "/recommendations?userId=u1").await).await;

        assert_eq!(first, second);
        assert_eq!(store.interaction_calls.load(Ordering::SeqCst), calls);
        assert!(cache.get("u1").await.is_some());
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = Arc::new(MemoryCache::new());
        let state = test_state(Arc::new(MockStore::new(create_test_index()).unavailable()))
            .with_cache(cache.clone(), Duration::from_secs(60));

        let response = get(create_router(state), "/recommendations?userId=u1").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(cache.is_empty().await);
    }
}
