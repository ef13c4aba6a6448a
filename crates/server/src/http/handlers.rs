use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use catalog::Film;
use serde::Deserialize;
use serde_json::{Value, json};
use sources::RequestContext;
use tracing::{debug, error};

use super::AppState;
use super::error::{ApiError, ApiResult};

/// Query string of `GET /recommendations`
#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Recommendations for one user; an empty list is a normal response
pub async fn get_recommendations(
    State(state): State<AppState>,
    query: Result<Query<RecommendationsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Film>>> {
    let user_id = query
        .ok()
        .and_then(|Query(q)| q.user_id)
        .filter(|id| !id.trim().is_empty())
        .ok_or(ApiError::MissingUserId)?;

    if let Some(cache) = &state.cache {
        if let Some(films) = cache.store.get(&user_id).await {
            debug!("Cache hit for user {}", user_id);
            return Ok(Json(films));
        }
    }

    let ctx = RequestContext::new(state.request_timeout);
    // Cancels in-flight store calls if the client disconnects
    let _cancel_on_drop = ctx.cancellation_token().clone().drop_guard();

    match state.orchestrator.recommend(&ctx, &user_id).await {
        Ok(recommendations) => {
            if let Some(cache) = &state.cache {
                if !ctx.is_done() {
                    cache
                        .store
                        .set(&user_id, recommendations.films.clone(), cache.ttl)
                        .await;
                }
            }
            Ok(Json(recommendations.films))
        }
        Err(e) => {
            error!(
                request_id = %ctx.request_id,
                "Failed to fetch recommendations for {}: {}", user_id, e
            );
            Err(ApiError::Unavailable)
        }
    }
}
