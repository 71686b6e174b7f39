//! Router and Handlers
//!
//! Each handler opens its own database connection on a blocking worker
//! thread and releases it on every exit path. Errors map onto the HTTP
//! taxonomy: validation failures are 400, unknown lookups 404, storage
//! failures 500, all rendered as `{"error": message}`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::task;
use tracing::error;

use crate::api::protocol::{ErrorBody, StatsQuery, SubmitScoreBody, SubmitScoreResponse};
use crate::ranking::{self, LeaderboardRow, RankingError};
use crate::stats::{self, PlayerStats, StatsError};
use crate::store::{Database, StoreError};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Database handle; handlers open per-request connections from it.
    pub db: Database,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/leaderboard/submit", post(submit_score))
        .route("/api/players/stats", get(player_stats))
        .with_state(state)
}

/// HTTP projection of the error taxonomy.
#[derive(Debug)]
pub enum ApiError {
    /// Client input failed a stated constraint.
    BadRequest(String),
    /// No data matches the lookup key.
    NotFound(String),
    /// Persistence failed; nothing was committed.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal(message) => {
                error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<RankingError> for ApiError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::NameLength | RankingError::NonPositiveScore => {
                ApiError::BadRequest(err.to_string())
            }
            RankingError::Storage(cause) => {
                ApiError::Internal(format!("failed to submit score: {cause}"))
            }
        }
    }
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::MissingName => ApiError::BadRequest(err.to_string()),
            StatsError::UnknownPlayer => ApiError::NotFound(err.to_string()),
            StatsError::Storage(cause) => ApiError::Internal(cause.to_string()),
        }
    }
}

/// Run a closure against a fresh connection on the blocking thread pool.
async fn with_connection<T, F>(db: Database, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut rusqlite::Connection) -> Result<T, ApiError> + Send + 'static,
{
    task::spawn_blocking(move || {
        let mut conn = db.connect()?;
        work(&mut conn)
    })
    .await
    .map_err(|_| ApiError::Internal("database worker task failed".to_string()))?
}

/// `GET /api/leaderboard`
async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardRow>>, ApiError> {
    let rows = with_connection(state.db.clone(), |conn| {
        Ok(ranking::list_top10(conn)?)
    })
    .await?;
    Ok(Json(rows))
}

/// `POST /api/leaderboard/submit`
async fn submit_score(
    State(state): State<AppState>,
    Json(body): Json<SubmitScoreBody>,
) -> Result<Json<SubmitScoreResponse>, ApiError> {
    let request = body.into();
    let outcome = with_connection(state.db.clone(), move |conn| {
        Ok(ranking::submit(conn, &request)?)
    })
    .await?;

    Ok(Json(SubmitScoreResponse {
        success: true,
        message: outcome.message,
        rank: outcome.rank,
    }))
}

/// `GET /api/players/stats?name=X`
async fn player_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<PlayerStats>, ApiError> {
    let name = query.name.unwrap_or_default();
    let stats = with_connection(state.db.clone(), move |conn| {
        Ok(stats::stats_for(conn, &name)?)
    })
    .await?;
    Ok(Json(stats))
}
