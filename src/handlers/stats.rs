// src/handlers/stats.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{engine::stats, error::AppError, utils::jwt::Claims};

/// Returns the caller's statistics overview: lifetime totals, per-domain
/// tallies, study-day streak and recent sessions.
pub async fn get_stats(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let overview = stats::overview(&pool, &claims.sub).await?;

    Ok(Json(overview))
}
