// src/handlers/sessions.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{engine::session, error::AppError, utils::jwt::Claims};

/// Deletes one of the caller's sessions and backs its contribution out of
/// the lifetime statistics. A session belonging to someone else is
/// indistinguishable from a missing one.
pub async fn delete_session(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    session::delete_session(&pool, id, &claims.sub).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
