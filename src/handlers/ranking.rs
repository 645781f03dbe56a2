// src/handlers/ranking.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{ranking::RankingEntry, trivia::Trivia},
};

/// Returns the ranking for a trivia, sorted by score descending. Equal
/// scores keep insertion order (earlier entry first). A trivia with zero
/// recorded entries is a 404, not an empty list.
pub async fn get_ranking(
    State(pool): State<PgPool>,
    Path(trivia_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let trivia = sqlx::query_as::<_, Trivia>(
        "SELECT id, name, description, created_at FROM trivias WHERE id = $1",
    )
    .bind(trivia_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Trivia not found".to_string()))?;

    let ranking = sqlx::query_as::<_, RankingEntry>(
        r#"
        SELECT u.name AS user_name, r.score
        FROM rankings r
        JOIN users u ON u.id = r.user_id
        WHERE r.trivia_id = $1
        ORDER BY r.score DESC, r.id ASC
        "#,
    )
    .bind(trivia_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch ranking: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if ranking.is_empty() {
        return Err(AppError::NotFound(
            "No participants yet for this trivia".to_string(),
        ));
    }

    Ok(Json(serde_json::json!({
        "trivia": {
            "id": trivia.id,
            "name": trivia.name,
            "description": trivia.description,
        },
        "ranking": ranking,
    })))
}
