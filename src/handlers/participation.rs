// src/handlers/participation.rs

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    handlers::trivias::trivia_questions,
    models::{
        participation::{Participation, SubmitParticipationRequest},
        trivia::Trivia,
        user::User,
    },
    scoring::score_trivia,
};

/// Submits a participation: validates the submission, scores it and appends
/// one participation row plus one ranking row in a single transaction.
///
/// Validation is fail-fast, in this order: path/body trivia id agreement,
/// actor identity present, actor resolves, answers non-empty, trivia
/// resolves, no foreign answer keys, full answer count. Nothing is persisted
/// on any failure.
pub async fn participate(
    State(pool): State<PgPool>,
    Path(trivia_id): Path<i64>,
    Json(payload): Json<SubmitParticipationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(body_trivia_id) = payload.trivia_id {
        if body_trivia_id != trivia_id {
            return Err(AppError::BadRequest(
                "Trivia id in body does not match the path".to_string(),
            ));
        }
    }

    if payload.user_id.is_none() && payload.user_name.is_none() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }

    let user = resolve_user(&pool, payload.user_id, payload.user_name.as_deref())
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    if payload.answers.is_empty() {
        return Err(AppError::BadRequest("No answers submitted".to_string()));
    }

    let trivia = sqlx::query_as::<_, Trivia>(
        "SELECT id, name, description, created_at FROM trivias WHERE id = $1",
    )
    .bind(trivia_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Trivia not found".to_string()))?;

    let questions = trivia_questions(&pool, trivia.id).await?;

    let question_ids: HashSet<String> = questions.iter().map(|q| q.id.to_string()).collect();
    let mut foreign: Vec<&String> = payload
        .answers
        .keys()
        .filter(|key| !question_ids.contains(*key))
        .collect();
    if !foreign.is_empty() {
        foreign.sort();
        let ids = foreign
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::BadRequest(format!(
            "Answers reference questions outside this trivia: {}",
            ids
        )));
    }

    if payload.answers.len() != questions.len() {
        return Err(AppError::BadRequest(format!(
            "Expected answers for all {} questions, got {}",
            questions.len(),
            payload.answers.len()
        )));
    }

    let result = score_trivia(&questions, &payload.answers);

    let answers_json = serde_json::to_value(&payload.answers)?;

    // Participation and ranking rows are written all-or-nothing.
    let mut tx = pool.begin().await?;

    let participation = sqlx::query_as::<_, Participation>(
        r#"
        INSERT INTO participations (user_id, trivia_id, answers, score)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, trivia_id, answers, score, created_at
        "#,
    )
    .bind(user.id)
    .bind(trivia.id)
    .bind(&answers_json)
    .bind(result.score)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO rankings (trivia_id, user_id, score) VALUES ($1, $2, $3)")
        .bind(trivia.id)
        .bind(user.id)
        .bind(result.score)
        .execute(&mut *tx)
        .await?;

    tx.commit().await.map_err(|e| {
        tracing::error!("Failed to commit participation: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!(
        user_id = user.id,
        trivia_id = trivia.id,
        score = result.score,
        "participation recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "participation_id": participation.id,
            "score": result.score,
            "breakdown": result.breakdown,
        })),
    ))
}

/// Resolves the participant, preferring the canonical id. Name lookup is a
/// compatibility shim for older clients that submitted `user_name`.
async fn resolve_user(
    pool: &PgPool,
    user_id: Option<i64>,
    user_name: Option<&str>,
) -> Result<Option<User>, AppError> {
    if let Some(id) = user_id {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        return Ok(user);
    }

    if let Some(name) = user_name {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, created_at FROM users WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;
        return Ok(user);
    }

    Ok(None)
}
