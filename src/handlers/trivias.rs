// src/handlers/trivias.rs

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        question::{PublicQuestion, Question},
        trivia::{CreateTriviaRequest, Trivia, TriviaDetail, UpdateTriviaRequest},
    },
};

/// Returns the requested ids that are absent from `found`, joined for an
/// error message, or `None` when every reference resolves.
fn missing_ids(requested: &[i64], found: &[i64]) -> Option<String> {
    let found: HashSet<i64> = found.iter().copied().collect();
    let mut missing: Vec<i64> = requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect();
    if missing.is_empty() {
        return None;
    }
    missing.sort_unstable();
    missing.dedup();
    Some(
        missing
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Loads a trivia's questions in their stored (position) order.
pub async fn trivia_questions(pool: &PgPool, trivia_id: i64) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT q.id, q.question_text, q.correct_option,
               q.option_1, q.option_2, q.option_3, q.difficulty, q.created_at
        FROM questions q
        JOIN trivia_questions tq ON tq.question_id = q.id
        WHERE tq.trivia_id = $1
        ORDER BY tq.position
        "#,
    )
    .bind(trivia_id)
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

/// Lists all trivias.
pub async fn list_trivias(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let trivias = sqlx::query_as::<_, Trivia>(
        "SELECT id, name, description, created_at FROM trivias ORDER BY id",
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list trivias: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(trivias))
}

/// Retrieves a single trivia with its questions (correct options hidden).
pub async fn get_trivia(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let trivia = sqlx::query_as::<_, Trivia>(
        "SELECT id, name, description, created_at FROM trivias WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Trivia not found".to_string()))?;

    let questions = trivia_questions(&pool, id).await?;

    Ok(Json(TriviaDetail {
        id: trivia.id,
        name: trivia.name,
        description: trivia.description,
        questions: questions.into_iter().map(PublicQuestion::from).collect(),
    }))
}

/// Creates a new trivia with its question and user associations.
/// Admin only. Dangling question or user references are rejected, not
/// silently dropped. All rows are written in one transaction.
pub async fn create_trivia(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateTriviaRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    // Reference checks run inside the same transaction as the inserts, so a
    // question or user deleted concurrently is still a 400, not an FK error.
    let mut tx = pool.begin().await?;

    let found_questions: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM questions WHERE id = ANY($1)")
            .bind(&payload.question_ids)
            .fetch_all(&mut *tx)
            .await?;
    if let Some(ids) = missing_ids(&payload.question_ids, &found_questions) {
        return Err(AppError::BadRequest(format!(
            "Questions with IDs {} do not exist",
            ids
        )));
    }

    if !payload.user_ids.is_empty() {
        let found_users: Vec<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ANY($1)")
            .bind(&payload.user_ids)
            .fetch_all(&mut *tx)
            .await?;
        if let Some(ids) = missing_ids(&payload.user_ids, &found_users) {
            return Err(AppError::BadRequest(format!(
                "Users with IDs {} do not exist",
                ids
            )));
        }
    }

    let trivia_id: i64 =
        sqlx::query("INSERT INTO trivias (name, description) VALUES ($1, $2) RETURNING id")
            .bind(&payload.name)
            .bind(&payload.description)
            .fetch_one(&mut *tx)
            .await?
            .get("id");

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO trivia_questions (trivia_id, question_id, position) ");
    builder.push_values(
        payload.question_ids.iter().enumerate(),
        |mut b, (position, question_id)| {
            b.push_bind(trivia_id)
                .push_bind(question_id)
                .push_bind(position as i32);
        },
    );
    builder.build().execute(&mut *tx).await?;

    if !payload.user_ids.is_empty() {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO trivia_users (trivia_id, user_id) ");
        builder.push_values(payload.user_ids.iter(), |mut b, user_id| {
            b.push_bind(trivia_id).push_bind(user_id);
        });
        builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": trivia_id,
            "name": payload.name,
            "description": payload.description,
            "questions": payload.question_ids,
            "users": payload.user_ids,
        })),
    ))
}

/// Updates a trivia's name and/or description.
/// Admin only.
pub async fn update_trivia(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTriviaRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Check existence before anything else so an empty payload still 404s
    // for a missing trivia.
    sqlx::query("SELECT id FROM trivias WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Trivia not found".to_string()))?;

    if payload.name.is_none() && payload.description.is_none() {
        return Ok(StatusCode::OK);
    }

    if let Some(name) = &payload.name {
        if name.is_empty() {
            return Err(AppError::BadRequest("Name must not be empty".to_string()));
        }
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE trivias SET ");
    let mut separated = builder.separated(", ");

    if let Some(name) = payload.name {
        separated.push("name = ");
        separated.push_bind_unseparated(name);
    }

    if let Some(description) = payload.description {
        separated.push("description = ");
        separated.push_bind_unseparated(description);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update trivia: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Trivia not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a trivia by ID. Its associations, participations and rankings
/// go with it (FK cascade).
/// Admin only.
pub async fn delete_trivia(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM trivias WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete trivia: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Trivia not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
