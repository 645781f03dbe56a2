// src/handlers/users.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, is_unique_violation},
    models::{
        question::{PublicQuestion, Question},
        trivia::{Trivia, TriviaDetail},
        user::{UpdateUserRequest, User},
    },
    utils::jwt::Claims,
};

/// Lists all users in the system.
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, role, created_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(users))
}

/// Updates user information.
/// Admin only.
pub async fn update_user(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Check existence before anything else so an empty payload still 404s
    // for a missing user.
    sqlx::query("SELECT id FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    if payload.name.is_none() && payload.email.is_none() && payload.role.is_none() {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET ");
    let mut separated = builder.separated(", ");

    if let Some(name) = payload.name {
        separated.push("name = ");
        separated.push_bind_unseparated(name);
    }

    if let Some(email) = payload.email {
        separated.push("email = ");
        separated.push_bind_unseparated(email);
    }

    if let Some(role) = payload.role {
        separated.push("role = ");
        separated.push_bind_unseparated(role);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    builder.build().execute(&pool).await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Email already exists".to_string())
        } else {
            tracing::error!("Failed to update user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    Ok(StatusCode::OK)
}

/// Deletes a user by ID.
/// Admin only. Prevents deleting self.
pub async fn delete_user(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let current_user_id = claims.sub.parse::<i64>().unwrap_or(0);
    if id == current_user_id {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Lists the trivias a user is enrolled in, each with its questions.
///
/// 404 when the user does not exist, and also when the user has no trivias
/// assigned (callers expect a "no trivias" condition, not an empty list).
pub async fn get_user_trivias(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    sqlx::query("SELECT id FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let trivias = sqlx::query_as::<_, Trivia>(
        r#"
        SELECT t.id, t.name, t.description, t.created_at
        FROM trivias t
        JOIN trivia_users tu ON tu.trivia_id = t.id
        WHERE tu.user_id = $1
        ORDER BY t.id
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    if trivias.is_empty() {
        return Err(AppError::NotFound(
            "This user has no trivias assigned".to_string(),
        ));
    }

    let mut details = Vec::with_capacity(trivias.len());
    for trivia in trivias {
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
        .bind(trivia.id)
        .fetch_all(&pool)
        .await?;

        details.push(TriviaDetail {
            id: trivia.id,
            name: trivia.name,
            description: trivia.description,
            questions: questions.into_iter().map(PublicQuestion::from).collect(),
        });
    }

    Ok(Json(details))
}
