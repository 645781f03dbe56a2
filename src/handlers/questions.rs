// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::question::{CreateQuestionRequest, OPTION_SLOTS, Question, UpdateQuestionRequest},
    scoring::Difficulty,
};

/// Lists all questions in the catalog.
pub async fn list_questions(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question_text, correct_option,
               option_1, option_2, option_3, difficulty, created_at
        FROM questions
        ORDER BY id
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(questions))
}

/// Creates a new question.
/// Admin only. The correct option must be one of the three option texts,
/// and the difficulty label is normalized to the closed tier set on write.
pub async fn create_question(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !payload.options.contains(&payload.correct_option) {
        return Err(AppError::BadRequest(
            "correct_option must match one of the provided options".to_string(),
        ));
    }

    let difficulty = Difficulty::from_label(&payload.difficulty).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unrecognized difficulty '{}', expected easy, medium or hard",
            payload.difficulty
        ))
    })?;

    let question = sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions (question_text, correct_option, option_1, option_2, option_3, difficulty)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, question_text, correct_option,
                  option_1, option_2, option_3, difficulty, created_at
        "#,
    )
    .bind(&payload.question_text)
    .bind(&payload.correct_option)
    .bind(&payload.options[0])
    .bind(&payload.options[1])
    .bind(&payload.options[2])
    .bind(difficulty.as_str())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Updates a question by ID.
/// Admin only. The merged row must still have a correct option that matches
/// one of its option texts.
pub async fn update_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut question = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question_text, correct_option,
               option_1, option_2, option_3, difficulty, created_at
        FROM questions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Question not found".to_string()))?;

    if let Some(question_text) = payload.question_text {
        question.question_text = question_text;
    }
    if let Some(correct_option) = payload.correct_option {
        question.correct_option = correct_option;
    }
    if let Some(option_1) = payload.option_1 {
        question.option_1 = option_1;
    }
    if let Some(option_2) = payload.option_2 {
        question.option_2 = option_2;
    }
    if let Some(option_3) = payload.option_3 {
        question.option_3 = option_3;
    }
    if let Some(difficulty) = payload.difficulty {
        let normalized = Difficulty::from_label(&difficulty).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unrecognized difficulty '{}', expected easy, medium or hard",
                difficulty
            ))
        })?;
        question.difficulty = normalized.as_str().to_string();
    }

    let correct_matches_an_option = OPTION_SLOTS
        .iter()
        .any(|slot| question.option_text(slot) == Some(question.correct_option.as_str()));
    if !correct_matches_an_option {
        return Err(AppError::BadRequest(
            "correct_option must match one of the question's options".to_string(),
        ));
    }

    sqlx::query(
        r#"
        UPDATE questions
        SET question_text = $1, correct_option = $2,
            option_1 = $3, option_2 = $4, option_3 = $5, difficulty = $6
        WHERE id = $7
        "#,
    )
    .bind(&question.question_text)
    .bind(&question.correct_option)
    .bind(&question.option_1)
    .bind(&question.option_2)
    .bind(&question.option_3)
    .bind(&question.difficulty)
    .bind(id)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(question))
}

/// Deletes a question by ID.
/// Admin only. Fails while the question is referenced by a trivia.
pub async fn delete_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .and_then(|db| db.code())
                .map(|code| code == "23503")
                .unwrap_or(false)
            {
                AppError::Conflict("Question is still referenced by a trivia".to_string())
            } else {
                tracing::error!("Failed to delete question: {:?}", e);
                AppError::InternalServerError(e.to_string())
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
