// src/models/trivia.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::question::PublicQuestion;

/// Represents the 'trivias' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Trivia {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Trivia with its question set loaded, correct options hidden.
#[derive(Debug, Serialize)]
pub struct TriviaDetail {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub questions: Vec<PublicQuestion>,
}

/// DTO for creating a new trivia.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTriviaRequest {
    #[validate(length(min = 1, max = 100, message = "Name must not be empty."))]
    pub name: String,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    /// Questions to associate, in play order. Must all exist.
    #[validate(length(min = 1, message = "At least one question is required."))]
    pub question_ids: Vec<i64>,
    /// Users enrolled as participants. Must all exist.
    #[serde(default)]
    pub user_ids: Vec<i64>,
}

/// DTO for updating a trivia. Fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateTriviaRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}
