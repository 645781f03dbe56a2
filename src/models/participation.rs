// src/models/participation.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'participations' table: one row per scoring run,
/// never mutated after insert.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Participation {
    pub id: i64,
    pub user_id: i64,
    pub trivia_id: i64,

    /// Raw submitted answers, keyed by question id as a string,
    /// values are option slot labels.
    pub answers: sqlx::types::Json<HashMap<String, String>>,

    pub score: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting a participation.
#[derive(Debug, Deserialize)]
pub struct SubmitParticipationRequest {
    /// Must match the path parameter when present.
    pub trivia_id: Option<i64>,

    /// Canonical participant identifier.
    pub user_id: Option<i64>,
    /// Legacy identifier, consulted only when `user_id` is absent.
    pub user_name: Option<String>,

    /// question-id (as string) -> "option_1" | "option_2" | "option_3"
    pub answers: HashMap<String, String>,
}
