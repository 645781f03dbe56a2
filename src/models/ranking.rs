// src/models/ranking.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'rankings' table: append-only ledger, one entry per
/// successful participation. A user who plays twice gets two entries.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Ranking {
    pub id: i64,
    pub trivia_id: i64,
    pub user_id: i64,
    pub score: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Aggregated row for the ranking read endpoint, joined with `users`.
#[derive(Debug, Serialize, FromRow)]
pub struct RankingEntry {
    pub user_name: String,
    pub score: i64,
}
