// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Labels accepted in answer maps for the three option slots.
pub const OPTION_SLOTS: [&str; 3] = ["option_1", "option_2", "option_3"];

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// The text content of the question.
    pub question_text: String,

    /// The text of the correct option. Always equals one of the three
    /// option slots below.
    pub correct_option: String,

    pub option_1: String,
    pub option_2: String,
    pub option_3: String,

    /// Difficulty tier: 'easy', 'medium' or 'hard' (normalized on write).
    pub difficulty: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Question {
    /// Resolves an option slot label ("option_1".."option_3") to the option
    /// text. Unknown labels yield `None`.
    pub fn option_text(&self, slot: &str) -> Option<&str> {
        match slot {
            "option_1" => Some(&self.option_1),
            "option_2" => Some(&self.option_2),
            "option_3" => Some(&self.option_3),
            _ => None,
        }
    }
}

/// DTO for sending a question to players (excludes the correct option).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub option_1: String,
    pub option_2: String,
    pub option_3: String,
    pub difficulty: String,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text,
            option_1: q.option_1,
            option_2: q.option_2,
            option_3: q.option_3,
            difficulty: q.difficulty,
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 255))]
    pub question_text: String,
    #[validate(length(min = 1, max = 100))]
    pub correct_option: String,
    /// Exactly three option texts.
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    #[validate(length(min = 1, max = 20))]
    pub difficulty: String,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() != 3 {
        return Err(validator::ValidationError::new("exactly_three_options_required"));
    }
    for opt in options {
        if opt.is_empty() || opt.len() > 100 {
            return Err(validator::ValidationError::new("option_length_invalid"));
        }
    }
    Ok(())
}

/// DTO for updating a question. Fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateQuestionRequest {
    pub question_text: Option<String>,
    pub correct_option: Option<String>,
    pub option_1: Option<String>,
    pub option_2: Option<String>,
    pub option_3: Option<String>,
    pub difficulty: Option<String>,
}
