// src/scoring.rs

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::question::Question;

/// Closed set of recognized difficulty tiers.
///
/// Stored data drifted across evolutions of the trivia catalog (numeric
/// tiers in one, localized Spanish labels in another), so every label goes
/// through `from_label` before it can influence a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Points awarded for a correct answer at this tier.
    pub fn weight(self) -> i64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    /// Normalizes a stored difficulty label. Accepts the canonical English
    /// labels, the legacy Spanish labels (with and without accents) and the
    /// legacy numeric tiers. Returns `None` for anything else.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "easy" | "fácil" | "facil" | "1" => Some(Difficulty::Easy),
            "medium" | "medio" | "media" | "2" => Some(Difficulty::Medium),
            "hard" | "difícil" | "dificil" | "3" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Per-question outcome of a scoring run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuestionOutcome {
    /// Text of the correct option.
    pub correct_answer: String,
    /// The question's stored difficulty label.
    pub difficulty: String,
    pub is_correct: bool,
}

/// Result of scoring one submission against one trivia.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub score: i64,
    /// Exactly one entry per question in the trivia, keyed by question id.
    pub breakdown: BTreeMap<i64, QuestionOutcome>,
}

/// Scores a submission against a trivia's question set.
///
/// `questions` is the trivia's full question list in stored order;
/// `answers` maps question id (as a string) to an option slot label
/// ("option_1".."option_3"), not option text.
///
/// Pure and deterministic: completeness and membership of `answers` are the
/// caller's responsibility (see the participation handler). Within this
/// function a missing answer or an unknown slot label simply counts as
/// incorrect. Comparison against the correct option is exact and
/// case-sensitive. A correct answer contributes the question's difficulty
/// weight; an unrecognized difficulty contributes nothing and is logged.
pub fn score_trivia(questions: &[Question], answers: &HashMap<String, String>) -> ScoreResult {
    let mut score = 0;
    let mut breakdown = BTreeMap::new();

    for question in questions {
        let selected = answers
            .get(&question.id.to_string())
            .and_then(|slot| question.option_text(slot));

        let is_correct = selected == Some(question.correct_option.as_str());

        if is_correct {
            match Difficulty::from_label(&question.difficulty) {
                Some(difficulty) => score += difficulty.weight(),
                None => {
                    tracing::warn!(
                        question_id = question.id,
                        difficulty = %question.difficulty,
                        "unrecognized difficulty, correct answer scored as 0"
                    );
                }
            }
        }

        breakdown.insert(
            question.id,
            QuestionOutcome {
                correct_answer: question.correct_option.clone(),
                difficulty: question.difficulty.clone(),
                is_correct,
            },
        );
    }

    ScoreResult { score, breakdown }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, correct: &str, options: [&str; 3], difficulty: &str) -> Question {
        Question {
            id,
            question_text: format!("Question {}", id),
            correct_option: correct.to_string(),
            option_1: options[0].to_string(),
            option_2: options[1].to_string(),
            option_3: options[2].to_string(),
            difficulty: difficulty.to_string(),
            created_at: None,
        }
    }

    fn answers(pairs: &[(i64, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(id, slot)| (id.to_string(), slot.to_string()))
            .collect()
    }

    #[test]
    fn all_correct_sums_difficulty_weights() {
        let questions = vec![
            question(1, "Paris", ["London", "Paris", "Rome"], "easy"),
            question(2, "Madrid", ["Madrid", "Lisbon", "Rome"], "medium"),
            question(3, "Berlin", ["Vienna", "Prague", "Berlin"], "hard"),
        ];
        let answers = answers(&[(1, "option_2"), (2, "option_1"), (3, "option_3")]);

        let result = score_trivia(&questions, &answers);

        assert_eq!(result.score, 1 + 2 + 3);
        assert!(result.breakdown.values().all(|o| o.is_correct));
    }

    #[test]
    fn all_wrong_scores_zero() {
        let questions = vec![
            question(1, "Paris", ["London", "Paris", "Rome"], "easy"),
            question(2, "Madrid", ["Madrid", "Lisbon", "Rome"], "hard"),
        ];
        let answers = answers(&[(1, "option_1"), (2, "option_3")]);

        let result = score_trivia(&questions, &answers);

        assert_eq!(result.score, 0);
        assert!(result.breakdown.values().all(|o| !o.is_correct));
    }

    #[test]
    fn partial_credit_matches_worked_example() {
        // Q1 easy correct via option_2, Q2 medium wrong -> total 1.
        let questions = vec![
            question(1, "Paris", ["London", "Paris", "Rome"], "easy"),
            question(2, "Madrid", ["London", "Madrid", "Rome"], "medium"),
        ];
        let answers = answers(&[(1, "option_2"), (2, "option_1")]);

        let result = score_trivia(&questions, &answers);

        assert_eq!(result.score, 1);
        assert!(result.breakdown[&1].is_correct);
        assert!(!result.breakdown[&2].is_correct);
    }

    #[test]
    fn breakdown_has_one_entry_per_question_even_when_unanswered() {
        let questions = vec![
            question(1, "Paris", ["London", "Paris", "Rome"], "easy"),
            question(2, "Madrid", ["London", "Madrid", "Rome"], "medium"),
            question(3, "Berlin", ["Vienna", "Prague", "Berlin"], "hard"),
        ];
        // Only one question answered; the engine itself does not reject that.
        let answers = answers(&[(2, "option_2")]);

        let result = score_trivia(&questions, &answers);

        assert_eq!(result.breakdown.len(), 3);
        assert!(!result.breakdown[&1].is_correct);
        assert!(result.breakdown[&2].is_correct);
        assert_eq!(result.breakdown[&3].correct_answer, "Berlin");
    }

    #[test]
    fn unknown_slot_label_is_incorrect_not_an_error() {
        let questions = vec![question(1, "Paris", ["London", "Paris", "Rome"], "easy")];
        let answers = answers(&[(1, "option_9")]);

        let result = score_trivia(&questions, &answers);

        assert_eq!(result.score, 0);
        assert!(!result.breakdown[&1].is_correct);
    }

    #[test]
    fn unrecognized_difficulty_contributes_zero() {
        let questions = vec![
            question(1, "Paris", ["London", "Paris", "Rome"], "impossible"),
            question(2, "Madrid", ["London", "Madrid", "Rome"], "easy"),
        ];
        let answers = answers(&[(1, "option_2"), (2, "option_2")]);

        let result = score_trivia(&questions, &answers);

        // Both correct, but only the recognized tier scores.
        assert!(result.breakdown[&1].is_correct);
        assert_eq!(result.score, 1);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let questions = vec![question(1, "Paris", ["paris", "Paris", "PARIS"], "easy")];

        let result = score_trivia(&questions, &answers(&[(1, "option_1")]));
        assert!(!result.breakdown[&1].is_correct);

        let result = score_trivia(&questions, &answers(&[(1, "option_2")]));
        assert!(result.breakdown[&1].is_correct);
    }

    #[test]
    fn score_is_bounded_by_three_per_question() {
        let questions = vec![
            question(1, "a", ["a", "b", "c"], "hard"),
            question(2, "a", ["a", "b", "c"], "hard"),
        ];
        let answers = answers(&[(1, "option_1"), (2, "option_1")]);

        let result = score_trivia(&questions, &answers);

        assert!(result.score >= 0);
        assert!(result.score <= 3 * questions.len() as i64);
    }

    #[test]
    fn legacy_difficulty_labels_normalize() {
        assert_eq!(Difficulty::from_label("Fácil"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_label("medio"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_label("media"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_label("Difícil"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_label("dificil"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_label("3"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_label("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_label("legendary"), None);
    }
}
