// src/models/session.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use std::collections::BTreeMap;
use validator::Validate;

use crate::models::question::QuizQuestion;

/// Represents the 'quiz_sessions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: i64,
    pub user_id: String,

    /// Quiz mode: 'practice', 'section', 'simulation' or 'quizplus'.
    pub mode: String,

    pub started_at: chrono::DateTime<chrono::Utc>,

    /// Null until the session is completed.
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,

    pub total_questions: i64,
    pub correct_count: i64,

    /// Content area id for section mode; null for the other modes.
    pub section_filter: Option<String>,

    /// Total seconds spent, written once at completion.
    pub time_spent: Option<i64>,
}

/// DTO returned when a quiz batch is opened.
#[derive(Debug, Serialize)]
pub struct QuizBatch {
    pub session_id: i64,
    pub questions: Vec<QuizQuestion>,
    pub total_questions: i64,
    /// Content area id, present for section mode only.
    pub topic: Option<String>,
    /// Time limit in seconds, present for the timed simulation mode only.
    pub time_limit: Option<i64>,
}

/// DTO for submitting one answer.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    pub session_id: i64,
    pub question_id: i64,
    #[validate(custom(function = validate_answer_label))]
    pub selected_answer: String,
    #[validate(range(min = 0))]
    pub time_spent: Option<i64>,
}

fn validate_answer_label(label: &str) -> Result<(), validator::ValidationError> {
    match label {
        "a" | "b" | "c" | "d" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_answer_label")),
    }
}

/// DTO for completing a session.
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteSessionRequest {
    pub session_id: i64,
    #[validate(range(min = 0))]
    pub time_spent: Option<i64>,
}

/// Immediate feedback for one submitted answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

/// One answered question in a completed session's review list.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct AnswerReview {
    pub question_id: i64,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Per-domain tally within a single completed session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainBreakdown {
    pub total: i64,
    pub correct: i64,
    pub percentage: f64,
}

/// Final scorecard for a completed session.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_id: i64,
    pub total_questions: i64,
    pub correct_count: i64,
    /// Percentage, unrounded.
    pub score: f64,
    pub time_spent: Option<i64>,
    pub answers: Vec<AnswerReview>,
    pub by_domain: BTreeMap<String, DomainBreakdown>,
}
