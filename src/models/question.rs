// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// A single answer choice. Labels run 'a' through 'd'.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    pub text: String,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// The text content of the question.
    pub question_text: String,

    /// List of answer choices (e.g., [{"label": "a", "text": "..."}]).
    /// Stored as a JSON array in the database.
    pub options: Json<Vec<AnswerOption>>,

    /// Label of the correct option.
    pub correct_answer: String,

    /// Explanation of the correct answer. Empty string when the source has none.
    pub explanation: String,

    /// Content area id (e.g., 'career-development').
    pub topic: String,

    pub chapter: String,
    pub page_number: i64,
    pub question_number: i64,

    /// Whether the question came from the AI generator rather than the book bank.
    pub is_ai_generated: bool,

    pub source_type: String,
}

/// DTO for serving a question inside a quiz batch (excludes answer and explanation).
#[derive(Debug, Serialize, FromRow)]
pub struct QuizQuestion {
    pub id: i64,
    pub question_text: String,
    pub options: Json<Vec<AnswerOption>>,
    pub topic: String,
    pub chapter: String,
}

/// Full question detail including the answer key, for review surfaces.
#[derive(Debug, Serialize, FromRow)]
pub struct QuestionWithAnswer {
    pub id: i64,
    pub question_text: String,
    pub options: Json<Vec<AnswerOption>>,
    pub correct_answer: String,
    pub explanation: String,
    pub topic: String,
    pub chapter: String,
    pub page_number: i64,
    pub question_number: i64,
}

/// A question rendered as a front/back study card.
/// The back is the text of the correct option.
#[derive(Debug, Serialize)]
pub struct Flashcard {
    pub id: i64,
    pub front: String,
    pub back: String,
    pub explanation: String,
    pub topic: String,
    pub chapter: String,
    pub options: Json<Vec<AnswerOption>>,
    pub correct_answer: String,
}

/// DTO wrapping a drawn batch of flashcards.
#[derive(Debug, Serialize)]
pub struct FlashcardBatch {
    pub flashcards: Vec<Flashcard>,
    pub total: i64,
}

/// One page of the review listing.
#[derive(Debug, Serialize)]
pub struct ReviewPage {
    pub questions: Vec<QuestionWithAnswer>,
    pub pagination: Pagination,
    pub filters: ReviewFilters,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// Filter menus offered alongside the review listing.
#[derive(Debug, Serialize)]
pub struct ReviewFilters {
    /// Distinct chapters across the book bank.
    pub available_chapters: Vec<String>,
    pub available_topics: Vec<TopicOption>,
}

/// Topic entry for the review filter menu.
#[derive(Debug, Serialize)]
pub struct TopicOption {
    pub id: &'static str,
    pub name: &'static str,
}
