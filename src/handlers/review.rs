// src/handlers/review.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    engine::{selection, session},
    error::AppError,
    exam,
    models::question::{
        FlashcardBatch, Pagination, QuestionWithAnswer, ReviewFilters, ReviewPage, TopicOption,
    },
};

/// Query parameters for the paginated review listing.
#[derive(Debug, Deserialize)]
pub struct ReviewParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub topic: Option<String>,
    pub chapter: Option<String>,
    pub search: Option<String>,
}

/// Query parameters for drawing flashcards.
#[derive(Debug, Deserialize)]
pub struct FlashcardParams {
    pub topic: Option<String>,
    pub count: Option<i64>,
}

/// Paginated book-bank browsing with optional topic, chapter and search
/// filters. Review is a study surface, so answer keys are included.
pub async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(params): Query<ReviewParams>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(topic) = &params.topic {
        if exam::content_area(topic).is_none() {
            return Err(AppError::BadRequest(format!("Invalid topic: {}", topic)));
        }
    }

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, exam::MAX_BATCH_SIZE);
    let offset = (page - 1) * limit;

    // Prepare search pattern
    let search_pattern = params.search.as_ref().map(|s| format!("%{}%", s));

    let questions = sqlx::query_as::<_, QuestionWithAnswer>(
        "SELECT id, question_text, options, correct_answer, explanation, topic, chapter, page_number, question_number
         FROM questions
         WHERE is_ai_generated = FALSE
           AND ($1 IS NULL OR topic = $1)
           AND ($2 IS NULL OR chapter = $2)
           AND ($3 IS NULL OR question_text LIKE $3)
         ORDER BY chapter, question_number
         LIMIT $4 OFFSET $5",
    )
    .bind(params.topic.as_deref())
    .bind(params.chapter.as_deref())
    .bind(search_pattern.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await?;

    let total_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM questions
         WHERE is_ai_generated = FALSE
           AND ($1 IS NULL OR topic = $1)
           AND ($2 IS NULL OR chapter = $2)
           AND ($3 IS NULL OR question_text LIKE $3)",
    )
    .bind(params.topic.as_deref())
    .bind(params.chapter.as_deref())
    .bind(search_pattern.as_deref())
    .fetch_one(&pool)
    .await?;

    let available_chapters: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT chapter FROM questions WHERE is_ai_generated = FALSE ORDER BY chapter",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(ReviewPage {
        questions,
        pagination: Pagination {
            page,
            limit,
            total_count,
            total_pages: (total_count + limit - 1) / limit,
        },
        filters: ReviewFilters {
            available_chapters,
            available_topics: exam::CONTENT_AREAS
                .iter()
                .map(|area| TopicOption {
                    id: area.id,
                    name: area.short_name,
                })
                .collect(),
        },
    }))
}

/// Draws a batch of flashcards, optionally limited to one content area.
pub async fn list_flashcards(
    State(pool): State<SqlitePool>,
    Query(params): Query<FlashcardParams>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(topic) = &params.topic {
        if exam::content_area(topic).is_none() {
            return Err(AppError::BadRequest(format!("Invalid topic: {}", topic)));
        }
    }

    let count = params
        .count
        .unwrap_or(exam::FLASHCARD_DEFAULT_COUNT)
        .clamp(1, exam::MAX_BATCH_SIZE) as usize;
    let mut rng = StdRng::from_entropy();

    let flashcards =
        selection::flashcard_batch(&pool, params.topic.as_deref(), count, &mut rng).await?;

    Ok(Json(FlashcardBatch {
        total: flashcards.len() as i64,
        flashcards,
    }))
}

/// Retrieves a single question with its answer key and explanation.
pub async fn get_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = session::question_with_answer(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}
