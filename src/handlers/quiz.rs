// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    engine::{selection, session},
    error::AppError,
    exam::{self, QuizMode},
    models::session::{CompleteSessionRequest, QuizBatch, SubmitAnswerRequest},
    utils::jwt::Claims,
};

/// Query parameters for the batch-opening endpoints.
#[derive(Debug, Deserialize)]
pub struct BatchParams {
    pub count: Option<i64>,
}

/// Query parameters for the section endpoint. A missing topic is rejected
/// by the extractor itself.
#[derive(Debug, Deserialize)]
pub struct SectionParams {
    pub topic: String,
    pub count: Option<i64>,
}

fn clamp_count(requested: Option<i64>, default: i64) -> usize {
    requested.unwrap_or(default).clamp(1, exam::MAX_BATCH_SIZE) as usize
}

/// Opens a practice session: random book-bank questions across all content areas.
pub async fn practice_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<BatchParams>,
) -> Result<impl IntoResponse, AppError> {
    let count = clamp_count(params.count, exam::PRACTICE_DEFAULT_COUNT);
    let mut rng = StdRng::from_entropy();

    let questions = selection::practice_batch(&pool, count, &mut rng).await?;
    let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
    let session_id =
        session::open_session(&pool, &claims.sub, QuizMode::Practice, &question_ids, None).await?;

    Ok(Json(QuizBatch {
        session_id,
        total_questions: questions.len() as i64,
        questions,
        topic: None,
        time_limit: None,
    }))
}

/// Opens a section session: random questions from one content area.
pub async fn section_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<SectionParams>,
) -> Result<impl IntoResponse, AppError> {
    if exam::content_area(&params.topic).is_none() {
        return Err(AppError::BadRequest(format!(
            "Invalid topic: {}",
            params.topic
        )));
    }

    let count = clamp_count(params.count, exam::SECTION_DEFAULT_COUNT);
    let mut rng = StdRng::from_entropy();

    let questions = selection::section_batch(&pool, &params.topic, count, &mut rng).await?;
    let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
    let session_id = session::open_session(
        &pool,
        &claims.sub,
        QuizMode::Section,
        &question_ids,
        Some(&params.topic),
    )
    .await?;

    Ok(Json(QuizBatch {
        session_id,
        total_questions: questions.len() as i64,
        questions,
        topic: Some(params.topic),
        time_limit: None,
    }))
}

/// Opens a full-length timed simulation session: 160 questions, 20 per
/// content area, interleaved.
pub async fn simulation_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let mut rng = StdRng::from_entropy();

    let questions = selection::simulation_batch(&pool, &mut rng).await?;
    let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
    let session_id = session::open_session(
        &pool,
        &claims.sub,
        QuizMode::Simulation,
        &question_ids,
        None,
    )
    .await?;

    Ok(Json(QuizBatch {
        session_id,
        total_questions: questions.len() as i64,
        questions,
        topic: None,
        time_limit: Some(exam::TIME_LIMIT_SECONDS),
    }))
}

/// Opens a quizplus session: AI-generated extra questions only.
pub async fn quizplus_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<BatchParams>,
) -> Result<impl IntoResponse, AppError> {
    let count = clamp_count(params.count, exam::QUIZPLUS_DEFAULT_COUNT);
    let mut rng = StdRng::from_entropy();

    let questions = selection::quizplus_batch(&pool, count, &mut rng).await?;
    let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
    let session_id =
        session::open_session(&pool, &claims.sub, QuizMode::Quizplus, &question_ids, None).await?;

    Ok(Json(QuizBatch {
        session_id,
        total_questions: questions.len() as i64,
        questions,
        topic: None,
        time_limit: None,
    }))
}

/// Records one answer and returns whether it was correct, plus the key and
/// explanation for immediate review.
pub async fn submit_answer(
    State(pool): State<SqlitePool>,
    Json(mut payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.selected_answer.make_ascii_lowercase();
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let feedback = session::submit_answer(
        &pool,
        payload.session_id,
        payload.question_id,
        &payload.selected_answer,
        payload.time_spent,
    )
    .await?;

    Ok(Json(feedback))
}

/// Completes a session and returns the final scorecard.
pub async fn complete_quiz(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CompleteSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let result = session::complete_session(&pool, payload.session_id, payload.time_spent).await?;

    Ok(Json(result))
}
