// src/engine/session.rs

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use std::collections::BTreeMap;

use crate::engine::stats;
use crate::error::AppError;
use crate::exam::QuizMode;
use crate::models::question::QuestionWithAnswer;
use crate::models::session::{
    AnswerFeedback, AnswerReview, DomainBreakdown, QuizSession, SessionResult,
};

/// One submitted answer joined with its question's key and content area.
/// Used for scoring a session and for the statistics merge/reversal.
#[derive(Debug, Clone, FromRow)]
pub struct AnsweredQuestion {
    pub question_id: i64,
    pub selected_answer: String,
    pub is_correct: bool,
    pub correct_answer: String,
    pub topic: String,
}

/// Creates a session row for a freshly drawn batch. Only the count of drawn
/// questions is stored; answers arrive one at a time afterwards.
pub async fn open_session(
    pool: &SqlitePool,
    user_id: &str,
    mode: QuizMode,
    question_ids: &[i64],
    section_filter: Option<&str>,
) -> Result<i64, AppError> {
    let session_id: i64 = sqlx::query_scalar(
        "INSERT INTO quiz_sessions (user_id, mode, started_at, total_questions, section_filter)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(user_id)
    .bind(mode.as_str())
    .bind(Utc::now())
    .bind(question_ids.len() as i64)
    .bind(section_filter)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        "opened {} session {session_id} with {} questions",
        mode.as_str(),
        question_ids.len()
    );
    Ok(session_id)
}

/// Records one answer and returns immediate feedback.
///
/// A second submission for the same question in the same session is rejected
/// with Conflict; revealing the key once makes overwriting unacceptable.
pub async fn submit_answer(
    pool: &SqlitePool,
    session_id: i64,
    question_id: i64,
    selected_answer: &str,
    time_spent: Option<i64>,
) -> Result<AnswerFeedback, AppError> {
    let (correct_answer, explanation): (String, String) = sqlx::query_as(
        "SELECT correct_answer, explanation FROM questions WHERE id = $1",
    )
    .bind(question_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Question not found".to_string()))?;

    let is_correct = selected_answer == correct_answer;

    sqlx::query(
        "INSERT INTO quiz_answers (session_id, question_id, selected_answer, is_correct, time_spent)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(session_id)
    .bind(question_id)
    .bind(selected_answer)
    .bind(is_correct)
    .bind(time_spent)
    .execute(pool)
    .await
    .map_err(|e| {
        // SQLite reports which constraint failed in the error text
        if e.to_string().contains("UNIQUE constraint failed") {
            AppError::Conflict("Answer already submitted for this question".to_string())
        } else if e.to_string().contains("FOREIGN KEY constraint failed") {
            AppError::NotFound("Session not found".to_string())
        } else {
            AppError::from(e)
        }
    })?;

    Ok(AnswerFeedback {
        is_correct,
        correct_answer,
        explanation,
    })
}

/// Finalizes a session: stamps the completion fields, merges this session
/// into the user's lifetime statistics, and returns the scorecard.
///
/// Completing an already-completed session is rejected with Conflict so the
/// statistics merge runs exactly once per session.
pub async fn complete_session(
    pool: &SqlitePool,
    session_id: i64,
    time_spent: Option<i64>,
) -> Result<SessionResult, AppError> {
    let session = sqlx::query_as::<_, QuizSession>(
        "SELECT id, user_id, mode, started_at, completed_at, total_questions, correct_count, section_filter, time_spent
         FROM quiz_sessions WHERE id = $1",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Session not found".to_string()))?;

    let answers = sqlx::query_as::<_, AnsweredQuestion>(
        "SELECT a.question_id, a.selected_answer, a.is_correct, q.correct_answer, q.topic
         FROM quiz_answers a
         JOIN questions q ON q.id = a.question_id
         WHERE a.session_id = $1
         ORDER BY a.id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    let correct_count = answers.iter().filter(|a| a.is_correct).count() as i64;

    // The completion stamp doubles as the claim: with the NULL filter only
    // one of two racing completions updates the row.
    let result = sqlx::query(
        "UPDATE quiz_sessions SET completed_at = $1, correct_count = $2, time_spent = $3
         WHERE id = $4 AND completed_at IS NULL",
    )
    .bind(Utc::now())
    .bind(correct_count)
    .bind(time_spent)
    .bind(session_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Conflict("Session already completed".to_string()));
    }

    // The completion write above and the merge below are separate units of
    // work: if the merge fails the session stays completed with stale stats.
    stats::merge_session_stats(pool, &session.user_id, &answers).await?;

    let mut by_domain: BTreeMap<String, DomainBreakdown> = BTreeMap::new();
    for answer in &answers {
        let entry = by_domain.entry(answer.topic.clone()).or_default();
        entry.total += 1;
        if answer.is_correct {
            entry.correct += 1;
        }
    }
    for entry in by_domain.values_mut() {
        entry.percentage = entry.correct as f64 / entry.total as f64 * 100.0;
    }

    let score = if session.total_questions > 0 {
        correct_count as f64 / session.total_questions as f64 * 100.0
    } else {
        0.0
    };

    tracing::info!(
        "completed session {session_id}: {correct_count}/{} correct",
        session.total_questions
    );

    Ok(SessionResult {
        session_id,
        total_questions: session.total_questions,
        correct_count,
        score,
        time_spent,
        answers: answers
            .into_iter()
            .map(|a| AnswerReview {
                question_id: a.question_id,
                selected_answer: a.selected_answer,
                correct_answer: a.correct_answer,
                is_correct: a.is_correct,
            })
            .collect(),
        by_domain,
    })
}

/// Deletes a session owned by the user, backing its answers' contribution
/// out of the lifetime statistics first. Answer rows go with the session via
/// cascade. Everything runs in one transaction.
pub async fn delete_session(
    pool: &SqlitePool,
    session_id: i64,
    user_id: &str,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let session = sqlx::query_as::<_, QuizSession>(
        "SELECT id, user_id, mode, started_at, completed_at, total_questions, correct_count, section_filter, time_spent
         FROM quiz_sessions WHERE id = $1 AND user_id = $2",
    )
    .bind(session_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Session not found".to_string()))?;

    let answers = sqlx::query_as::<_, AnsweredQuestion>(
        "SELECT a.question_id, a.selected_answer, a.is_correct, q.correct_answer, q.topic
         FROM quiz_answers a
         JOIN questions q ON q.id = a.question_id
         WHERE a.session_id = $1
         ORDER BY a.id",
    )
    .bind(session_id)
    .fetch_all(&mut *tx)
    .await?;

    if !answers.is_empty() {
        stats::reverse_session_stats(&mut tx, &session.user_id, &answers).await?;
    }

    sqlx::query("DELETE FROM quiz_sessions WHERE id = $1")
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("deleted session {session_id} for user {user_id}");
    Ok(())
}

/// Full question detail including the answer key and explanation.
/// Absence is a valid non-error result; the transport decides what a
/// missing question means.
pub async fn question_with_answer(
    pool: &SqlitePool,
    question_id: i64,
) -> Result<Option<QuestionWithAnswer>, AppError> {
    let question = sqlx::query_as::<_, QuestionWithAnswer>(
        "SELECT id, question_text, options, correct_answer, explanation, topic, chapter, page_number, question_number
         FROM questions WHERE id = $1",
    )
    .bind(question_id)
    .fetch_optional(pool)
    .await?;

    Ok(question)
}
