// src/engine/selection.rs

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::exam::{CONTENT_AREAS, SIMULATION_QUESTION_COUNT};
use crate::models::question::{Flashcard, Question, QuizQuestion};

/// Draws up to `count` random book-bank questions across all content areas.
/// Returns fewer when the bank holds fewer.
pub async fn practice_batch(
    pool: &SqlitePool,
    count: usize,
    rng: &mut StdRng,
) -> Result<Vec<QuizQuestion>, AppError> {
    let mut questions = sqlx::query_as::<_, QuizQuestion>(
        "SELECT id, question_text, options, topic, chapter FROM questions WHERE is_ai_generated = FALSE",
    )
    .fetch_all(pool)
    .await?;

    questions.shuffle(rng);
    questions.truncate(count);
    Ok(questions)
}

/// Draws up to `count` random questions from a single content area.
/// The caller is responsible for validating the topic id.
pub async fn section_batch(
    pool: &SqlitePool,
    topic: &str,
    count: usize,
    rng: &mut StdRng,
) -> Result<Vec<QuizQuestion>, AppError> {
    let mut questions = sqlx::query_as::<_, QuizQuestion>(
        "SELECT id, question_text, options, topic, chapter FROM questions WHERE topic = $1 AND is_ai_generated = FALSE",
    )
    .bind(topic)
    .fetch_all(pool)
    .await?;

    questions.shuffle(rng);
    questions.truncate(count);
    Ok(questions)
}

/// Assembles a full-length simulation: the per-area quota from each of the
/// eight content areas, then one final shuffle to interleave the areas.
pub async fn simulation_batch(
    pool: &SqlitePool,
    rng: &mut StdRng,
) -> Result<Vec<QuizQuestion>, AppError> {
    let mut batch = Vec::with_capacity(SIMULATION_QUESTION_COUNT as usize);

    for area in CONTENT_AREAS.iter() {
        let mut questions = sqlx::query_as::<_, QuizQuestion>(
            "SELECT id, question_text, options, topic, chapter FROM questions WHERE topic = $1 AND is_ai_generated = FALSE",
        )
        .bind(area.id)
        .fetch_all(pool)
        .await?;

        questions.shuffle(rng);
        questions.truncate(area.quota as usize);
        batch.append(&mut questions);
    }

    batch.shuffle(rng);
    Ok(batch)
}

/// Draws up to `count` random AI-generated questions.
pub async fn quizplus_batch(
    pool: &SqlitePool,
    count: usize,
    rng: &mut StdRng,
) -> Result<Vec<QuizQuestion>, AppError> {
    let mut questions = sqlx::query_as::<_, QuizQuestion>(
        "SELECT id, question_text, options, topic, chapter FROM questions WHERE is_ai_generated = TRUE",
    )
    .fetch_all(pool)
    .await?;

    questions.shuffle(rng);
    questions.truncate(count);
    Ok(questions)
}

/// Draws up to `count` random book-bank questions, optionally filtered by
/// content area, rendered as study cards.
pub async fn flashcard_batch(
    pool: &SqlitePool,
    topic: Option<&str>,
    count: usize,
    rng: &mut StdRng,
) -> Result<Vec<Flashcard>, AppError> {
    let mut questions = sqlx::query_as::<_, Question>(
        "SELECT id, question_text, options, correct_answer, explanation, topic, chapter, page_number, question_number, is_ai_generated, source_type
         FROM questions
         WHERE is_ai_generated = FALSE AND ($1 IS NULL OR topic = $1)",
    )
    .bind(topic)
    .fetch_all(pool)
    .await?;

    questions.shuffle(rng);
    questions.truncate(count);

    Ok(questions.into_iter().map(into_flashcard).collect())
}

/// The card front is the question text; the back is the text of the correct
/// option, falling back to the bare label if the option list is inconsistent.
fn into_flashcard(question: Question) -> Flashcard {
    let back = question
        .options
        .iter()
        .find(|option| option.label == question.correct_answer)
        .map(|option| option.text.clone())
        .unwrap_or_else(|| question.correct_answer.clone());

    Flashcard {
        id: question.id,
        front: question.question_text,
        back,
        explanation: question.explanation,
        topic: question.topic,
        chapter: question.chapter,
        options: question.options,
        correct_answer: question.correct_answer,
    }
}
