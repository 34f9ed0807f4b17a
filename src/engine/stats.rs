// src/engine/stats.rs

use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::BTreeMap;

use crate::engine::session::AnsweredQuestion;
use crate::error::AppError;
use crate::models::stats::{DomainStat, RecentSession, StatsOverview, UserStats};

/// Folds one completed session into the user's lifetime aggregate.
///
/// The read-modify-write runs inside a single transaction so that two
/// completions for the same user cannot interleave and lose updates. The
/// top-level counters additionally increment in SQL rather than being
/// rewritten from the snapshot.
pub async fn merge_session_stats(
    pool: &SqlitePool,
    user_id: &str,
    answers: &[AnsweredQuestion],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, UserStats>(
        "SELECT user_id, total_questions_answered, total_correct, stats_by_domain, last_studied_at
         FROM user_stats WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let mut by_domain: BTreeMap<String, DomainStat> = existing
        .map(|stats| stats.stats_by_domain.0)
        .unwrap_or_default();

    for answer in answers {
        let entry = by_domain.entry(answer.topic.clone()).or_default();
        entry.attempted += 1;
        if answer.is_correct {
            entry.correct += 1;
        }
    }

    let correct_in_session = answers.iter().filter(|a| a.is_correct).count() as i64;

    sqlx::query(
        "INSERT INTO user_stats (user_id, total_questions_answered, total_correct, stats_by_domain, last_studied_at)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT(user_id) DO UPDATE SET
             total_questions_answered = total_questions_answered + excluded.total_questions_answered,
             total_correct = total_correct + excluded.total_correct,
             stats_by_domain = excluded.stats_by_domain,
             last_studied_at = excluded.last_studied_at",
    )
    .bind(user_id)
    .bind(answers.len() as i64)
    .bind(correct_in_session)
    .bind(Json(&by_domain))
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        "merged {} answers ({correct_in_session} correct) into stats for user {user_id}",
        answers.len()
    );
    Ok(())
}

/// Backs a deleted session's answers out of the user's lifetime aggregate.
///
/// This is a compensating subtraction, not a true undo: every counter is
/// clamped at zero, domains absent from the stored map are skipped, and
/// `last_studied_at` is left alone. Runs on the caller's transaction so the
/// subtraction and the session delete commit together.
pub async fn reverse_session_stats(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: &str,
    answers: &[AnsweredQuestion],
) -> Result<(), AppError> {
    let existing = sqlx::query_as::<_, UserStats>(
        "SELECT user_id, total_questions_answered, total_correct, stats_by_domain, last_studied_at
         FROM user_stats WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await?;

    // Nothing merged yet, nothing to back out.
    let Some(stats) = existing else {
        return Ok(());
    };

    let mut by_domain = stats.stats_by_domain.0;
    let mut correct_in_session = 0i64;

    for answer in answers {
        if answer.is_correct {
            correct_in_session += 1;
        }
        let Some(entry) = by_domain.get_mut(&answer.topic) else {
            continue;
        };
        entry.attempted = (entry.attempted - 1).max(0);
        if answer.is_correct {
            entry.correct = (entry.correct - 1).max(0);
        }
    }

    let total_answered = (stats.total_questions_answered - answers.len() as i64).max(0);
    let total_correct = (stats.total_correct - correct_in_session).max(0);

    sqlx::query(
        "UPDATE user_stats SET total_questions_answered = $1, total_correct = $2, stats_by_domain = $3 WHERE user_id = $4",
    )
    .bind(total_answered)
    .bind(total_correct)
    .bind(Json(&by_domain))
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Read-side statistics overview: lifetime totals, per-domain tallies, the
/// study-day streak, and the ten most recent sessions that saw any answers.
pub async fn overview(pool: &SqlitePool, user_id: &str) -> Result<StatsOverview, AppError> {
    let stats = sqlx::query_as::<_, UserStats>(
        "SELECT user_id, total_questions_answered, total_correct, stats_by_domain, last_studied_at
         FROM user_stats WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let recent = sqlx::query_as::<_, RecentSession>(
        "SELECT s.id, s.mode, s.started_at, s.completed_at, s.total_questions, s.correct_count, s.section_filter, s.time_spent,
                (SELECT COUNT(*) FROM quiz_answers a WHERE a.session_id = s.id) AS answer_count
         FROM quiz_sessions s
         WHERE s.user_id = $1
           AND EXISTS (SELECT 1 FROM quiz_answers a WHERE a.session_id = s.id)
         ORDER BY s.started_at DESC
         LIMIT 10",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let recent_sessions = recent
        .into_iter()
        .map(|mut session| {
            session.score = if session.total_questions > 0 {
                (session.correct_count as f64 / session.total_questions as f64 * 100.0).round()
                    as i64
            } else {
                0
            };
            session
        })
        .collect();

    let completed: Vec<chrono::DateTime<Utc>> = sqlx::query_scalar(
        "SELECT completed_at FROM quiz_sessions
         WHERE user_id = $1 AND completed_at IS NOT NULL
         ORDER BY completed_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let completed_days: Vec<NaiveDate> = completed.iter().map(|t| t.date_naive()).collect();
    let streak = day_streak(Utc::now().date_naive(), &completed_days);

    let (total_questions_answered, total_correct, stats_by_domain, last_studied_at) = match stats {
        Some(stats) => (
            stats.total_questions_answered,
            stats.total_correct,
            stats.stats_by_domain.0,
            Some(stats.last_studied_at),
        ),
        None => (0, 0, BTreeMap::new(), None),
    };

    let overall_accuracy = if total_questions_answered > 0 {
        (total_correct as f64 / total_questions_answered as f64 * 100.0).round() as i64
    } else {
        0
    };

    Ok(StatsOverview {
        total_questions_answered,
        total_correct,
        overall_accuracy,
        stats_by_domain,
        last_studied_at,
        streak,
        recent_sessions,
    })
}

/// Counts consecutive calendar days with at least one completed session.
///
/// `completed_days` must be sorted newest first. The streak is anchored on
/// today or yesterday: a run that ended earlier counts as zero. Multiple
/// completions on the same day count once.
pub fn day_streak(today: NaiveDate, completed_days: &[NaiveDate]) -> i64 {
    let mut streak = 0i64;
    let mut current = today;

    for &day in completed_days {
        let diff = (current - day).num_days();
        if diff > 1 {
            break;
        }
        if diff == 1 || (diff == 0 && streak == 0) {
            streak += 1;
            current = day;
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_streak_empty_history() {
        assert_eq!(day_streak(date(2025, 3, 10), &[]), 0);
    }

    #[test]
    fn test_streak_today_only() {
        let today = date(2025, 3, 10);
        assert_eq!(day_streak(today, &[today]), 1);
    }

    #[test]
    fn test_streak_anchored_on_yesterday() {
        let today = date(2025, 3, 10);
        assert_eq!(day_streak(today, &[date(2025, 3, 9)]), 1);
        assert_eq!(day_streak(today, &[date(2025, 3, 9), date(2025, 3, 8)]), 2);
    }

    #[test]
    fn test_streak_run_of_three() {
        let today = date(2025, 3, 10);
        let days = [date(2025, 3, 10), date(2025, 3, 9), date(2025, 3, 8)];
        assert_eq!(day_streak(today, &days), 3);
    }

    #[test]
    fn test_streak_broken_by_gap() {
        let today = date(2025, 3, 10);
        let days = [date(2025, 3, 10), date(2025, 3, 9), date(2025, 3, 6)];
        assert_eq!(day_streak(today, &days), 2);
    }

    #[test]
    fn test_streak_stale_run_counts_zero() {
        let today = date(2025, 3, 10);
        let days = [date(2025, 3, 7), date(2025, 3, 6), date(2025, 3, 5)];
        assert_eq!(day_streak(today, &days), 0);
    }

    #[test]
    fn test_streak_same_day_counted_once() {
        let today = date(2025, 3, 10);
        let days = [
            date(2025, 3, 10),
            date(2025, 3, 10),
            date(2025, 3, 9),
        ];
        assert_eq!(day_streak(today, &days), 2);
    }
}
