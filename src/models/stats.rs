// src/models/stats.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use std::collections::BTreeMap;

/// Represents the 'user_stats' table in the database.
/// One running lifetime aggregate per user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: String,
    pub total_questions_answered: i64,
    pub total_correct: i64,

    /// Per content area lifetime tallies, stored as a JSON map in the database.
    pub stats_by_domain: Json<BTreeMap<String, DomainStat>>,

    pub last_studied_at: chrono::DateTime<chrono::Utc>,
}

/// Lifetime tally for one content area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainStat {
    pub attempted: i64,
    pub correct: i64,
}

/// Overview payload for the stats endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsOverview {
    pub total_questions_answered: i64,
    pub total_correct: i64,

    /// Lifetime accuracy in percent, rounded for display.
    pub overall_accuracy: i64,

    pub stats_by_domain: BTreeMap<String, DomainStat>,
    pub last_studied_at: Option<chrono::DateTime<chrono::Utc>>,

    /// Consecutive calendar days with at least one completed session,
    /// anchored on today or yesterday.
    pub streak: i64,

    pub recent_sessions: Vec<RecentSession>,
}

/// One of the user's recent sessions in the overview.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct RecentSession {
    pub id: i64,
    pub mode: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub total_questions: i64,
    pub correct_count: i64,
    pub section_filter: Option<String>,
    pub time_spent: Option<i64>,
    pub answer_count: i64,

    /// Percentage, rounded for display. Not read from the database.
    #[sqlx(default)]
    pub score: i64,
}
