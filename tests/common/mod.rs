// tests/common/mod.rs

// Each test binary compiles this module separately and uses a different
// subset of the helpers.
#![allow(dead_code)]

use cpce_prep::{config::Config, routes, state::AppState, utils::jwt::sign_jwt};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const TEST_JWT_SECRET: &str = "test_secret_for_integration_tests";

/// Unique database file per call so tests never share state.
fn test_db_path() -> std::path::PathBuf {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("cpce_prep_test_{}_{}.db", std::process::id(), id))
}

async fn connect_pool(path: &std::path::Path) -> SqlitePool {
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(path);

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("failed to create test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

/// Creates a fresh migrated throwaway database.
pub async fn create_test_pool() -> SqlitePool {
    connect_pool(&test_db_path()).await
}

/// Spawns the app on a random port against a throwaway database.
/// Returns the base URL and a pool into the same database for seeding.
pub async fn spawn_app() -> (String, SqlitePool) {
    let db_path = test_db_path();
    let pool = connect_pool(&db_path).await;

    let config = Config {
        database_url: format!("sqlite:{}", db_path.display()),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        rust_log: "error".to_string(),
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

/// Signs a bearer token the spawned app will accept.
pub fn auth_token(user_id: &str) -> String {
    sign_jwt(user_id, TEST_JWT_SECRET, 600).expect("failed to sign test token")
}

/// Inserts one question and returns its id. Option texts are derived from
/// the question text, so tests can recompute the text of any option.
pub async fn insert_question(
    pool: &SqlitePool,
    topic: &str,
    chapter: &str,
    question_number: i64,
    correct: &str,
    is_ai_generated: bool,
) -> i64 {
    let text = format!("Question {} of {}", question_number, topic);
    let options = serde_json::json!([
        { "label": "a", "text": format!("{} option a", text) },
        { "label": "b", "text": format!("{} option b", text) },
        { "label": "c", "text": format!("{} option c", text) },
        { "label": "d", "text": format!("{} option d", text) },
    ]);

    sqlx::query_scalar(
        "INSERT INTO questions (question_text, options, correct_answer, explanation, topic, chapter, page_number, question_number, is_ai_generated, source_type)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING id",
    )
    .bind(&text)
    .bind(options)
    .bind(correct)
    .bind(format!("The correct answer is {}.", correct))
    .bind(topic)
    .bind(chapter)
    .bind(0i64)
    .bind(question_number)
    .bind(is_ai_generated)
    .bind("book")
    .fetch_one(pool)
    .await
    .expect("failed to insert question")
}

/// Seeds `per_area` book questions (correct answer 'a') into every content
/// area. Returns all inserted ids.
pub async fn seed_bank(pool: &SqlitePool, per_area: i64) -> Vec<i64> {
    let mut ids = Vec::new();
    for area in cpce_prep::exam::CONTENT_AREAS.iter() {
        for n in 1..=per_area {
            ids.push(insert_question(pool, area.id, "Chapter 1", n, "a", false).await);
        }
    }
    ids
}
