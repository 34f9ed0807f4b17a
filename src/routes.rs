// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{quiz, review, sessions, stats},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Mounts the quiz, review, stats and session sub-routers under /api.
/// * Every route sits behind the bearer-token middleware.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let quiz_routes = Router::new()
        .route("/practice", get(quiz::practice_quiz))
        .route("/section", get(quiz::section_quiz))
        .route("/simulation", get(quiz::simulation_quiz))
        .route("/quizplus", get(quiz::quizplus_quiz))
        .route("/answer", post(quiz::submit_answer))
        .route("/complete", post(quiz::complete_quiz));

    let review_routes = Router::new().route("/", get(review::list_questions));

    let flashcard_routes = Router::new().route("/", get(review::list_flashcards));

    let question_routes = Router::new().route("/{id}", get(review::get_question));

    let stats_routes = Router::new().route("/", get(stats::get_stats));

    let session_routes = Router::new().route("/{id}", delete(sessions::delete_session));

    Router::new()
        .nest("/api/quiz", quiz_routes)
        .nest("/api/review", review_routes)
        .nest("/api/flashcards", flashcard_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/stats", stats_routes)
        .nest("/api/sessions", session_routes)
        // Global Middleware (applied from outside in)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
