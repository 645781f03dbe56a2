// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, participation, questions, ranking, trivias, users},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, users, questions, trivias, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool + config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route("/{id}/trivias", get(users::get_user_trivias))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let question_routes = Router::new()
        .route("/", get(questions::list_questions))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trivia_routes = Router::new()
        .route("/", get(trivias::list_trivias))
        .route("/{id}", get(trivias::get_trivia))
        .route("/{id}/participate", post(participation::participate))
        .route("/{id}/ranking", get(ranking::get_ranking))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/questions", post(questions::create_question))
        .route(
            "/questions/{id}",
            put(questions::update_question).delete(questions::delete_question),
        )
        .route("/trivias", post(trivias::create_trivia))
        .route(
            "/trivias/{id}",
            put(trivias::update_trivia).delete(trivias::delete_trivia),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/trivias", trivia_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
