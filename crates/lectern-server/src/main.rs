use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use lectern_api::auth::{self, AppState, AppStateInner};
use lectern_api::courses;
use lectern_api::feedback;
use lectern_api::middleware::require_auth;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("LECTERN_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("LECTERN_DB_PATH").unwrap_or_else(|_| "lectern.db".into());
    let host = std::env::var("LECTERN_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("LECTERN_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Open the database and bring the schema up to date before serving.
    // The order matters: migrate adds the description column seed relies on.
    let db = lectern_db::Database::open(&PathBuf::from(&db_path))?;
    db.initialize()?;
    db.migrate()?;
    db.seed_defaults()?;

    let app_state: AppState = Arc::new(AppStateInner { db, jwt_secret });

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(app_state.clone());

    let protected_routes = Router::new()
        .route("/courses", get(courses::list_courses))
        .route("/courses", post(courses::create_course))
        .route("/courses/mine", get(courses::my_courses))
        .route("/courses/{course_id}/feedback", post(feedback::submit_feedback))
        .route("/courses/{course_id}/feedback", get(feedback::course_feedback))
        .route("/feedback/{feedback_id}", delete(feedback::delete_feedback))
        .layer(middleware::from_fn(require_auth))
        .with_state(app_state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Lectern server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
