use std::env;

use anyhow::Result;
use axum::Router;
use db::DBService;
use services::services::events::FeedbackEvents;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod session;

#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub events: FeedbackEvents,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if env::var("LOVABLE_API_KEY").is_err() {
        warn!("LOVABLE_API_KEY not set - feedback submissions will fail until configured");
    }

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://feedback.db".to_string());
    let db = DBService::new(&database_url).await?;

    let state = AppState {
        db,
        events: FeedbackEvents::default(),
    };

    let app = Router::new()
        .nest("/api", routes::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
