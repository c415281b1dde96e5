pub mod events;
pub mod feedback;
pub mod stats;

use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(feedback::router())
        .merge(stats::router())
        .merge(events::router())
}
