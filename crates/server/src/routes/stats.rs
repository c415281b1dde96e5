//! Read-only aggregate views over the feedback store. Each is a full
//! re-query; dashboards call these again whenever a change event arrives.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use chrono::{DateTime, Utc};
use db::models::feedback::{CategoryCount, Feedback, SentimentCount};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Site-wide totals for the admin stat cards
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct OverviewStats {
    pub total_feedback: i64,
    pub average_score: f64,
    pub feedback_today: i64,
}

/// One user's totals for the personal dashboard
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UserStats {
    pub total_feedback: i64,
    pub average_score: f64,
    pub last_submission: Option<DateTime<Utc>>,
}

/// GET /api/stats/sentiment
/// Record counts grouped by sentiment label
pub async fn get_sentiment_summary(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<SentimentCount>>>, ApiError> {
    let counts = Feedback::count_by_sentiment(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(counts)))
}

/// GET /api/stats/categories
/// Record counts grouped by category
pub async fn get_category_summary(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<CategoryCount>>>, ApiError> {
    let counts = Feedback::count_by_category(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(counts)))
}

/// GET /api/stats/overview
pub async fn get_overview(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<OverviewStats>>, ApiError> {
    let total_feedback = Feedback::count_all(&state.db.pool).await?;
    let average_score = Feedback::average_score(&state.db.pool).await?.unwrap_or(0.0);
    let feedback_today = Feedback::count_last_day(&state.db.pool).await?;

    Ok(ResponseJson(ApiResponse::success(OverviewStats {
        total_feedback,
        average_score,
        feedback_today,
    })))
}

/// GET /api/stats/user/{user_id}
pub async fn get_user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<UserStats>>, ApiError> {
    let total_feedback = Feedback::count_for_user(&state.db.pool, user_id).await?;
    let average_score = Feedback::average_score_for_user(&state.db.pool, user_id)
        .await?
        .unwrap_or(0.0);
    let last_submission = Feedback::last_submission_for_user(&state.db.pool, user_id).await?;

    Ok(ResponseJson(ApiResponse::success(UserStats {
        total_feedback,
        average_score,
        last_submission,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/stats",
        Router::new()
            .route("/sentiment", get(get_sentiment_summary))
            .route("/categories", get(get_category_summary))
            .route("/overview", get(get_overview))
            .route("/user/{user_id}", get(get_user_stats)),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use db::{
        DBService,
        models::feedback::{CreateFeedback, Feedback, FeedbackCategory, SentimentLabel},
    };
    use services::services::events::FeedbackEvents;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::AppState;

    async fn test_state() -> AppState {
        AppState {
            db: DBService::new_in_memory().await.unwrap(),
            events: FeedbackEvents::default(),
        }
    }

    fn app(state: AppState) -> axum::Router {
        axum::Router::new()
            .nest("/api", crate::routes::router())
            .with_state(state)
    }

    async fn get_json(app: axum::Router, uri: &str) -> serde_json::Value {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn overview_on_empty_store() {
        let json = get_json(app(test_state().await), "/api/stats/overview").await;
        assert_eq!(json["data"]["total_feedback"], 0);
        assert_eq!(json["data"]["average_score"], 0.0);
        assert_eq!(json["data"]["feedback_today"], 0);
    }

    #[tokio::test]
    async fn summaries_reflect_inserted_records() {
        let state = test_state().await;
        let user_id = Uuid::new_v4();

        for (sentiment, score, category) in [
            (SentimentLabel::Positive, 0.7, FeedbackCategory::General),
            (SentimentLabel::Positive, 0.5, FeedbackCategory::Feature),
            (SentimentLabel::Negative, -0.7, FeedbackCategory::Bug),
        ] {
            Feedback::create(
                &state.db.pool,
                &CreateFeedback {
                    user_id: Some(user_id),
                    message: "some feedback".to_string(),
                    category,
                    sentiment,
                    sentiment_score: score,
                    is_anonymous: false,
                },
                Uuid::new_v4(),
            )
            .await
            .unwrap();
        }

        let json = get_json(app(state.clone()), "/api/stats/sentiment").await;
        let counts = json["data"].as_array().unwrap();
        assert_eq!(counts[0]["sentiment"], "positive");
        assert_eq!(counts[0]["count"], 2);

        let json = get_json(app(state.clone()), "/api/stats/categories").await;
        assert_eq!(json["data"].as_array().unwrap().len(), 3);

        let json = get_json(app(state.clone()), "/api/stats/overview").await;
        assert_eq!(json["data"]["total_feedback"], 3);
        assert_eq!(json["data"]["feedback_today"], 3);

        let json = get_json(app(state), &format!("/api/stats/user/{user_id}")).await;
        assert_eq!(json["data"]["total_feedback"], 3);
        assert!(json["data"]["last_submission"].is_string());
    }

    #[tokio::test]
    async fn user_stats_for_unknown_user_are_zero() {
        let json = get_json(
            app(test_state().await),
            &format!("/api/stats/user/{}", Uuid::new_v4()),
        )
        .await;
        assert_eq!(json["data"]["total_feedback"], 0);
        assert_eq!(json["data"]["average_score"], 0.0);
        assert!(json["data"]["last_submission"].is_null());
    }
}
