//! Routes for submitting, listing, and deleting feedback.

use axum::{
    Router,
    extract::{Path, State},
    http::HeaderMap,
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::feedback::{Feedback, FeedbackCategory, SentimentLabel};
use serde::{Deserialize, Serialize};
use services::services::{
    analyzer::{NewSubmission, SentimentAnalyzer},
    events::FeedbackEvent,
};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session};

/// Request body for a feedback submission
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub is_anonymous: Option<bool>,
    #[serde(default)]
    pub category: Option<FeedbackCategory>,
}

/// Response for a successful submission
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackResponse {
    pub sentiment: SentimentLabel,
    pub score: f64,
    pub feedback_id: Uuid,
}

/// POST /api/feedback
/// Classify a message and persist the resulting record
pub async fn submit_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<SubmitFeedbackRequest>,
) -> Result<ResponseJson<SubmitFeedbackResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::Validation(
            "message must not be blank".to_string(),
        ));
    }

    // Body userId wins over the session header; an explicit isAnonymous=true
    // drops the author entirely so the record stays anonymous either way.
    let session_user = session::current_session(&headers).map(|s| s.user_id);
    let user_id = if payload.is_anonymous == Some(true) {
        None
    } else {
        payload.user_id.or(session_user)
    };

    let analyzer = SentimentAnalyzer::new(state.db.pool.clone(), state.events.clone())?;
    let outcome = analyzer
        .analyze_and_store(NewSubmission {
            message: payload.message,
            user_id,
            category: payload.category.unwrap_or_default(),
        })
        .await?;

    Ok(ResponseJson(SubmitFeedbackResponse {
        sentiment: outcome.sentiment,
        score: outcome.score,
        feedback_id: outcome.feedback_id,
    }))
}

/// GET /api/feedback
/// All feedback, newest first (admin table)
pub async fn list_feedback(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Feedback>>>, ApiError> {
    let records = Feedback::find_all(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

/// GET /api/feedback/user/{user_id}
/// One user's feedback, newest first (history view)
pub async fn list_user_feedback(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Feedback>>>, ApiError> {
    let records = Feedback::find_by_user_id(&state.db.pool, user_id).await?;
    Ok(ResponseJson(ApiResponse::success(records)))
}

/// DELETE /api/feedback/{id}
/// Hard delete a record
pub async fn delete_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let removed = Feedback::delete(&state.db.pool, id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound);
    }

    state.events.publish(FeedbackEvent::Deleted { id });

    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/feedback",
        Router::new()
            .route("/", post(submit_feedback).get(list_feedback))
            .route("/{id}", delete(delete_feedback))
            .route("/user/{user_id}", get(list_user_feedback)),
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
    use services::services::events::{FeedbackEvent, FeedbackEvents};
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

    async fn seed(state: &AppState) -> Feedback {
        Feedback::create(
            &state.db.pool,
            &CreateFeedback {
                user_id: None,
                message: "love the new editor".to_string(),
                category: FeedbackCategory::General,
                sentiment: SentimentLabel::Positive,
                sentiment_score: 0.7,
                is_anonymous: true,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn blank_message_is_rejected_before_classification() {
        let response = app(test_state().await)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/feedback")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn list_returns_seeded_records() {
        let state = test_state().await;
        let record = seed(&state).await;

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/feedback")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["id"], record.id.to_string());
        assert_eq!(json["data"][0]["sentiment"], "positive");
    }

    #[tokio::test]
    async fn delete_removes_record_and_notifies() {
        let state = test_state().await;
        let record = seed(&state).await;
        let mut rx = state.events.subscribe();
        let pool = state.db.pool.clone();

        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/feedback/{}", record.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            rx.recv().await.unwrap(),
            FeedbackEvent::Deleted { id: record.id }
        );
        assert!(Feedback::find_by_id(&pool, record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let response = app(test_state().await)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/feedback/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
