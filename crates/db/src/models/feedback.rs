use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Sentiment assigned to a feedback message at submission time.
#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

/// Feedback category chosen by the submitter.
#[derive(
    Debug,
    Clone,
    Copy,
    Type,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FeedbackCategory {
    #[default]
    General,
    Bug,
    Feature,
    Support,
    Other,
}

/// A stored feedback record. Immutable after insert; sentiment fields are
/// assigned atomically with creation and never updated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub message: String,
    pub category: FeedbackCategory,
    pub sentiment: SentimentLabel,
    pub sentiment_score: f64,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a feedback record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateFeedback {
    pub user_id: Option<Uuid>,
    pub message: String,
    pub category: FeedbackCategory,
    pub sentiment: SentimentLabel,
    pub sentiment_score: f64,
    pub is_anonymous: bool,
}

/// Row count grouped by sentiment label.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct SentimentCount {
    pub sentiment: SentimentLabel,
    pub count: i64,
}

/// Row count grouped by category.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct CategoryCount {
    pub category: FeedbackCategory,
    pub count: i64,
}

impl Feedback {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateFeedback,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"INSERT INTO feedback (id, user_id, message, category, sentiment, sentiment_score, is_anonymous)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, message, category, sentiment, sentiment_score, is_anonymous, created_at"#,
        )
        .bind(id)
        .bind(data.user_id)
        .bind(&data.message)
        .bind(data.category)
        .bind(data.sentiment)
        .bind(data.sentiment_score)
        .bind(data.is_anonymous)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"SELECT id, user_id, message, category, sentiment, sentiment_score, is_anonymous, created_at
            FROM feedback
            WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All feedback, newest first.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"SELECT id, user_id, message, category, sentiment, sentiment_score, is_anonymous, created_at
            FROM feedback
            ORDER BY created_at DESC"#,
        )
        .fetch_all(pool)
        .await
    }

    /// One user's feedback, newest first.
    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Feedback>(
            r#"SELECT id, user_id, message, category, sentiment, sentiment_score, is_anonymous, created_at
            FROM feedback
            WHERE user_id = $1
            ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Hard delete. Returns the number of rows removed (0 or 1).
    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_all(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
            .fetch_one(pool)
            .await
    }

    pub async fn count_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM feedback WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Submissions in the last 24 hours.
    pub async fn count_last_day(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM feedback WHERE created_at >= datetime('now', '-1 day')",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn count_by_sentiment(
        pool: &SqlitePool,
    ) -> Result<Vec<SentimentCount>, sqlx::Error> {
        sqlx::query_as::<_, SentimentCount>(
            r#"SELECT sentiment, COUNT(*) as count
            FROM feedback
            GROUP BY sentiment
            ORDER BY count DESC"#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_category(pool: &SqlitePool) -> Result<Vec<CategoryCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryCount>(
            r#"SELECT category, COUNT(*) as count
            FROM feedback
            GROUP BY category
            ORDER BY count DESC"#,
        )
        .fetch_all(pool)
        .await
    }

    /// Mean sentiment score over all records. `None` when the table is empty.
    pub async fn average_score(pool: &SqlitePool) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar("SELECT AVG(sentiment_score) FROM feedback")
            .fetch_one(pool)
            .await
    }

    pub async fn average_score_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar("SELECT AVG(sentiment_score) FROM feedback WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Timestamp of a user's most recent submission.
    pub async fn last_submission_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
        sqlx::query_scalar("SELECT MAX(created_at) FROM feedback WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
