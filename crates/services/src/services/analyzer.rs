//! Submission pipeline: classify a feedback message and persist the result.

use db::models::feedback::{CreateFeedback, Feedback, FeedbackCategory, SentimentLabel};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

use super::{
    ai_gateway::{AiGatewayClient, AiGatewayError, extract_json},
    events::{FeedbackEvent, FeedbackEvents},
    sentiment::{self, Classification},
};

const SENTIMENT_SYSTEM_PROMPT: &str = r#"You are a sentiment analysis system. Analyze the sentiment of the given text and respond ONLY with a JSON object in this exact format: {"sentiment": "positive" | "neutral" | "negative", "score": number between -1 and 1}. The score should be: positive (0.1 to 1.0), neutral (-0.1 to 0.1), negative (-1.0 to -0.09). Do not include any other text or explanation."#;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("message must not be blank")]
    Validation,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("ai gateway error: {0}")]
    Gateway(#[from] AiGatewayError),
}

/// A feedback submission before classification.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct NewSubmission {
    pub message: String,
    pub user_id: Option<Uuid>,
    pub category: FeedbackCategory,
}

/// What the caller gets back after a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SubmissionOutcome {
    pub sentiment: SentimentLabel,
    pub score: f64,
    pub feedback_id: Uuid,
}

/// Classification payload expected back from the gateway.
#[derive(Debug, Clone, Deserialize)]
struct GatewayClassification {
    sentiment: String,
    score: f64,
}

/// Service that classifies feedback and writes the record.
pub struct SentimentAnalyzer {
    pool: SqlitePool,
    gateway: AiGatewayClient,
    events: FeedbackEvents,
}

impl SentimentAnalyzer {
    pub fn new(pool: SqlitePool, events: FeedbackEvents) -> Result<Self, AnalyzerError> {
        let gateway = AiGatewayClient::from_env()?;
        Ok(Self {
            pool,
            gateway,
            events,
        })
    }

    pub fn with_client(pool: SqlitePool, gateway: AiGatewayClient, events: FeedbackEvents) -> Self {
        Self {
            pool,
            gateway,
            events,
        }
    }

    /// Run the full pipeline: validate, classify, persist, notify.
    ///
    /// Gateway transport and HTTP failures propagate to the caller;
    /// unparseable gateway output degrades to the local keyword classifier.
    /// Nothing is retried.
    pub async fn analyze_and_store(
        &self,
        submission: NewSubmission,
    ) -> Result<SubmissionOutcome, AnalyzerError> {
        if submission.message.trim().is_empty() {
            return Err(AnalyzerError::Validation);
        }

        let reply = self
            .gateway
            .ask(SENTIMENT_SYSTEM_PROMPT, &submission.message)
            .await?;

        let classification = parse_classification(&reply).unwrap_or_else(|| {
            warn!(
                reply_preview = %reply.chars().take(200).collect::<String>(),
                "unparseable classifier reply, falling back to keyword classifier"
            );
            sentiment::classify(&submission.message)
        });

        let data = CreateFeedback {
            user_id: submission.user_id,
            message: submission.message,
            category: submission.category,
            sentiment: classification.label,
            sentiment_score: classification.score,
            is_anonymous: submission.user_id.is_none(),
        };
        let record = Feedback::create(&self.pool, &data, Uuid::new_v4()).await?;

        info!(
            feedback_id = %record.id,
            sentiment = %record.sentiment,
            category = %record.category,
            is_anonymous = record.is_anonymous,
            "feedback stored"
        );

        self.events.publish(FeedbackEvent::Created {
            id: record.id,
            sentiment: record.sentiment,
            category: record.category,
        });

        Ok(SubmissionOutcome {
            sentiment: record.sentiment,
            score: record.sentiment_score,
            feedback_id: record.id,
        })
    }
}

/// Parse the gateway reply into a classification, or `None` when the reply
/// is not the expected JSON object.
fn parse_classification(reply: &str) -> Option<Classification> {
    let parsed: GatewayClassification = serde_json::from_str(extract_json(reply)).ok()?;
    let label = parsed.sentiment.to_lowercase().parse::<SentimentLabel>().ok()?;
    Some(Classification {
        label,
        score: clamp_to_label(label, parsed.score),
    })
}

/// Force the score into the band its label promises, so the stored sign
/// always agrees with the stored label.
fn clamp_to_label(label: SentimentLabel, score: f64) -> f64 {
    match label {
        SentimentLabel::Positive => score.clamp(0.1, 1.0),
        SentimentLabel::Neutral => score.clamp(-0.1, 0.1),
        SentimentLabel::Negative => score.clamp(-1.0, -0.1),
    }
}
