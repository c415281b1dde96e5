//! Broadcast bus for feedback change notifications.
//!
//! Dashboards subscribe and re-query their aggregates whenever an insert or
//! delete is announced. Dropping the receiver is the unsubscribe.

use db::models::feedback::{FeedbackCategory, SentimentLabel};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

/// A change to the feedback collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedbackEvent {
    Created {
        id: Uuid,
        sentiment: SentimentLabel,
        category: FeedbackCategory,
    },
    Deleted {
        id: Uuid,
    },
}

#[derive(Debug, Clone)]
pub struct FeedbackEvents {
    tx: broadcast::Sender<FeedbackEvent>,
}

impl FeedbackEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Announce a change. A send error only means there are no subscribers.
    pub fn publish(&self, event: FeedbackEvent) {
        if self.tx.send(event).is_err() {
            debug!("feedback event published with no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedbackEvent> {
        self.tx.subscribe()
    }
}

impl Default for FeedbackEvents {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let events = FeedbackEvents::default();
        let mut rx = events.subscribe();

        let created = FeedbackEvent::Created {
            id: Uuid::new_v4(),
            sentiment: SentimentLabel::Positive,
            category: FeedbackCategory::General,
        };
        events.publish(created.clone());
        assert_eq!(rx.recv().await.unwrap(), created);

        let deleted = FeedbackEvent::Deleted { id: Uuid::new_v4() };
        events.publish(deleted.clone());
        assert_eq!(rx.recv().await.unwrap(), deleted);
    }

    #[tokio::test]
    async fn dropped_receiver_stops_receiving() {
        let events = FeedbackEvents::default();
        let rx = events.subscribe();
        drop(rx);

        // No subscribers left; publish must not panic.
        events.publish(FeedbackEvent::Deleted { id: Uuid::new_v4() });
    }
}
