use std::sync::Arc;

use futures::StreamExt;
use rdkafka::consumer::Consumer;
use rdkafka::consumer::StreamConsumer;
use rdkafka::error::KafkaError;
use rdkafka::ClientConfig;
use rdkafka::Message;
use thiserror::Error;

use super::messages::UserRegisteredMessage;
use crate::config::KafkaConfig;
use crate::domain::notification::models::UserRegistered;
use crate::domain::notification::ports::WelcomeNotifierPort;

#[derive(Debug, Error)]
pub enum MessageProcessingError {
    #[error("Kafka consumer error: {0}")]
    KafkaError(#[from] KafkaError),

    #[error("Message has no payload")]
    NoPayload,

    #[error("Failed to decode message payload as UTF-8: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    #[error("Failed to deserialize event: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Failed to handle event: {0}")]
    HandlingError(String),
}

/// Turns `user.registered` payloads into welcome notifications.
pub struct UserRegisteredHandler<N: WelcomeNotifierPort> {
    notifier: Arc<N>,
}

impl<N: WelcomeNotifierPort> UserRegisteredHandler<N> {
    pub fn new(notifier: Arc<N>) -> Self {
        Self { notifier }
    }

    /// Decode one payload and send the welcome email.
    pub async fn handle_payload(&self, payload: &[u8]) -> Result<(), MessageProcessingError> {
        let json_string = std::str::from_utf8(payload)?;
        let message = serde_json::from_str::<UserRegisteredMessage>(json_string)?;

        let event = UserRegistered::try_from(message)
            .map_err(|e| MessageProcessingError::InvalidEvent(e.to_string()))?;

        tracing::debug!(
            event_id = %event.event_id,
            user_id = %event.user_id,
            occurred_at = %event.occurred_at,
            "Received UserRegistered event"
        );

        self.notifier
            .send_welcome(&event.email, &event.username)
            .await
            .map_err(|e| MessageProcessingError::HandlingError(e.to_string()))
    }
}

/// Kafka consumer for `user.registered` events from identity-service.
///
/// Every failure is logged and the message skipped; nothing is retried.
pub struct UserRegisteredConsumer<N: WelcomeNotifierPort> {
    consumer: StreamConsumer,
    handler: UserRegisteredHandler<N>,
}

impl<N: WelcomeNotifierPort> UserRegisteredConsumer<N> {
    /// Create a consumer subscribed to the user registration topic.
    ///
    /// # Arguments
    /// * `config` - Kafka configuration
    /// * `notifier` - Welcome notification capability
    pub fn new(config: &KafkaConfig, notifier: Arc<N>) -> Result<Self, anyhow::Error> {
        tracing::info!(
            "Initializing user registration consumer: brokers={}, group_id={}, topic={}",
            &config.brokers,
            &config.group_id,
            &config.user_registered_topic
        );

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", "5000")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "30000")
            .set("enable.partition.eof", "false")
            .create()?;

        consumer.subscribe(&[config.user_registered_topic.as_str()])?;

        tracing::info!(
            "User registration consumer subscribed to '{}'",
            &config.user_registered_topic
        );

        Ok(Self {
            consumer,
            handler: UserRegisteredHandler::new(notifier),
        })
    }

    /// Consume until the stream ends.
    ///
    /// This is a long-running task that should be spawned in a separate tokio task
    pub async fn start_consuming(self) {
        tracing::info!("Starting user registration consumer loop");

        let mut message_stream = self.consumer.stream();

        while let Some(result) = message_stream.next().await {
            if let Err(error) = self.process_message(result).await {
                tracing::error!("Error processing user registration event: {}", error);

                if matches!(error, MessageProcessingError::KafkaError(_)) {
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
            }
        }

        tracing::warn!("User registration consumer loop ended");
    }

    async fn process_message(
        &self,
        result: Result<rdkafka::message::BorrowedMessage<'_>, KafkaError>,
    ) -> Result<(), MessageProcessingError> {
        let message = result?;
        let payload = message.payload().ok_or(MessageProcessingError::NoPayload)?;

        self.handler.handle_payload(payload).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;
    use serde_json::json;

    use super::*;
    use crate::domain::notification::errors::MailerError;
    use crate::domain::notification::errors::NotificationError;

    mock! {
        pub TestWelcomeNotifier {}

        #[async_trait]
        impl WelcomeNotifierPort for TestWelcomeNotifier {
            async fn send_welcome(&self, to: &str, username: &str) -> Result<(), NotificationError>;
        }
    }

    fn payload(event: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "event": event,
            "event_id": "e-1",
            "user_id": "0190b2a4-7d2e-7c3a-9f00-000000000001",
            "email": "a@b.com",
            "username": "alice",
            "occurred_at": 1_700_000_000
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload_sends_welcome() {
        let mut notifier = MockTestWelcomeNotifier::new();
        notifier
            .expect_send_welcome()
            .withf(|to, username| to == "a@b.com" && username == "alice")
            .times(1)
            .returning(|_, _| Ok(()));

        let handler = UserRegisteredHandler::new(Arc::new(notifier));

        assert!(handler
            .handle_payload(&payload("user.registered"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_skipped() {
        let mut notifier = MockTestWelcomeNotifier::new();
        notifier.expect_send_welcome().times(0);

        let handler = UserRegisteredHandler::new(Arc::new(notifier));

        assert!(matches!(
            handler.handle_payload(b"{not json").await,
            Err(MessageProcessingError::DeserializationError(_))
        ));
        assert!(matches!(
            handler.handle_payload(&[0xff, 0xfe]).await,
            Err(MessageProcessingError::Utf8Error(_))
        ));
        assert!(matches!(
            handler.handle_payload(&payload("user.deleted")).await,
            Err(MessageProcessingError::InvalidEvent(_))
        ));
    }

    #[tokio::test]
    async fn test_notifier_failure_is_reported() {
        let mut notifier = MockTestWelcomeNotifier::new();
        notifier
            .expect_send_welcome()
            .times(1)
            .returning(|_, _| {
                Err(NotificationError::Delivery(MailerError::Unavailable(
                    "smtp down".to_string(),
                )))
            });

        let handler = UserRegisteredHandler::new(Arc::new(notifier));

        assert!(matches!(
            handler.handle_payload(&payload("user.registered")).await,
            Err(MessageProcessingError::HandlingError(_))
        ));
    }
}
