use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::producer::Producer;
use rdkafka::util::Timeout;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::KafkaConfig;
use crate::domain::identity::errors::EventPublisherError;
use crate::domain::identity::events::UserRegisteredEvent;
use crate::domain::identity::ports::EventPublisher;
use crate::outbound::events::messages::UserRegisteredMessage;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),

    #[error("Failed to create Kafka producer: {0}")]
    ClientCreation(String),

    #[error("Producer factory is closed")]
    Closed,
}

impl From<KafkaProducerError> for EventPublisherError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SerializationError(msg) => {
                EventPublisherError::SerializationFailed(msg)
            }
            KafkaProducerError::SendError(msg) => EventPublisherError::PublishFailed(msg),
            KafkaProducerError::ClientCreation(msg) => EventPublisherError::ConnectionFailed(msg),
            KafkaProducerError::Closed => {
                EventPublisherError::ConnectionFailed("producer factory is closed".to_string())
            }
        }
    }
}

/// Producer bound to a single topic.
pub struct TopicProducer {
    producer: FutureProducer,
    topic: String,
    queue_timeout: Duration,
}

impl TopicProducer {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Send one keyed record. A single attempt: a failed or timed-out send is
    /// reported to the caller and never re-sent.
    ///
    /// Records sharing a key land on the same partition, so events of one
    /// user stay ordered.
    pub async fn publish(&self, key: &str, payload: &[u8]) -> Result<(), KafkaProducerError> {
        tracing::debug!("Publishing event to topic '{}' (key: {})", self.topic, key);

        let record = FutureRecord::to(&self.topic).key(key).payload(payload);

        self.producer
            .send(record, Timeout::After(self.queue_timeout))
            .await
            .map(|_| {
                tracing::debug!(
                    "Event published successfully to topic '{}' for key {}",
                    self.topic,
                    key
                );
            })
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))
    }

    fn flush(&self, timeout: Duration) {
        if let Err(e) = self.producer.flush(Timeout::After(timeout)) {
            tracing::warn!("Failed to flush producer for topic '{}': {}", self.topic, e);
        }
    }
}

#[derive(Default)]
struct ProducerCache {
    producers: HashMap<String, Arc<TopicProducer>>,
    closed: bool,
}

/// Lazily-populated cache of one producer per topic.
///
/// Lookups share a read lock; a miss takes the write lock, re-checks and only
/// then creates the producer, so each topic gets exactly one instance.
pub struct KafkaProducerFactory {
    brokers: String,
    message_timeout: Duration,
    cache: RwLock<ProducerCache>,
}

impl KafkaProducerFactory {
    pub fn new(brokers: impl Into<String>, message_timeout: Duration) -> Self {
        Self {
            brokers: brokers.into(),
            message_timeout,
            cache: RwLock::new(ProducerCache::default()),
        }
    }

    pub fn from_config(config: &KafkaConfig) -> Self {
        Self::new(
            config.brokers.clone(),
            Duration::from_millis(config.message_timeout_ms),
        )
    }

    /// Get the producer for `topic`, creating it on first use.
    ///
    /// # Errors
    /// * `Closed` - `close` has already been called
    /// * `ClientCreation` - librdkafka rejected the client configuration
    pub async fn producer(&self, topic: &str) -> Result<Arc<TopicProducer>, KafkaProducerError> {
        {
            let cache = self.cache.read().await;
            if cache.closed {
                return Err(KafkaProducerError::Closed);
            }
            if let Some(producer) = cache.producers.get(topic) {
                return Ok(Arc::clone(producer));
            }
        }

        let mut cache = self.cache.write().await;
        if cache.closed {
            return Err(KafkaProducerError::Closed);
        }
        if let Some(producer) = cache.producers.get(topic) {
            return Ok(Arc::clone(producer));
        }

        let producer = Arc::new(self.create_producer(topic)?);
        cache
            .producers
            .insert(topic.to_string(), Arc::clone(&producer));

        Ok(producer)
    }

    /// Flush and drop every cached producer. Later lookups fail with `Closed`.
    ///
    /// The cache lock is released before flushing; flushes run on the blocking pool.
    pub async fn close(&self) {
        let producers: Vec<_> = {
            let mut cache = self.cache.write().await;
            cache.closed = true;
            cache.producers.drain().collect()
        };

        let timeout = self.message_timeout;
        for (topic, producer) in producers {
            tracing::info!(topic = %topic, "Closing Kafka producer");
            if let Err(e) = tokio::task::spawn_blocking(move || producer.flush(timeout)).await {
                tracing::warn!(topic = %topic, error = %e, "Producer flush task failed");
            }
        }
    }

    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: librdkafka's internal resends never duplicate a record
    /// - `message.timeout.ms`: Upper bound on one send, after which it is reported failed
    fn create_producer(&self, topic: &str) -> Result<TopicProducer, KafkaProducerError> {
        tracing::info!(
            "Initializing Kafka producer: brokers={}, topic={}",
            &self.brokers,
            topic
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set(
                "message.timeout.ms",
                self.message_timeout.as_millis().to_string(),
            )
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("max.in.flight.requests.per.connection", "5")
            .set("retry.backoff.ms", "100")
            .create()
            .map_err(|e| KafkaProducerError::ClientCreation(e.to_string()))?;

        Ok(TopicProducer {
            producer,
            topic: topic.to_string(),
            queue_timeout: self.message_timeout,
        })
    }
}

/// Event publisher that writes registration events through the producer cache.
pub struct KafkaEventPublisher {
    factory: Arc<KafkaProducerFactory>,
    topic: String,
}

impl KafkaEventPublisher {
    pub fn new(factory: Arc<KafkaProducerFactory>, topic: impl Into<String>) -> Self {
        Self {
            factory,
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish_user_registered(
        &self,
        event: &UserRegisteredEvent,
    ) -> Result<(), EventPublisherError> {
        let message = UserRegisteredMessage::from(event);
        let payload = serde_json::to_vec(&message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        let producer = self.factory.producer(&self.topic).await?;
        producer.publish(&event.user_id, &payload).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Producers connect lazily, so no broker is needed to build them.
    fn factory() -> KafkaProducerFactory {
        KafkaProducerFactory::new("localhost:9092", Duration::from_millis(500))
    }

    #[tokio::test]
    async fn test_producer_is_cached_per_topic() {
        let factory = factory();

        let first = factory.producer("user.registered").await.unwrap();
        let second = factory.producer("user.registered").await.unwrap();
        let other = factory.producer("user.deleted").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(other.topic(), "user.deleted");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_lookups_share_one_producer() {
        let factory = Arc::new(factory());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let factory = Arc::clone(&factory);
                tokio::spawn(async move { factory.producer("user.registered").await.unwrap() })
            })
            .collect();

        let mut producers = Vec::new();
        for handle in handles {
            producers.push(handle.await.unwrap());
        }

        for producer in &producers[1..] {
            assert!(Arc::ptr_eq(&producers[0], producer));
        }
    }

    #[tokio::test]
    async fn test_closed_factory_rejects_lookups() {
        let factory = factory();
        factory.producer("user.registered").await.unwrap();

        factory.close().await;

        assert!(matches!(
            factory.producer("user.registered").await,
            Err(KafkaProducerError::Closed)
        ));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_close_does_not_stall_the_runtime() {
        let factory = factory();
        let producer = factory.producer("user.registered").await.unwrap();
        // Queued for a broker that never answers, so flush waits for the message timeout.
        producer
            .producer
            .send_result(FutureRecord::to("user.registered").key("k").payload("v"))
            .map_err(|(e, _)| e)
            .unwrap();
        drop(producer);

        let ticks = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let ticker = {
            let ticks = Arc::clone(&ticks);
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    ticks.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                }
            })
        };

        let started = std::time::Instant::now();
        factory.close().await;
        let elapsed = started.elapsed();
        ticker.abort();

        if elapsed >= Duration::from_millis(200) {
            assert!(ticks.load(std::sync::atomic::Ordering::SeqCst) >= 5);
        }
        assert!(matches!(
            factory.producer("user.registered").await,
            Err(KafkaProducerError::Closed)
        ));
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            EventPublisherError::from(KafkaProducerError::SerializationError("x".into())),
            EventPublisherError::SerializationFailed(_)
        ));
        assert!(matches!(
            EventPublisherError::from(KafkaProducerError::Closed),
            EventPublisherError::ConnectionFailed(_)
        ));
    }
}
