pub mod messages;
pub mod producer;

pub use producer::KafkaEventPublisher;
pub use producer::KafkaProducerFactory;
