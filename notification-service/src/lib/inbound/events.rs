pub mod messages;
pub mod user_registered_consumer;

pub use user_registered_consumer::UserRegisteredConsumer;
pub use user_registered_consumer::UserRegisteredHandler;
