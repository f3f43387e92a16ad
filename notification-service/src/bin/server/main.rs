use std::sync::Arc;

use notification_service::config::Config;
use notification_service::domain::notification::service::WelcomeNotifier;
use notification_service::inbound::events::UserRegisteredConsumer;
use notification_service::outbound::mailer::LogMailer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notification_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "notification-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        kafka_brokers = %config.kafka.brokers,
        kafka_group_id = %config.kafka.group_id,
        kafka_topic = %config.kafka.user_registered_topic,
        mail_from = %config.mail.from_address,
        "Configuration loaded"
    );

    let mailer = Arc::new(LogMailer::new(config.mail.from_address.clone()));
    let notifier = Arc::new(WelcomeNotifier::new(mailer, config.mail.product_name.clone()));
    let consumer = UserRegisteredConsumer::new(&config.kafka, notifier)?;

    tracing::info!(
        consumer = "user_registered",
        topic = %config.kafka.user_registered_topic,
        "Starting Kafka user registration consumer"
    );

    tokio::select! {
        _ = consumer.start_consuming() => {
            tracing::warn!("Consumer stopped");
        }
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => tracing::info!("Shutdown signal received"),
                Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
            }
        }
    }

    tracing::info!("Service exited");

    Ok(())
}
