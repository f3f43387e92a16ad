use std::sync::Arc;

use auth::Argon2PasswordHasher;
use auth::JwtTokenManager;
use identity_service::config::Config;
use identity_service::domain::identity::service::CredentialService;
use identity_service::domain::identity::service::ServiceTimeouts;
use identity_service::inbound::http::router::create_internal_router;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::events::KafkaEventPublisher;
use identity_service::outbound::events::KafkaProducerFactory;
use identity_service::outbound::repositories::PostgresIdentityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        internal_port = config.server.internal_port,
        kafka_brokers = %config.kafka.brokers,
        kafka_topic = %config.kafka.user_registered_topic,
        jwt_issuer = %config.jwt.issuer,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let producer_factory = Arc::new(KafkaProducerFactory::from_config(&config.kafka));
    let event_publisher = Arc::new(KafkaEventPublisher::new(
        Arc::clone(&producer_factory),
        config.kafka.user_registered_topic.clone(),
    ));
    let identity_repository = Arc::new(PostgresIdentityRepository::new(pg_pool));
    let password_hasher = Arc::new(Argon2PasswordHasher::new());

    let credential_service = Arc::new(
        CredentialService::new(identity_repository, event_publisher, password_hasher)
            .with_timeouts(ServiceTimeouts {
                store: config.query_timeout(),
                publish: config.publish_timeout(),
            }),
    );
    let token_manager = Arc::new(JwtTokenManager::new(config.token_config()));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(credential_service.clone(), token_manager);

    let internal_address = format!(
        "{}:{}",
        config.server.internal_host, config.server.internal_port
    );
    let internal_listener = tokio::net::TcpListener::bind(&internal_address).await?;
    tracing::info!(
        address = %internal_address,
        port = config.server.internal_port,
        protocol = "http",
        "Internal server listening"
    );

    let internal_application = create_internal_router(credential_service);

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(());
    let mut internal_shutdown = shutdown_rx.clone();
    let mut http_shutdown = shutdown_rx;

    let http_server = tokio::spawn(async move {
        axum::serve(http_listener, http_application)
            .with_graceful_shutdown(async move {
                let _ = http_shutdown.changed().await;
            })
            .await
    });
    let internal_server = tokio::spawn(async move {
        axum::serve(internal_listener, internal_application)
            .with_graceful_shutdown(async move {
                let _ = internal_shutdown.changed().await;
            })
            .await
    });

    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(());
    });

    match tokio::try_join!(http_server, internal_server) {
        Ok((http_result, internal_result)) => {
            http_result?;
            internal_result?;
        }
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    };

    producer_factory.close().await;
    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
