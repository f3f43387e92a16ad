use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub kafka: KafkaConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Deadline applied to every identity store call.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Port of the listener serving trusted internal lookups.
    pub internal_port: u16,
    #[serde(default = "default_internal_host")]
    pub internal_host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: i64,
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    #[serde(default = "default_user_registered_topic")]
    pub user_registered_topic: String,
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,
    /// Deadline applied to the best-effort event publish after registration.
    #[serde(default = "default_publish_timeout_ms")]
    pub publish_timeout_ms: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_internal_host() -> String {
    "127.0.0.1".to_string()
}

fn default_query_timeout_ms() -> u64 {
    5_000
}

fn default_issuer() -> String {
    "app".to_string()
}

fn default_access_ttl_secs() -> i64 {
    15 * 60
}

fn default_refresh_ttl_secs() -> i64 {
    30 * 24 * 60 * 60
}

fn default_user_registered_topic() -> String {
    "user.registered".to_string()
}

fn default_message_timeout_ms() -> u64 {
    5_000
}

fn default_publish_timeout_ms() -> u64 {
    3_000
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings that would produce an unusable token manager.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret is required and must not be empty".to_string(),
            ));
        }
        if self.server.internal_port == self.server.http_port {
            return Err(ConfigError::Message(
                "server.internal_port must differ from server.http_port".to_string(),
            ));
        }
        if self.jwt.access_ttl_secs <= 0 || self.jwt.refresh_ttl_secs <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_ttl_secs and jwt.refresh_ttl_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.database.query_timeout_ms)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.kafka.publish_timeout_ms)
    }

    pub fn token_config(&self) -> auth::TokenConfig {
        auth::TokenConfig {
            secret: self.jwt.secret.as_bytes().to_vec(),
            issuer: self.jwt.issuer.clone(),
            access_ttl: chrono::Duration::seconds(self.jwt.access_ttl_secs),
            refresh_ttl: chrono::Duration::seconds(self.jwt.refresh_ttl_secs),
        }
    }
}
