use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for notification-service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub kafka: KafkaConfig,
    pub mail: MailConfig,
}

/// Kafka consumer configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub group_id: String,
    #[serde(default = "default_user_registered_topic")]
    pub user_registered_topic: String,
}

/// Outgoing mail configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub from_address: String,
    #[serde(default = "default_product_name")]
    pub product_name: String,
}

fn default_user_registered_topic() -> String {
    "user.registered".to_string()
}

fn default_product_name() -> String {
    "our platform".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (KAFKA__BROKERS, MAIL__FROM_ADDRESS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// Returns error if required configuration values are missing or invalid
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: KAFKA__GROUP_ID=... overrides kafka.group_id
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kafka.group_id.trim().is_empty() {
            return Err(ConfigError::Message(
                "kafka.group_id must not be empty".to_string(),
            ));
        }
        if self.mail.from_address.trim().is_empty() {
            return Err(ConfigError::Message(
                "mail.from_address must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
