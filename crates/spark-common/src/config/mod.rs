//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, DeliveryConfig,
    Environment, RateLimitConfig, ServerConfig, SnowflakeConfig, StorageConfig,
};
