//! Spark API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p spark-api
//! ```
//!
//! Configuration is loaded from `config/spark.*` and `SPARK__*` environment variables.

use spark_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.server.address(),
        storage = if config.database.is_in_memory() { "memory" } else { "postgres" },
        "Configuration loaded"
    );

    if let Err(e) = spark_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
