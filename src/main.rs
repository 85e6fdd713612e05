use anyhow::Result;
use care_metrics::config::{LoggingSettings, Settings};
use care_metrics::infrastructure::log_messages;
use care_metrics::Application;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;
    init_tracing(&settings.logging);

    info!("{}", log_messages::application::SETTINGS_LOADED);

    let app = Application::from_settings(settings).await?;
    let report = app.run().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// `RUST_LOG` wins over the configured level when set
fn init_tracing(logging: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
