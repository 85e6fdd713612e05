use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use nutype::nutype;
use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub report: ReportSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub environment: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub path: String,
    pub max_connections: u32,
}

impl DatabaseSettings {
    /// Connection URL that creates the file on first use
    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

/// Number of query results kept by each dashboard cache
#[nutype(
    validate(greater = 0, less_or_equal = 1024),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct CacheCapacity(usize);

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    pub capacity: CacheCapacity,
}

/// Report run by the binary
#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    pub start_date: String,
    pub end_date: String,
    pub comparison_period: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = Self::defaults(&environment)?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("CARE_METRICS").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Load defaults overlaid with a single explicit file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::defaults("development")?
            .add_source(File::from(path.as_ref()))
            .build()?;

        config.try_deserialize()
    }

    fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("application.environment", environment)?
            .set_default("database.path", "cache_database.db")?
            .set_default("database.max_connections", 5)?
            .set_default("cache.capacity", 2)?
            .set_default("report.start_date", "2024-01-01")?
            .set_default("report.end_date", "2024-12-31")?
            .set_default("report.comparison_period", "Same Period Last Year")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")
    }

    pub fn database_url(&self) -> String {
        self.database.url()
    }
}
