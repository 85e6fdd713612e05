//! Infrastructure layer for care metrics
//!
//! SQLite access and the fact-table queries behind the dashboard KPIs.

pub mod database;
pub mod log_messages;
pub mod metrics_store;

pub use database::Database;
pub use metrics_store::{MetricsStore, SqliteMetricsStore};
