//! Application services and report orchestration
//!
//! This module coordinates the period resolver, the KPI calculations and
//! the metrics store behind the dashboard.

pub mod app;
pub mod cache;
pub mod dashboard;

pub use app::{Application, DashboardReport, DimensionBreakdown};
pub use cache::QueryCache;
pub use dashboard::DashboardService;
