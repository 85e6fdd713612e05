//! Domain types and business logic for care metrics
//!
//! This module contains the reporting-period arithmetic, KPI calculations
//! and drill-down filters, all free of I/O.

pub mod filters;
pub mod metrics;
pub mod period;

pub use filters::{FilterColumn, FilterSet, FilterValue};
pub use metrics::*;
pub use period::*;
