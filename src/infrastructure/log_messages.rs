//! Log message constants for infrastructure components
//!
//! This module centralizes the log messages used by the service and store
//! so wording stays consistent across the crate.

/// Application startup and lifecycle messages
pub mod application {
    pub const STARTING: &str = "Starting care metrics report";
    pub const SETTINGS_LOADED: &str = "Configuration loaded successfully";
    pub const REPORT_COMPLETED: &str = "Report completed";
}

/// Database-related log messages
pub mod database {
    pub const HEALTH_CHECK_FAILED: &str = "Database health check failed";
    pub const CONNECTION_ESTABLISHED: &str = "Database connection established";
    pub const SCHEMA_STARTED: &str = "Creating metrics schema";
    pub const SCHEMA_COMPLETED: &str = "Metrics schema ready";
}

/// Metrics store query messages
pub mod store {
    pub const TOTALS_QUERIED: &str = "Queried member-month totals";
    pub const MONTHLY_QUERIED: &str = "Queried monthly metrics";
    pub const BREAKDOWN_QUERIED: &str = "Queried dimension breakdown";
    pub const DEMOGRAPHICS_QUERIED: &str = "Queried population demographics";
    pub const RISK_SCORES_QUERIED: &str = "Queried risk scores";
}

/// Dashboard orchestration messages
pub mod dashboard {
    pub const COMPARISON_RESOLVED: &str = "Resolved comparison range";
    pub const UNKNOWN_STRATEGY: &str =
        "Unrecognized comparison period, comparing the range against itself";
    pub const CACHE_HIT: &str = "Query cache hit";
    pub const CACHE_MISS: &str = "Query cache miss";
    pub const CACHE_INVALIDATED: &str = "Query caches cleared";
}
