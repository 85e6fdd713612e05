//! Constants for KPI calculations

/// Scaling factors applied to raw ratios
pub mod ratios {
    /// Months per year times members per thousand, for PKPY
    pub const PER_THOUSAND_PER_YEAR: f64 = 12_000.0;

    /// Multiplier converting a fractional change to percentage points
    pub const PERCENT: f64 = 100.0;
}

/// Labels used for dimension breakdowns
pub mod labels {
    /// Category used for claims with no dimension value
    pub const UNCATEGORIZED: &str = "other";
}
