//! Period-over-period change values
//!
//! A KPI card shows the relative change between the primary and comparison
//! values along with an up or down marker.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::ratios::PERCENT;

/// Relative change between a current and a comparison value
///
/// Always finite. A zero comparison value produces no change rather than an
/// infinite one.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct PercentageChange(f64);

impl PercentageChange {
    /// No change (0%)
    pub fn none() -> Self {
        Self(0.0)
    }

    /// `(current - comparison) / comparison`, or no change when `comparison` is zero
    pub fn between(current: f64, comparison: f64) -> Self {
        if comparison == 0.0 {
            return Self::none();
        }
        let change = (current - comparison) / comparison;
        if change.is_finite() {
            Self(change)
        } else {
            Self::none()
        }
    }

    pub fn into_inner(self) -> f64 {
        self.0
    }

    /// Convert to percentage points (multiply by 100)
    pub fn as_percentage_points(&self) -> f64 {
        self.0 * PERCENT
    }

    pub fn direction(&self) -> ChangeDirection {
        ChangeDirection::from_change(self.0)
    }
}

impl fmt::Display for PercentageChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.1}%", self.as_percentage_points())
    }
}

/// Direction marker for a change; zero counts as up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeDirection {
    Up,
    Down,
}

impl ChangeDirection {
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
        }
    }
}

impl fmt::Display for ChangeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}
