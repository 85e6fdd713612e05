//! Drill-down filters applied to claims queries
//!
//! Only the columns named by [`FilterColumn`] ever appear in SQL text.
//! Filter values are always bound as query parameters.

use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A claims attribute the dashboard can filter or break down by
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterColumn {
    EncounterGroup,
    EncounterType,
    CcsrCategoryDescription,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 3] = [
        Self::EncounterGroup,
        Self::EncounterType,
        Self::CcsrCategoryDescription,
    ];

    /// Qualified column expression in the claims query
    pub fn sql_column(&self) -> &'static str {
        match self {
            Self::EncounterGroup => "grp.ENCOUNTER_GROUP",
            Self::EncounterType => "typ.ENCOUNTER_TYPE",
            Self::CcsrCategoryDescription => "clm.CCSR_CATEGORY_DESCRIPTION",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EncounterGroup => "ENCOUNTER_GROUP",
            Self::EncounterType => "ENCOUNTER_TYPE",
            Self::CcsrCategoryDescription => "CCSR_CATEGORY_DESCRIPTION",
        }
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A selected dimension value, e.g. `"Inpatient"`
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
    derive(
        Debug,
        Clone,
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
pub struct FilterValue(String);

/// Equality filters keyed by column, iterated in a stable order
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSet(BTreeMap<FilterColumn, FilterValue>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: FilterColumn, value: FilterValue) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a filter, replacing any previous value for the column
    pub fn insert(&mut self, column: FilterColumn, value: FilterValue) -> Option<FilterValue> {
        self.0.insert(column, value)
    }

    pub fn remove(&mut self, column: FilterColumn) -> Option<FilterValue> {
        self.0.remove(&column)
    }

    pub fn get(&self, column: FilterColumn) -> Option<&FilterValue> {
        self.0.get(&column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterColumn, &FilterValue)> {
        self.0.iter().map(|(column, value)| (*column, value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `AND col = ?` fragments in iteration order, for appending to a WHERE clause
    pub fn sql_conditions(&self) -> String {
        self.0
            .keys()
            .map(|column| format!(" AND {} = ?", column.sql_column()))
            .collect()
    }
}
