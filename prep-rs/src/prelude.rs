use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::error::{Error, Result};
pub use crate::Real;
pub(crate) use crate::{INF, NAN};

/// Calendar day used to index every table in this crate.
pub type Date = chrono::NaiveDate;

/// The three cumulative counts tracked for each entity.
///
/// The order of variants is meaningful: it is the column order of measurement
/// tables, the middle axis of posterior arrays and the tie-breaking order
/// when choosing a truncation threshold.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum Column {
    Confirmed,
    Recovered,
    Dead,
}

impl Column {
    pub const CARDINALITY: usize = 3;
    pub const ALL: [Column; 3] = [Column::Confirmed, Column::Recovered, Column::Dead];
    pub const CSV_HEADER: &'static str = "Confirmed,Recovered,Dead";

    /// Position of column in tables and arrays.
    pub fn index(self) -> usize {
        match self {
            Column::Confirmed => 0,
            Column::Recovered => 1,
            Column::Dead => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Column> {
        Column::ALL.get(i).copied()
    }

    /// Find column from its display name.
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Confirmed => "Confirmed",
            Column::Recovered => "Recovered",
            Column::Dead => "Dead",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
