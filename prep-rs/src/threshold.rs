//! Choosing where the measured epidemic starts.
use crate::{config::Config, prelude::*, series::MeasurementTable};
use log::*;
use std::fmt;

/// Result of a threshold scan: how many leading rows to drop, and which
/// threshold decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub offset: usize,
    pub column: Column,
    pub threshold: u64,
}

impl fmt::Display for Crossing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.threshold, self.column)
    }
}

/// Find the first row in which `column` reaches `n`.
///
/// Missing values never reach the threshold. A threshold that is never
/// reached is treated as reached on the first row, so nothing is dropped.
pub fn reached_threshold(table: &MeasurementTable, column: Column, n: u64) -> Crossing {
    let offset = table
        .column(column)
        .iter()
        .position(|value| matches!(value, Some(x) if *x > n as Real - 1.0))
        .unwrap_or(0);
    Crossing {
        offset,
        column,
        threshold: n,
    }
}

/// When the entity reached n confirmed cases.
pub fn reached_n_infections(table: &MeasurementTable, n: u64) -> Crossing {
    reached_threshold(table, Column::Confirmed, n)
}

/// When the entity reached n deaths.
pub fn reached_n_deaths(table: &MeasurementTable, n: u64) -> Crossing {
    reached_threshold(table, Column::Dead, n)
}

/// Pick the earliest of the infection and death crossings. Ties go to
/// infections.
pub fn find_start(table: &MeasurementTable, config: &Config) -> Crossing {
    let infections = reached_n_infections(table, config.start_at_infections());
    let deaths = reached_n_deaths(table, config.start_at_deaths());
    if deaths.offset < infections.offset {
        deaths
    } else {
        infections
    }
}

/// Drop every row before the earliest date that meets the infection or death
/// threshold of config.
pub fn truncate_initial(table: &MeasurementTable, config: &Config) -> (MeasurementTable, Crossing) {
    let crossing = find_start(table, config);
    match truncation_note(table, config, &crossing) {
        Some(note) => info!("{}", note),
        None => warn!("{} has no measurements to truncate", config.country()),
    }
    (table.slice_from(crossing.offset), crossing)
}

/// Describe which threshold chose the start of the data window, or None if
/// the table has no row at the crossing.
pub fn truncation_note(table: &MeasurementTable, config: &Config, crossing: &Crossing) -> Option<String> {
    table.date_at(crossing.offset).map(|date| {
        format!(
            "{} reached {} on {}; dropping preceding data",
            config.country(),
            crossing,
            date
        )
    })
}
