//! Preparation of per-country COVID-19 measurement tables.
//!
//! Raw JHU-style wide tables go in, a clamped `date -> (Confirmed, Recovered,
//! Dead)` table comes out, ready to be handed to a sampler or a plotting layer.
//! The `posterior` module takes the sampler output back and reshapes it into
//! per-metric time series.
pub mod assembly;
pub mod clamp;
pub mod config;
pub mod error;
pub mod posterior;
pub mod prelude;
pub mod series;
pub mod table;
pub mod threshold;
pub mod utils;

pub use crate::assembly::form_table;
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::series::{Measurement, MeasurementTable, Series};
pub use crate::table::RawTable;
pub use crate::threshold::{truncate_initial, Crossing};

/// Base Real type used by this crate. Uses an alias to easily change precision
/// if necessary.
pub type Real = f64;
pub(crate) const INF: Real = Real::INFINITY;
pub(crate) const NAN: Real = Real::NAN;
