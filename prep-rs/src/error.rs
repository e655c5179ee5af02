use crate::prelude::Date;
use thiserror::Error;

/// Errors raised while preparing measurements or reshaping sampler output.
///
/// A threshold that is never reached is not an error: truncation simply keeps
/// the whole series.
#[derive(Error, Debug)]
pub enum Error {
    #[error("entity not found: no row with region label {entity:?}")]
    EntityNotFound { entity: String },

    #[error("column not found: {column:?}")]
    ColumnNotFound { column: String },

    #[error("column {column:?} is not a date in format {format:?}")]
    InvalidDate { column: String, format: String },

    #[error("invalid value {value:?} at column {column:?}")]
    InvalidValue { column: String, value: String },

    #[error("date {0} appears more than once")]
    DuplicateDate(Date),

    #[error("expected {expected} columns, found {found}")]
    ColumnCountMismatch { expected: usize, found: usize },

    #[error("{count} {prefix:?} columns cannot be split into {parts} series")]
    NotDivisible {
        prefix: String,
        count: usize,
        parts: usize,
    },

    #[error("no chains were given")]
    EmptyChains,

    #[error("invalid array shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn column_not_found(column: &str) -> Self {
        Error::ColumnNotFound {
            column: column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
