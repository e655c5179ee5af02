use crate::{prelude::*, table::RawTable};
use getset::{CopyGetters, Getters, Setters};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

pub const REGION_COLUMN: &str = "Country/Region";
pub const DATE_FORMAT: &str = "%m/%d/%y";

/// Parameters that select and trim the measurements of a single entity.
///
/// Every field has a default, so a TOML document only needs the keys it wants
/// to override.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Getters, CopyGetters, Setters)]
#[serde(default)]
pub struct Config {
    /// Region label to extract.
    #[getset(get = "pub", set = "pub")]
    country: String,

    /// Label of the first date column. Everything before it is metadata.
    #[getset(get = "pub", set = "pub")]
    start_index: String,

    /// Keep data from the first day with at least this many confirmed cases...
    #[getset(get_copy = "pub", set = "pub")]
    start_at_infections: u64,

    /// ...or from the first day with at least this many deaths, whichever
    /// comes first.
    #[getset(get_copy = "pub", set = "pub")]
    start_at_deaths: u64,

    #[getset(get = "pub", set = "pub")]
    region_column: String,

    /// chrono format string used to parse date headers.
    #[getset(get = "pub", set = "pub")]
    date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            country: String::new(),
            start_index: "1/22/20".to_string(),
            start_at_infections: 100,
            start_at_deaths: 10,
            region_column: REGION_COLUMN.to_string(),
            date_format: DATE_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Create config for country with default thresholds.
    pub fn new(country: &str) -> Self {
        Config {
            country: country.to_string(),
            ..Config::default()
        }
    }

    /// Builder-style version of set_start_at_infections/set_start_at_deaths.
    pub fn with_thresholds(mut self, infections: u64, deaths: u64) -> Self {
        self.start_at_infections = infections;
        self.start_at_deaths = deaths;
        self
    }

    pub fn with_start_index(mut self, start_index: &str) -> Self {
        self.start_index = start_index.to_string();
        self
    }

    pub fn from_toml(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Config::from_toml(&data)
    }

    /// Check that the columns named by this config exist in the raw table.
    ///
    /// The region column must exist and the start column must be one of the
    /// columns that follow it.
    pub fn validate(&self, table: &RawTable) -> Result<()> {
        table.locate(self).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let cfg = Config::new("Italy").with_thresholds(50, 5);
        let data = toml::to_string(&cfg).unwrap();
        let cfg_: Config = toml::from_str(&data).unwrap();
        assert_eq!(cfg, cfg_);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = Config::from_toml("country = \"Brazil\"\nstart_at_deaths = 1\n").unwrap();
        assert_eq!(cfg.country(), "Brazil");
        assert_eq!(cfg.start_at_deaths(), 1);
        assert_eq!(cfg.start_at_infections(), 100);
        assert_eq!(cfg.region_column(), REGION_COLUMN);
    }

    #[test]
    fn rejects_bad_toml() {
        let res = Config::from_toml("start_at_deaths = \"many\"");
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    fn validate_columns() {
        let data = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,Chile,0,0,1,2\n";
        let table = RawTable::from_reader(data.as_bytes()).unwrap();
        let cfg = Config::new("Chile");
        assert!(cfg.validate(&table).is_ok());

        let cfg = Config::new("Chile").with_start_index("3/1/20");
        match cfg.validate(&table) {
            Err(Error::ColumnNotFound { column }) => assert_eq!(column, "3/1/20"),
            other => panic!("unexpected result: {:?}", other),
        }

        let cfg = Config::new("Chile").with_start_index("Province/State");
        assert!(cfg.validate(&table).is_err());

        let mut cfg = Config::new("Chile");
        cfg.set_region_column("Country".to_string());
        assert!(cfg.validate(&table).is_err());
    }
}
