//! Wide-format raw tables: one row per region, one column per date.
use crate::{config::Config, prelude::*, series::Series};
use csv::StringRecord;
use log::*;
use std::{collections::BTreeMap, io, path::Path};

/// A raw wide table as published by the data source.
///
/// The leading columns hold metadata (province, region label, coordinates...)
/// and the remaining columns hold one cumulative count per date. Cells are
/// kept as text and only parsed on extraction, since which columns are dates
/// depends on the configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    header: Vec<String>,
    rows: Vec<StringRecord>,
}

impl RawTable {
    pub fn new(header: Vec<String>, rows: Vec<StringRecord>) -> Self {
        RawTable { header, rows }
    }

    /// Read a CSV table with a header line.
    pub fn from_reader<R: io::Read>(rdr: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(rdr);
        let header = reader.headers()?.iter().map(String::from).collect();
        let rows = reader.records().collect::<csv::Result<Vec<_>>>()?;
        Ok(RawTable { header, rows })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(target: "table", "reading {}", path.display());
        let file = std::fs::File::open(path)?;
        RawTable::from_reader(io::BufReader::new(file))
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first column with the given label.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Iterate over rows whose `column` equals `label`.
    pub fn rows_matching<'a>(
        &'a self,
        column: usize,
        label: &'a str,
    ) -> impl Iterator<Item = &'a StringRecord> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.get(column) == Some(label))
    }

    /// Positions of the region label column and of the first date column
    /// named by config. The start column must come after the region column.
    pub fn locate(&self, config: &Config) -> Result<(usize, usize)> {
        let region = self
            .column_index(config.region_column())
            .ok_or_else(|| Error::column_not_found(config.region_column()))?;
        match self.column_index(config.start_index()) {
            Some(start) if start > region => Ok((region, start)),
            _ => Err(Error::column_not_found(config.start_index())),
        }
    }

    /// Extract the series of a single entity.
    ///
    /// Rows matching the configured country are summed column by column
    /// starting at `config.start_index`. A date missing in any of the matching
    /// rows is missing in the sum. Missing dates at both edges are dropped
    /// while gaps in the middle are kept.
    pub fn extract(&self, config: &Config) -> Result<Series> {
        let (region, start) = self.locate(config)?;

        let rows: Vec<&StringRecord> = self.rows_matching(region, config.country()).collect();
        if rows.is_empty() {
            return Err(Error::EntityNotFound {
                entity: config.country().clone(),
            });
        }

        let mut dates = Vec::with_capacity(self.header.len() - start);
        let mut values = Vec::with_capacity(self.header.len() - start);
        for (j, label) in self.header.iter().enumerate().skip(start) {
            dates.push(parse_date(label, config.date_format())?);

            let mut acc: Option<Real> = Some(0.0);
            for row in rows.iter() {
                let cell = parse_cell(row.get(j).unwrap_or(""), label)?;
                acc = acc.and_then(|total| cell.map(|x| total + x));
            }
            values.push(acc);
        }

        let first = values.iter().position(Option::is_some);
        let last = values.iter().rposition(Option::is_some);
        let mut data = BTreeMap::new();
        if let (Some(first), Some(last)) = (first, last) {
            for (date, value) in dates[first..=last].iter().zip(&values[first..=last]) {
                if data.insert(*date, *value).is_some() {
                    return Err(Error::DuplicateDate(*date));
                }
            }
        }
        debug!(
            target: "table",
            "extracted {} rows for {:?}: {} dates kept out of {}",
            rows.len(),
            config.country(),
            data.len(),
            dates.len()
        );
        Ok(Series::from(data))
    }
}

/// Parse a date header using a chrono format string.
pub fn parse_date(label: &str, format: &str) -> Result<Date> {
    Date::parse_from_str(label, format).map_err(|_| Error::InvalidDate {
        column: label.to_string(),
        format: format.to_string(),
    })
}

/// Parse a single numeric cell. Empty cells and NaNs are missing values.
fn parse_cell(cell: &str, column: &str) -> Result<Option<Real>> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    cell.parse::<Real>()
        .map(Some)
        .map_err(|_| Error::InvalidValue {
            column: column.to_string(),
            value: cell.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIRMED: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20,1/25/20,1/26/20,1/27/20
,Chile,-35.6,-71.5,,0,5,12,20,
Ontario,Canada,51.2,-85.3,,1,2,,4,
British Columbia,Canada,53.7,-127.6,,0,1,,3,
,Peru,-9.1,-75.0,nan,0,0,1,1,2
";

    fn table() -> RawTable {
        RawTable::from_reader(CONFIRMED.as_bytes()).unwrap()
    }

    fn date(m: u32, d: u32) -> Date {
        Date::from_ymd_opt(2020, m, d).unwrap()
    }

    #[test]
    fn reads_header_and_rows() {
        let t = table();
        assert_eq!(t.nrows(), 4);
        assert_eq!(t.column_index("Country/Region"), Some(1));
        assert_eq!(t.column_index("1/22/20"), Some(4));
        assert_eq!(t.header().len(), 10);
    }

    #[test]
    fn extract_trims_edges() {
        let series = table().extract(&Config::new("Chile")).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.first_date(), Some(date(1, 23)));
        assert_eq!(series.last_date(), Some(date(1, 26)));
        assert_eq!(
            series.values().collect::<Vec<_>>(),
            vec![Some(0.0), Some(5.0), Some(12.0), Some(20.0)]
        );
    }

    #[test]
    fn extract_sums_subregions_and_keeps_gaps() {
        let series = table().extract(&Config::new("Canada")).unwrap();
        assert_eq!(
            series.values().collect::<Vec<_>>(),
            vec![Some(1.0), Some(3.0), None, Some(7.0)]
        );
        assert_eq!(series.get(date(1, 25)), None);
    }

    #[test]
    fn partial_subregion_reports_are_missing() {
        let data = "\
Province/State,Country/Region,1/22/20,1/23/20,1/24/20,1/25/20
Ontario,Canada,100,,110,120
British Columbia,Canada,50,55,60,
";
        let t = RawTable::from_reader(data.as_bytes()).unwrap();
        let series = t.extract(&Config::new("Canada")).unwrap();
        // 1/23 only has British Columbia and 1/25 only has Ontario.
        assert_eq!(
            series.values().collect::<Vec<_>>(),
            vec![Some(150.0), None, Some(170.0)]
        );
        assert_eq!(series.last_date(), Some(date(1, 24)));
    }

    #[test]
    fn extract_from_later_start() {
        let cfg = Config::new("Peru").with_start_index("1/25/20");
        let series = table().extract(&cfg).unwrap();
        assert_eq!(series.first_date(), Some(date(1, 25)));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn extract_is_idempotent() {
        let t = table();
        let cfg = Config::new("Canada");
        assert_eq!(t.extract(&cfg).unwrap(), t.extract(&cfg).unwrap());
    }

    #[test]
    fn missing_entity() {
        match table().extract(&Config::new("Atlantis")) {
            Err(Error::EntityNotFound { entity }) => assert_eq!(entity, "Atlantis"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_start_column() {
        let cfg = Config::new("Chile").with_start_index("2/30/20");
        assert!(matches!(
            table().extract(&cfg),
            Err(Error::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn bad_cells_and_headers() {
        let data = "Country/Region,1/22/20,1/23/20\nChile,1,lots\n";
        let t = RawTable::from_reader(data.as_bytes()).unwrap();
        match t.extract(&Config::new("Chile")) {
            Err(Error::InvalidValue { column, value }) => {
                assert_eq!(column, "1/23/20");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let data = "Country/Region,1/22/20,total\nChile,1,2\n";
        let t = RawTable::from_reader(data.as_bytes()).unwrap();
        assert!(matches!(
            t.extract(&Config::new("Chile")),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn duplicated_dates() {
        let data = "Country/Region,1/22/20,01/22/20\nChile,1,2\n";
        let t = RawTable::from_reader(data.as_bytes()).unwrap();
        assert!(matches!(
            t.extract(&Config::new("Chile")),
            Err(Error::DuplicateDate(_))
        ));
    }
}
