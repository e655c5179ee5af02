//! Date-indexed series and measurement tables.
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap};

/// An ordered map from date to an optional value.
///
/// `None` marks a gap: a date inside the range of the series with no data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    data: BTreeMap<Date, Option<Real>>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at date, if the date is present and not a gap.
    pub fn get(&self, date: Date) -> Option<Real> {
        self.data.get(&date).copied().flatten()
    }

    pub fn insert(&mut self, date: Date, value: Option<Real>) {
        self.data.insert(date, value);
    }

    pub fn first_date(&self) -> Option<Date> {
        self.data.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<Date> {
        self.data.keys().next_back().copied()
    }

    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.data.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = Option<Real>> + '_ {
        self.data.values().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Date, Option<Real>> {
        self.data.iter()
    }
}

impl From<BTreeMap<Date, Option<Real>>> for Series {
    fn from(data: BTreeMap<Date, Option<Real>>) -> Self {
        Series { data }
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = (&'a Date, &'a Option<Real>);
    type IntoIter = btree_map::Iter<'a, Date, Option<Real>>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Cumulative counts of a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub confirmed: Option<Real>,
    pub recovered: Option<Real>,
    pub dead: Option<Real>,
}

impl Measurement {
    pub fn new(confirmed: Real, recovered: Real, dead: Real) -> Self {
        Measurement {
            confirmed: Some(confirmed),
            recovered: Some(recovered),
            dead: Some(dead),
        }
    }

    pub fn get(&self, col: Column) -> Option<Real> {
        match col {
            Column::Confirmed => self.confirmed,
            Column::Recovered => self.recovered,
            Column::Dead => self.dead,
        }
    }

    pub fn set(&mut self, col: Column, value: Option<Real>) {
        match col {
            Column::Confirmed => self.confirmed = value,
            Column::Recovered => self.recovered = value,
            Column::Dead => self.dead = value,
        }
    }

    pub fn as_array(&self) -> [Option<Real>; 3] {
        [self.confirmed, self.recovered, self.dead]
    }
}

/// The prepared measurements of a single entity, indexed by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    entity: String,
    rows: BTreeMap<Date, Measurement>,
}

impl MeasurementTable {
    pub fn new(entity: &str) -> Self {
        MeasurementTable {
            entity: entity.to_string(),
            rows: BTreeMap::new(),
        }
    }

    /// Outer join of three series on their dates. A date missing from one of
    /// the series leaves that field empty.
    pub fn from_series(entity: &str, confirmed: &Series, recovered: &Series, dead: &Series) -> Self {
        let mut table = MeasurementTable::new(entity);
        for (col, series) in Column::ALL.iter().zip(&[confirmed, recovered, dead]) {
            for (date, value) in series.iter() {
                table.rows.entry(*date).or_default().set(*col, *value);
            }
        }
        return table;
    }

    /// Build table from (date, row) pairs. Later duplicates override earlier ones.
    pub fn from_rows(entity: &str, rows: impl IntoIterator<Item = (Date, Measurement)>) -> Self {
        MeasurementTable {
            entity: entity.to_string(),
            rows: rows.into_iter().collect(),
        }
    }

    /// Name of the entity these measurements belong to.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, date: Date) -> Option<&Measurement> {
        self.rows.get(&date)
    }

    pub fn first_date(&self) -> Option<Date> {
        self.rows.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<Date> {
        self.rows.keys().next_back().copied()
    }

    /// Date of the i-th row.
    pub fn date_at(&self, i: usize) -> Option<Date> {
        self.rows.keys().nth(i).copied()
    }

    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.rows.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Date, Measurement> {
        self.rows.iter()
    }

    /// Values of a single column in date order.
    pub fn column(&self, col: Column) -> Vec<Option<Real>> {
        self.rows.values().map(|m| m.get(col)).collect()
    }

    /// A copy of the table without its first `offset` rows.
    pub fn slice_from(&self, offset: usize) -> Self {
        MeasurementTable {
            entity: self.entity.clone(),
            rows: self
                .rows
                .iter()
                .skip(offset)
                .map(|(d, m)| (*d, *m))
                .collect(),
        }
    }

    /// Caption used when charting this table.
    pub fn title(&self, population: Option<u64>) -> String {
        match population {
            Some(n) => format!(
                "Coronavirus over time in {} (total population {})",
                self.entity, n
            ),
            None => format!("Coronavirus over time in {}", self.entity),
        }
    }

    /// Render table as CSV data. Dates are ISO formatted and missing values
    /// are left empty.
    pub fn render_csv(&self, sep: char) -> String {
        let mut data = format!("date{}{}", sep, Column::CSV_HEADER.replace(',', &sep.to_string()));
        for (date, row) in self.rows.iter() {
            data.push('\n');
            data.push_str(&date.format("%Y-%m-%d").to_string());
            for value in row.as_array().iter() {
                data.push(sep);
                if let Some(x) = value {
                    data.push_str(&format!("{}", x));
                }
            }
        }
        return data;
    }

    /// Read a table written by render_csv() with a comma separator.
    pub fn read_csv<R: std::io::Read>(entity: &str, rdr: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(rdr);
        let mut table = MeasurementTable::new(entity);
        for record in reader.records() {
            let record = record?;
            let label = record.get(0).unwrap_or("");
            let date = crate::table::parse_date(label, "%Y-%m-%d")?;
            let mut row = Measurement::default();
            for col in Column::ALL.iter() {
                let cell = record.get(col.index() + 1).unwrap_or("").trim();
                if !cell.is_empty() {
                    let x = cell.parse::<Real>().map_err(|_| Error::InvalidValue {
                        column: col.name().to_string(),
                        value: cell.to_string(),
                    })?;
                    row.set(*col, Some(x));
                }
            }
            table.rows.insert(date, row);
        }
        Ok(table)
    }
}

impl<'a> IntoIterator for &'a MeasurementTable {
    type Item = (&'a Date, &'a Measurement);
    type IntoIter = btree_map::Iter<'a, Date, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
