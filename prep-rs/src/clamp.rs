//! Forcing cumulative counts to be monotonic.
//!
//! Data sources revise their numbers from time to time and a cumulative count
//! may go down from one day to the next. The functions here raise each value
//! to at least the previous (already clamped) value. Each step depends on the
//! previous result, so rows are processed strictly in date order.
use crate::{
    prelude::*,
    series::{Measurement, MeasurementTable},
};

/// Clamp a sequence so it never decreases.
///
/// Missing values are kept missing and the floor carries over to the next
/// present value.
pub fn clamp_series(values: &[Option<Real>]) -> Vec<Option<Real>> {
    let mut floor: Option<Real> = None;
    values
        .iter()
        .map(|value| {
            value.map(|x| {
                let x = floor.map_or(x, |f| x.max(f));
                floor = Some(x);
                x
            })
        })
        .collect()
}

/// Return a copy of the table in which no column ever decreases.
pub fn clamp_to_monotonic_increasing(table: &MeasurementTable) -> MeasurementTable {
    let columns: Vec<Vec<Option<Real>>> = Column::ALL
        .iter()
        .map(|col| clamp_series(&table.column(*col)))
        .collect();
    let rows = table.dates().enumerate().map(|(i, date)| {
        let mut row = Measurement::default();
        for col in Column::ALL.iter() {
            row.set(*col, columns[col.index()][i]);
        }
        (date, row)
    });
    MeasurementTable::from_rows(table.entity(), rows)
}

/// True if no column decreases along the date axis, ignoring gaps.
pub fn is_monotonic(table: &MeasurementTable) -> bool {
    Column::ALL.iter().all(|col| {
        let mut last = -INF;
        table.column(*col).into_iter().flatten().all(|x| {
            let ok = x >= last;
            last = x;
            ok
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn somes(xs: &[Real]) -> Vec<Option<Real>> {
        xs.iter().map(|x| Some(*x)).collect()
    }

    #[test]
    fn clamp_simple_sequence() {
        assert_eq!(clamp_series(&somes(&[5., 3., 8., 6.])), somes(&[5., 5., 8., 8.]));
        assert_eq!(clamp_series(&[]), vec![]);
    }

    #[test]
    fn clamp_uses_clamped_previous_value() {
        // 4 is compared to the clamped 9, not to the raw 2.
        assert_eq!(
            clamp_series(&somes(&[9., 2., 4., 10.])),
            somes(&[9., 9., 9., 10.])
        );
    }

    #[test]
    fn clamp_keeps_gaps() {
        let input = vec![Some(5.), None, Some(2.), Some(7.)];
        assert_eq!(clamp_series(&input), vec![Some(5.), None, Some(5.), Some(7.)]);
    }

    #[test]
    fn clamp_table_columns_independently() {
        let rows = vec![
            Measurement::new(5., 0., 2.),
            Measurement::new(3., 1., 1.),
            Measurement::new(8., 0., 4.),
            Measurement::new(6., 2., 3.),
        ];
        let table = MeasurementTable::from_rows(
            "Chile",
            rows.into_iter()
                .enumerate()
                .map(|(i, m)| (Date::from_ymd_opt(2020, 4, 1 + i as u32).unwrap(), m)),
        );
        assert!(!is_monotonic(&table));

        let out = clamp_to_monotonic_increasing(&table);
        assert!(is_monotonic(&out));
        assert_eq!(out.column(Column::Confirmed), somes(&[5., 5., 8., 8.]));
        assert_eq!(out.column(Column::Recovered), somes(&[0., 1., 1., 2.]));
        assert_eq!(out.column(Column::Dead), somes(&[2., 2., 4., 4.]));
        assert_eq!(out.entity(), "Chile");
        assert_eq!(out.dates().collect::<Vec<_>>(), table.dates().collect::<Vec<_>>());
    }

    #[test]
    fn clamp_table_keeps_gaps() {
        let mut dip = Measurement::new(4., 0., 1.);
        dip.recovered = None;
        let rows = vec![
            Measurement::new(5., 2., 1.),
            dip,
            Measurement::new(6., 1., 0.),
        ];
        let table = MeasurementTable::from_rows(
            "Chile",
            rows.into_iter()
                .enumerate()
                .map(|(i, m)| (Date::from_ymd_opt(2020, 4, 1 + i as u32).unwrap(), m)),
        );
        let out = clamp_to_monotonic_increasing(&table);
        assert_eq!(out.column(Column::Confirmed), somes(&[5., 5., 6.]));
        assert_eq!(out.column(Column::Recovered), vec![Some(2.), None, Some(2.)]);
        assert_eq!(out.column(Column::Dead), somes(&[1., 1., 1.]));
    }
}
