use crate::{
    clamp::clamp_to_monotonic_increasing,
    config::Config,
    prelude::*,
    series::MeasurementTable,
    table::RawTable,
    threshold::truncate_initial,
};
use log::*;

/// Form the combined measurement table of a single entity.
///
/// The entity is extracted from each raw table, which fails if config names
/// columns the table does not have. The three series are joined by date, the rows before the start
/// threshold are dropped and the remaining counts are clamped so they never
/// decrease.
pub fn form_table(
    config: &Config,
    confirmed: &RawTable,
    recovered: &RawTable,
    dead: &RawTable,
) -> Result<MeasurementTable> {
    let c0 = confirmed.extract(config)?;
    let r0 = recovered.extract(config)?;
    let d0 = dead.extract(config)?;
    let data = MeasurementTable::from_series(config.country(), &c0, &r0, &d0);
    debug!(
        "{}: {} dates from {:?} to {:?}",
        config.country(),
        data.len(),
        data.first_date(),
        data.last_date()
    );

    let (data, _) = truncate_initial(&data, config);
    Ok(clamp_to_monotonic_increasing(&data))
}
