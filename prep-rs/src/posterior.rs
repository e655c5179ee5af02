//! Reshaping and summarizing sampler output.
//!
//! The sampler writes one CSV per chain, CmdStan style: comment lines start
//! with '#', the header names every parameter and each record is a draw.
//! Posterior predictive draws are named `y_hat.<day>.<metric>` and laid out so
//! that, in row-major order, all days of a metric are contiguous.
use crate::{
    prelude::*,
    series::MeasurementTable,
    utils::{PointStats, PointStatsAcc, Stats},
};
use log::*;
use ndarray::{s, Array2, Array3, ArrayView2, Axis};
use std::{io, path::Path};

pub const Y_HAT: &str = "y_hat";
pub const LOG_LIKELIHOOD: &str = "log_likelihood";
pub const ENERGY: &str = "energy__";

/// Chains with E-BFMI below this value are reported.
pub const BFMI_THRESHOLD: Real = 0.5;

/// Read the draws of a single chain. Returns the parameter names and a
/// (draws, parameters) array.
pub fn read_stan_csv<R: io::Read>(rdr: R) -> Result<(Vec<String>, Array2<Real>)> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let names: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut data = Vec::new();
    let mut nrows = 0;
    for record in reader.records() {
        let record = record?;
        if record.len() != names.len() {
            return Err(Error::ColumnCountMismatch {
                expected: names.len(),
                found: record.len(),
            });
        }
        for (name, cell) in names.iter().zip(record.iter()) {
            let x = cell.parse::<Real>().map_err(|_| Error::InvalidValue {
                column: name.clone(),
                value: cell.to_string(),
            })?;
            data.push(x);
        }
        nrows += 1;
    }
    let ncols = names.len();
    Ok((names, Array2::from_shape_vec((nrows, ncols), data)?))
}

/// Posterior draws as a (draws, chains, parameters) tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Draws {
    names: Vec<String>,
    sample: Array3<Real>,
}

impl Draws {
    pub fn new(names: Vec<String>, sample: Array3<Real>) -> Result<Self> {
        let found = sample.dim().2;
        if found != names.len() {
            return Err(Error::ColumnCountMismatch {
                expected: names.len(),
                found,
            });
        }
        Ok(Draws { names, sample })
    }

    /// Stack (draws, parameters) arrays of each chain along a new chain axis.
    pub fn from_chains(names: Vec<String>, chains: &[Array2<Real>]) -> Result<Self> {
        if chains.is_empty() {
            return Err(Error::EmptyChains);
        }
        let views: Vec<ArrayView2<Real>> = chains.iter().map(|c| c.view()).collect();
        let sample = ndarray::stack(Axis(1), &views)?;
        Draws::new(names, sample)
    }

    /// Read one CSV per chain. All chains must name the same parameters.
    pub fn read_chains<R, I>(readers: I) -> Result<Self>
    where
        R: io::Read,
        I: IntoIterator<Item = R>,
    {
        let mut names: Option<Vec<String>> = None;
        let mut chains = vec![];
        for rdr in readers {
            let (cols, chain) = read_stan_csv(rdr)?;
            match &names {
                None => names = Some(cols),
                Some(expected) => check_names(expected, &cols)?,
            }
            chains.push(chain);
        }
        Draws::from_chains(names.unwrap_or_default(), &chains)
    }

    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let files = paths
            .iter()
            .map(|p| std::fs::File::open(p).map(io::BufReader::new))
            .collect::<io::Result<Vec<_>>>()?;
        Draws::read_chains(files)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn sample(&self) -> &Array3<Real> {
        &self.sample
    }

    pub fn ndraws(&self) -> usize {
        self.sample.dim().0
    }

    pub fn nchains(&self) -> usize {
        self.sample.dim().1
    }

    /// Positions of the parameters whose name starts with prefix.
    pub fn indices(&self, prefix: &str) -> Vec<usize> {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.starts_with(prefix))
            .map(|(i, _)| i)
            .collect()
    }

    /// Keep only the parameters whose name starts with prefix.
    pub fn select(&self, prefix: &str) -> Result<Array3<Real>> {
        let idx = self.indices(prefix);
        if idx.is_empty() {
            return Err(Error::column_not_found(prefix));
        }
        Ok(self.sample.select(Axis(2), &idx))
    }

    /// Select parameters by prefix and merge the draw and chain axes into a
    /// (draws * chains, parameters) array.
    pub fn flatten_chains(&self, prefix: &str) -> Result<Array2<Real>> {
        let selected = self.select(prefix)?;
        let (draws, chains, params) = selected.dim();
        let data: Vec<Real> = selected.iter().copied().collect();
        Ok(Array2::from_shape_vec((draws * chains, params), data)?)
    }

    /// Energy Bayesian fraction of missing information of each chain.
    ///
    /// Computed as the mean squared difference of consecutive energies over
    /// the energy variance. Chains below BFMI_THRESHOLD are logged.
    pub fn bfmi(&self) -> Result<Vec<Real>> {
        let k = self
            .names
            .iter()
            .position(|n| n == ENERGY)
            .ok_or_else(|| Error::column_not_found(ENERGY))?;

        let mut out = Vec::with_capacity(self.nchains());
        for c in 0..self.nchains() {
            let energy = self.sample.slice(s![.., c, k]);
            let mut diffs = PointStatsAcc::new();
            diffs.add_many(energy.iter().zip(energy.iter().skip(1)).map(|(a, b)| sqr_diff(*b, *a)));
            let mut levels = PointStatsAcc::new();
            levels.add_many(energy.iter().copied());

            let value = diffs.mean() / levels.var();
            if value < BFMI_THRESHOLD {
                warn!("chain {}: E-BFMI = {:.3} is below {}", c, value, BFMI_THRESHOLD);
            }
            out.push(value);
        }
        Ok(out)
    }
}

fn sqr_diff(a: Real, b: Real) -> Real {
    (a - b) * (a - b)
}

fn check_names(expected: &[String], found: &[String]) -> Result<()> {
    if expected.len() != found.len() {
        return Err(Error::ColumnCountMismatch {
            expected: expected.len(),
            found: found.len(),
        });
    }
    match expected.iter().zip(found).find(|(a, b)| a != b) {
        Some((a, _)) => Err(Error::column_not_found(a)),
        None => Ok(()),
    }
}

/// Posterior predictive time series as a (draws * chains, 3, days) array.
///
/// The middle axis follows Column order: Confirmed, Recovered, Dead.
pub fn sample_time_series(draws: &Draws) -> Result<Array3<Real>> {
    let flat = draws.flatten_chains(Y_HAT)?;
    let (n, k) = flat.dim();
    let parts = Column::CARDINALITY;
    if k % parts != 0 {
        return Err(Error::NotDivisible {
            prefix: Y_HAT.to_string(),
            count: k,
            parts,
        });
    }
    Ok(flat.into_shape((n, parts, k / parts))?)
}

/// Pointwise log likelihood as a (draws * chains, observations) array.
pub fn log_likelihood(draws: &Draws) -> Result<Array2<Real>> {
    draws.flatten_chains(LOG_LIKELIHOOD)
}

/// Day by day statistics of the posterior predictive draws of one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorBand {
    column: Column,
    days: Vec<PointStats>,
}

impl PosteriorBand {
    pub fn column(&self) -> Column {
        self.column
    }

    pub fn days(&self) -> &[PointStats] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn mean(&self) -> Vec<Real> {
        self.days.iter().map(|s| s.mean()).collect()
    }

    pub fn std(&self) -> Vec<Real> {
        self.days.iter().map(|s| s.std()).collect()
    }

    /// Mean minus k standard deviations, for each day.
    pub fn lower(&self, k: Real) -> Vec<Real> {
        self.days.iter().map(|s| s.lower(k)).collect()
    }

    /// Mean plus k standard deviations, for each day.
    pub fn upper(&self, k: Real) -> Vec<Real> {
        self.days.iter().map(|s| s.upper(k)).collect()
    }
}

/// Summarize a (samples, metrics, days) array into one band per metric.
pub fn summarize(samples: &Array3<Real>) -> Vec<PosteriorBand> {
    let (_, metrics, days) = samples.dim();
    (0..metrics)
        .filter_map(|m| Column::from_index(m).map(|col| (m, col)))
        .map(|(m, column)| PosteriorBand {
            column,
            days: (0..days)
                .map(|d| {
                    let mut acc = PointStatsAcc::new();
                    acc.add_many(samples.slice(s![.., m, d]).iter().copied());
                    acc.stats()
                })
                .collect(),
        })
        .collect()
}

/// Render bands next to the observed measurements as CSV data.
///
/// Each metric contributes three columns: the observed value, the posterior
/// mean and the posterior standard deviation.
pub fn render_bands_csv(bands: &[PosteriorBand], observed: &MeasurementTable) -> Result<String> {
    for band in bands {
        if band.len() != observed.len() {
            return Err(Error::ColumnCountMismatch {
                expected: observed.len(),
                found: band.len(),
            });
        }
    }

    let mut data = "date".to_string();
    for band in bands {
        let name = band.column().name();
        data.push_str(&format!(",{0},{0}_mean,{0}_std", name));
    }
    for (i, (date, row)) in observed.iter().enumerate() {
        data.push('\n');
        data.push_str(&date.format("%Y-%m-%d").to_string());
        for band in bands {
            data.push(',');
            if let Some(x) = row.get(band.column()) {
                data.push_str(&format!("{}", x));
            }
            let st = band.days()[i];
            data.push_str(&format!(",{},{}", st.mean(), st.std()));
        }
    }
    Ok(data)
}
