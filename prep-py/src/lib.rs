use pyo3::{prelude::*, wrap_pyfunction};

extern crate pyo3;
use covid_prep as rs;
use covid_prep::prelude::{Column, Real};
use nested::{from_nested, to_nested};
use paste::paste;
use pyo3::exceptions::*;
use pyo3::types::PyDict;
use pythonize::depythonize;

/// Convert library errors into the closest Python exception.
fn py_err(err: rs::Error) -> PyErr {
    match err {
        rs::Error::EntityNotFound { .. } | rs::Error::ColumnNotFound { .. } => {
            PyKeyError::new_err(err.to_string())
        }
        rs::Error::Io(_) => PyIOError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

macro_rules! py_immutable_props {
    ($name:ident { $($x:ident : $t:ty),*}) => {
        paste! {
            #[pymethods]
            impl $name {
                $(
                    #[getter]
                    pub fn [<get_ $x>](&self) -> PyResult<$t> {
                        Ok(self.data.$x().into())
                    }
                )*
            }
        }
    };
}

#[pyclass]
#[derive(Debug)]
pub struct Measurements {
    data: rs::MeasurementTable,
}

#[pymethods]
impl Measurements {
    /// Dates in ISO format.
    fn dates(&self) -> Vec<String> {
        self.data
            .dates()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect()
    }

    /// Values of the named column; missing values are None.
    fn column(&self, name: &str) -> PyResult<Vec<Option<Real>>> {
        Column::from_name(name)
            .map(|col| self.data.column(col))
            .ok_or_else(|| PyKeyError::new_err(name.to_string()))
    }

    #[args(population = "None")]
    fn title(&self, population: Option<u64>) -> String {
        self.data.title(population)
    }

    #[args(sep = "','")]
    fn to_csv(&self, sep: char) -> String {
        self.data.render_csv(sep)
    }

    fn __repr__(&self) -> PyResult<String> {
        Ok(format!(
            "Measurements({:?}, {} days)",
            self.data.entity(),
            self.data.len()
        ))
    }
}

py_immutable_props!(Measurements {
    len: usize,
    entity: String
});

/// Build the clamped measurement table of config["country"] from the
/// confirmed, recovered and dead CSV files.
#[pyfunction]
fn form_table(config: &PyDict, confirmed: &str, recovered: &str, dead: &str) -> PyResult<Measurements> {
    let cfg: rs::Config = depythonize(config.as_ref())?;
    let confirmed = rs::RawTable::from_path(confirmed).map_err(py_err)?;
    let recovered = rs::RawTable::from_path(recovered).map_err(py_err)?;
    let dead = rs::RawTable::from_path(dead).map_err(py_err)?;
    let data = rs::form_table(&cfg, &confirmed, &recovered, &dead).map_err(py_err)?;
    Ok(Measurements { data })
}

/// Reshape a (draws, chains, parameters) nested list into
/// (draws * chains, 3, days) posterior predictive series.
#[pyfunction]
fn sample_time_series(
    column_names: Vec<String>,
    sample: Vec<Vec<Vec<Real>>>,
) -> PyResult<Vec<Vec<Vec<Real>>>> {
    let sample = from_nested(sample).map_err(py_err)?;
    let draws = rs::posterior::Draws::new(column_names, sample).map_err(py_err)?;
    let series = rs::posterior::sample_time_series(&draws).map_err(py_err)?;
    Ok(to_nested(&series))
}

/// Per-chain E-BFMI of a (draws, chains, parameters) nested list.
#[pyfunction]
fn bfmi(column_names: Vec<String>, sample: Vec<Vec<Vec<Real>>>) -> PyResult<Vec<Real>> {
    let sample = from_nested(sample).map_err(py_err)?;
    let draws = rs::posterior::Draws::new(column_names, sample).map_err(py_err)?;
    draws.bfmi().map_err(py_err)
}

mod nested {
    use covid_prep::{prelude::Real, Error, Result};
    use ndarray::Array3;

    /// Build an array from nested lists, which must be rectangular.
    pub fn from_nested(data: Vec<Vec<Vec<Real>>>) -> Result<Array3<Real>> {
        let d0 = data.len();
        let d1 = data.first().map_or(0, |x| x.len());
        let d2 = data.first().and_then(|x| x.first()).map_or(0, |x| x.len());
        let flat: Vec<Real> = data.into_iter().flatten().flatten().collect();
        if flat.len() != d0 * d1 * d2 {
            return Err(Error::ColumnCountMismatch {
                expected: d0 * d1 * d2,
                found: flat.len(),
            });
        }
        Ok(Array3::from_shape_vec((d0, d1, d2), flat)?)
    }

    pub fn to_nested(data: &Array3<Real>) -> Vec<Vec<Vec<Real>>> {
        data.outer_iter()
            .map(|m| m.outer_iter().map(|row| row.to_vec()).collect())
            .collect()
    }
}

#[pymodule]
fn epiprep(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<Measurements>()?;
    m.add_function(wrap_pyfunction!(form_table, m)?)?;
    m.add_function(wrap_pyfunction!(sample_time_series, m)?)?;
    m.add_function(wrap_pyfunction!(bfmi, m)?)?;

    Ok(())
}
