use covid_prep::{form_table, prelude::*, Config as MeasurementConfig, RawTable};
use log::*;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, process};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct DataPaths {
    confirmed: PathBuf,
    recovered: PathBuf,
    dead: PathBuf,
    output: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            confirmed: "time_series_covid19_confirmed_global.csv".into(),
            recovered: "time_series_covid19_recovered_global.csv".into(),
            dead: "time_series_covid19_deaths_global.csv".into(),
            output: "measurements.csv".into(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(default)]
pub struct Config {
    verbose: bool,
    population: Option<u64>,
    measurements: MeasurementConfig,
    data: DataPaths,
}

pub fn main() {
    use simple_logger::SimpleLogger;
    if let Err(err) = SimpleLogger::new().with_level(LevelFilter::Info).init() {
        eprintln!("could not start logger: {}", err);
    }

    let path = env::args().nth(1).unwrap_or_else(|| "conf.toml".to_string());
    if let Err(err) = run(&path) {
        error!("{}", err);
        process::exit(2);
    }
}

fn run(path: &str) -> Result<()> {
    let cfg_data = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&cfg_data)?;
    if cfg.verbose {
        println!("{:#?}", cfg);
    }

    let confirmed = RawTable::from_path(&cfg.data.confirmed)?;
    let recovered = RawTable::from_path(&cfg.data.recovered)?;
    let dead = RawTable::from_path(&cfg.data.dead)?;
    let table = form_table(&cfg.measurements, &confirmed, &recovered, &dead)?;

    info!("{}: {} days", table.title(cfg.population), table.len());
    fs::write(&cfg.data.output, table.render_csv(','))?;
    info!("measurements written to {}", cfg.data.output.display());
    Ok(())
}
