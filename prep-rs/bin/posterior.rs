use covid_prep::{
    posterior::{render_bands_csv, sample_time_series, summarize, Draws},
    prelude::*,
    MeasurementTable,
};
use log::*;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, process};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct PosteriorConfig {
    chains: Vec<PathBuf>,
    observed: PathBuf,
    output: PathBuf,
}

impl Default for PosteriorConfig {
    fn default() -> Self {
        PosteriorConfig {
            chains: vec![],
            observed: "measurements.csv".into(),
            output: "posterior.csv".into(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(default)]
pub struct Config {
    verbose: bool,
    posterior: PosteriorConfig,
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
    let cfg = cfg.posterior;

    let draws = Draws::from_paths(&cfg.chains)?;
    info!(
        "read {} draws from {} chains",
        draws.ndraws(),
        draws.nchains()
    );
    match draws.bfmi() {
        Ok(bfmi) => info!("E-BFMI per chain: {:?}", bfmi),
        Err(err) => warn!("skipping E-BFMI: {}", err),
    }

    let samples = sample_time_series(&draws)?;
    let observed = MeasurementTable::read_csv("observed", fs::File::open(&cfg.observed)?)?;
    let bands = summarize(&samples);
    fs::write(&cfg.output, render_bands_csv(&bands, &observed)?)?;
    info!("posterior bands written to {}", cfg.output.display());
    Ok(())
}
