use crate::config::{ConfigError, EngineConfig};
use crate::distribute::{distribute, DistributeError};
use crate::enumerate::DomainBounds;
use crate::progress::Progress;
use crate::requirement::Requirement;
use crate::rng::SeedSource;
use crate::simulation::{estimate, Estimate, TrialSettings};
use crate::table::{write_csv, ResultTable, TableError, TableMetadata, TableShape};
use log::{info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Distribution error: {0}")]
    Distribute(#[from] DistributeError),
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

/// Everything a finished sweep produced
pub struct SweepOutput {
    pub bounds: DomainBounds,
    pub run_seed: u64,
    pub requirements: Vec<Requirement>,
    /// One entry per requirement; None if its evaluation failed
    pub estimates: Vec<Option<Estimate>>,
    pub table: ResultTable,
}

/// Enumerate the domain of `config`, estimate every requirement and fill the table
pub fn run_sweep(config: &EngineConfig, show_progress: bool) -> Result<SweepOutput, SweepError> {
    let bounds = DomainBounds::from_config(config)?;
    let mut seeds = SeedSource::new(config.seed);
    let run_seed = seeds.seed();
    let requirements = bounds.enumerate(&mut seeds);
    info!(
        "{} requirements, {} trials each, run seed {}",
        requirements.len(),
        config.trials,
        run_seed
    );

    let progress = if show_progress {
        Progress::new(requirements.len())
    } else {
        Progress::hidden(requirements.len())
    };
    let settings = TrialSettings::from(config);
    let workers = config.worker_count();
    let estimates = distribute(
        config.strategy,
        workers,
        &requirements,
        &|req: &Requirement| estimate(req, &settings),
        &progress,
    )?;
    progress.finish();

    let failed = estimates.iter().filter(|e| e.is_none()).count();
    if failed > 0 {
        warn!("{} requirements failed and are left unset", failed);
    }

    let table = ResultTable::from_estimates(
        TableShape::from_bounds(&bounds),
        &requirements,
        &estimates,
        config.denominator,
    )?;

    Ok(SweepOutput {
        bounds,
        run_seed,
        requirements,
        estimates,
        table,
    })
}

impl SweepOutput {
    /// Write `<stem>.bin`, `<stem>.csv` and `<stem>.json`
    pub fn write_files(&self, stem: &Path, config: &EngineConfig) -> Result<(), TableError> {
        let bin = stem.with_extension("bin");
        self.table.write_binary(BufWriter::new(File::create(&bin)?))?;

        let csv = stem.with_extension("csv");
        write_csv(
            BufWriter::new(File::create(&csv)?),
            &self.requirements,
            &self.estimates,
            config.denominator,
        )?;

        let json = stem.with_extension("json");
        TableMetadata::new(self.bounds, config, self.run_seed, self.requirements.len())
            .write_json(BufWriter::new(File::create(&json)?))?;

        info!(
            "wrote {}, {} and {}",
            bin.display(),
            csv.display(),
            json.display()
        );
        Ok(())
    }
}
