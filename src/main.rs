use clap::{Args, Parser, Subcommand};
use log::info;
use mana_sources::config::{Denominator, DrawConvention, EngineConfig, Strategy};
use mana_sources::enumerate::DomainBounds;
use mana_sources::requirement::Requirement;
use mana_sources::rng::SeedSource;
use mana_sources::simulation::{estimate, TrialSettings};
use mana_sources::sweep::run_sweep;
use mana_sources::table::{ResultTable, TableKey, TableMetadata, UNDEFINED, UNSET};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mana-sources")]
#[command(about = "Monte Carlo tables of on-curve colored mana probabilities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Overrides applied on top of the JSON configuration
#[derive(Args)]
struct ConfigArgs {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Cards in the deck
    #[arg(long)]
    deck_size: Option<u32>,

    /// Lands in the deck (default: 17 per 40 cards)
    #[arg(long)]
    land_count: Option<u32>,

    /// Trials per requirement
    #[arg(short, long)]
    trials: Option<u32>,

    /// Smallest hand a mulligan can go down to
    #[arg(long)]
    mulligan_floor: Option<u32>,

    #[arg(long, value_enum)]
    draw_convention: Option<DrawConvention>,

    #[arg(long, value_enum)]
    denominator: Option<Denominator>,

    /// Seed for the run (for reproducibility)
    #[arg(short, long)]
    seed: Option<u64>,
}

impl ConfigArgs {
    fn load(&self) -> EngineConfig {
        let mut config = match &self.config {
            Some(path) => match EngineConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("✗ Failed to load config '{}': {}", path, e);
                    std::process::exit(1);
                }
            },
            None => EngineConfig::default(),
        };
        if let Some(v) = self.deck_size {
            config.deck_size = v;
        }
        if self.land_count.is_some() {
            config.land_count = self.land_count;
        }
        if let Some(v) = self.trials {
            config.trials = v;
        }
        if let Some(v) = self.mulligan_floor {
            config.mulligan_floor = v;
        }
        if let Some(v) = self.draw_convention {
            config.draw_convention = v;
        }
        if let Some(v) = self.denominator {
            config.denominator = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Err(e) = config.validate() {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate every requirement of the domain and write the table
    Sweep {
        #[command(flatten)]
        config: ConfigArgs,

        /// Highest mana value to tabulate
        #[arg(long)]
        max_turn: Option<u32>,

        #[arg(long, value_enum)]
        strategy: Option<Strategy>,

        /// Worker threads (0 = all cores)
        #[arg(long)]
        threads: Option<usize>,

        /// Output path stem; .bin, .csv and .json are appended
        #[arg(short, long, default_value = "mana_sources")]
        out: PathBuf,
    },

    /// Estimate a single requirement
    Estimate {
        #[command(flatten)]
        config: ConfigArgs,

        /// Mana value, the turn it should be cast on
        turn: u32,

        /// Symbols of color A in the cost
        req_a: u32,

        /// Lands producing only color A
        land_a: u32,

        /// Symbols of color B in the cost
        #[arg(long, default_value_t = 0)]
        req_b: u32,

        /// Lands producing only color B
        #[arg(long, default_value_t = 0)]
        land_b: u32,

        /// Lands producing both colors
        #[arg(long, default_value_t = 0)]
        land_ab: u32,
    },

    /// Read one cell of a table written by `sweep`
    Lookup {
        /// Output path stem given to `sweep`
        table: PathBuf,
        turn: u32,
        req_a: u32,
        req_b: u32,
        land_a: u32,
        land_b: u32,
        land_ab: u32,
    },

    /// Count the requirements a sweep would evaluate
    Count {
        #[command(flatten)]
        config: ConfigArgs,

        #[arg(long)]
        max_turn: Option<u32>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep {
            config,
            max_turn,
            strategy,
            threads,
            out,
        } => {
            let mut config = config.load();
            if let Some(v) = max_turn {
                config.max_turn = v;
            }
            if let Some(v) = strategy {
                config.strategy = v;
            }
            if let Some(v) = threads {
                config.threads = v;
            }
            sweep(&config, &out);
        }
        Commands::Estimate {
            config,
            turn,
            req_a,
            req_b,
            land_a,
            land_b,
            land_ab,
        } => {
            let config = config.load();
            estimate_one(&config, turn, [req_a, req_b], [land_a, land_b, land_ab]);
        }
        Commands::Lookup {
            table,
            turn,
            req_a,
            req_b,
            land_a,
            land_b,
            land_ab,
        } => {
            let key = TableKey {
                target_turn: turn,
                color_requirement: [req_a, req_b],
                land_split: [land_a, land_b, land_ab],
            };
            lookup(&table, &key);
        }
        Commands::Count { config, max_turn } => {
            let mut config = config.load();
            if let Some(v) = max_turn {
                config.max_turn = v;
            }
            match DomainBounds::from_config(&config) {
                Ok(bounds) => println!("{}", bounds.count()),
                Err(e) => {
                    eprintln!("✗ {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn sweep(config: &EngineConfig, out: &Path) {
    println!("\n=== Mana Source Sweep ===\n");
    println!(
        "Deck: {} cards, {} lands",
        config.deck_size,
        config.land_count()
    );
    println!("Turns: 1-{}", config.max_turn);
    println!("Trials per requirement: {}", config.trials);
    println!();

    let start = std::time::Instant::now();
    let output = match run_sweep(config, true) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("✗ Sweep failed: {}", e);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    let undefined = output
        .table
        .values()
        .iter()
        .filter(|&&v| v == UNDEFINED)
        .count();
    println!("Requirements: {}", output.requirements.len());
    println!("Run seed: {}", output.run_seed);
    println!("Undefined estimates: {}", undefined);
    println!(
        "Completed in {:.2?} ({:.0} requirements/sec)",
        elapsed,
        output.requirements.len() as f64 / elapsed.as_secs_f64()
    );

    if let Err(e) = output.write_files(out, config) {
        eprintln!("✗ Failed to write output: {}", e);
        std::process::exit(1);
    }
}

fn estimate_one(config: &EngineConfig, turn: u32, colors: [u32; 2], split: [u32; 3]) {
    let seed = SeedSource::new(config.seed).next_seed();
    let req = match Requirement::new(config.deck_size, config.land_count(), turn, colors, split, seed) {
        Ok(req) => req,
        Err(e) => {
            eprintln!("✗ Invalid requirement: {}", e);
            std::process::exit(1);
        }
    };
    info!("estimating {} with seed {}", req, seed);

    let start = std::time::Instant::now();
    let est = estimate(&req, &TrialSettings::from(config));
    let elapsed = start.elapsed();

    println!("\n=== Requirement {} ===\n", req);
    println!("Trials:     {}", est.trials);
    println!("Applicable: {}", est.applicable);
    println!("Successes:  {}", est.successes);
    match est.probability(config.denominator) {
        Some(p) => println!("Probability ({:?}): {:.4}", config.denominator, p),
        None => println!("Probability ({:?}): undefined", config.denominator),
    }
    println!("\nCompleted in {:.2?}", elapsed);
}

fn lookup(stem: &Path, key: &TableKey) {
    let meta = match File::open(stem.with_extension("json"))
        .map_err(Into::into)
        .and_then(|f| TableMetadata::read_json(BufReader::new(f)))
    {
        Ok(meta) => meta,
        Err(e) => {
            eprintln!("✗ Failed to read table metadata: {}", e);
            std::process::exit(1);
        }
    };
    let table = match File::open(stem.with_extension("bin"))
        .map_err(Into::into)
        .and_then(|f| ResultTable::read_binary(BufReader::new(f), meta.shape))
    {
        Ok(table) => table,
        Err(e) => {
            eprintln!("✗ Failed to read table: {}", e);
            std::process::exit(1);
        }
    };

    match table.get(key) {
        Some(v) if v == UNSET => println!("not estimated"),
        Some(v) if v == UNDEFINED => println!("undefined (target turn never reached)"),
        Some(v) => println!("{:.4}", v),
        None => {
            eprintln!("✗ Key outside the table domain (shape {:?})", table.shape().extent);
            std::process::exit(1);
        }
    }
}
