//! BattleHex console runner.
//!
//! # Usage
//!
//! ```bash
//! # Default duel with a fixed seed
//! cargo run -p battlehex_cli -- run --seed 7
//!
//! # Custom matchup, JSON report
//! cargo run -p battlehex_cli -- run --left archer --right archer --size 12 --right-pos 11 --report out.json
//!
//! # Check the data file
//! cargo run -p battlehex_cli -- validate
//!
//! # List unit types
//! cargo run -p battlehex_cli -- units
//!
//! # Verify determinism
//! cargo run -p battlehex_cli -- verify --seed 12345 --runs 5
//! ```
//!
//! Battle output goes to stdout, logs go to stderr.

use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use battlehex_cli::data_loader::{load_from, load_game_data, resolve_data_path};
use battlehex_cli::{write_report, CliError, ConsoleRenderer, DuelScenario};
use battlehex_core::events::EventLog;
use battlehex_core::registry::VariantRegistry;

#[derive(Parser)]
#[command(name = "battlehex")]
#[command(about = "Turn-based battles on a linear battlefield")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a duel and print it turn by turn
    Run {
        #[command(flatten)]
        battle: BattleArgs,

        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Write the battle report here (.ron for RON, JSON otherwise)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Check the unit data file
    Validate {
        /// Unit data file
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// List registered unit types and their data records
    Units {
        /// Unit data file
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Verify determinism by playing the same seed several times
    Verify {
        #[command(flatten)]
        battle: BattleArgs,

        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

/// Duel setup shared by `run` and `verify`. Flags override the scenario file.
#[derive(Args)]
struct BattleArgs {
    /// Unit data file
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Scenario file (RON)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Battlefield length in cells
    #[arg(long)]
    size: Option<usize>,

    /// Unit type on the left
    #[arg(long)]
    left: Option<String>,

    /// Starting cell of the left unit
    #[arg(long)]
    left_pos: Option<i32>,

    /// Unit type on the right
    #[arg(long)]
    right: Option<String>,

    /// Starting cell of the right unit
    #[arg(long)]
    right_pos: Option<i32>,

    /// Rounds before the battle is called off
    #[arg(long)]
    max_turns: Option<u64>,
}

impl BattleArgs {
    fn scenario(&self) -> Result<DuelScenario, CliError> {
        let mut scenario = match &self.scenario {
            Some(path) => DuelScenario::load(path)?,
            None => DuelScenario::default(),
        };

        if let Some(size) = self.size {
            scenario.size = size;
        }
        if let Some(left) = &self.left {
            scenario.left.clone_from(left);
        }
        if let Some(pos) = self.left_pos {
            scenario.left_pos = pos;
        }
        if let Some(right) = &self.right {
            scenario.right.clone_from(right);
        }
        if let Some(pos) = self.right_pos {
            scenario.right_pos = pos;
        }
        if let Some(max_turns) = self.max_turns {
            scenario.max_turns = max_turns;
        }
        Ok(scenario)
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr (stdout is for the battle)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Run {
            battle,
            seed,
            report,
        } => cmd_run(&battle, seed, report),
        Commands::Validate { data } => cmd_validate(data),
        Commands::Units { data } => cmd_units(data),
        Commands::Verify { battle, seed, runs } => cmd_verify(&battle, seed, runs),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Play one duel, rendering it to stdout.
fn cmd_run(args: &BattleArgs, seed: Option<u64>, report: Option<PathBuf>) -> Result<(), CliError> {
    let data = load_from(args.data.as_deref())?;
    let registry = VariantRegistry::with_defaults();
    let scenario = args.scenario()?;
    let mut battle = scenario.build(&data, &registry)?;

    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!(seed, left = %scenario.left, right = %scenario.right, "Starting duel");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut renderer = ConsoleRenderer::new(io::stdout().lock(), data.field.empty_icon.clone());
    let mut log = EventLog::new();
    battle.run_with_observer(Vec::new(), &mut rng, &mut (&mut renderer, &mut log))?;
    drop(renderer.finish()?);

    if let Some(path) = report {
        write_report(&battle.report(log.into_events()), &path)?;
    }
    Ok(())
}

/// Parse and validate the unit data file.
fn cmd_validate(data: Option<PathBuf>) -> Result<(), CliError> {
    let path = resolve_data_path(data.as_deref())?;
    let data = load_game_data(&path)?;
    let registry = VariantRegistry::with_defaults();

    let errors = data.validate(&registry);
    if errors.is_empty() {
        eprintln!(
            "OK: {} unit types valid in {}",
            data.units.len(),
            path.display()
        );
        return Ok(());
    }

    eprintln!("Problems in {}:", path.display());
    for error in &errors {
        eprintln!("  - {error}");
    }
    Err(CliError::InvalidData(errors.len()))
}

/// List the unit types the registry knows and the data records available.
fn cmd_units(data: Option<PathBuf>) -> Result<(), CliError> {
    let data = load_from(data.as_deref())?;
    let registry = VariantRegistry::with_defaults();

    println!("{:<16} {:<10} RECORD", "KEY", "VARIANT");
    for (key, variant) in registry.registered_units() {
        let record = data.units.get(key).map_or_else(
            || "(no data)".to_string(),
            |unit| format!("{} ({})", unit.name, unit.icon),
        );
        println!("{key:<16} {:<10} {record}", variant.name());
    }

    for key in data.units.keys() {
        if registry.resolve(key).is_err() {
            println!("{key:<16} {:<10} (unregistered)", "-");
        }
    }
    Ok(())
}

/// Verify determinism
fn cmd_verify(args: &BattleArgs, seed: u64, runs: u32) -> Result<(), CliError> {
    let data = load_from(args.data.as_deref())?;
    let registry = VariantRegistry::with_defaults();
    let scenario = args.scenario()?;

    tracing::info!(seed, runs, "Verifying determinism");
    let outcome = battlehex_cli::verify_determinism(&scenario, &data, &registry, seed, runs)?;

    if outcome.deterministic {
        eprintln!("PASS: All {runs} runs produced identical results");
        if let Some(hash) = outcome.hashes.first() {
            eprintln!("  State hash: {hash:016x}");
        }
        Ok(())
    } else {
        let mut unique = outcome.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        eprintln!("FAIL: Non-determinism detected!");
        Err(CliError::NonDeterministic {
            runs: outcome.hashes.len(),
            unique: unique.len(),
        })
    }
}
