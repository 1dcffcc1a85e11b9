//! Command-line entry point: loads a simulation/state document, runs the
//! event loop to a budget, and writes the resulting state back out.
//!
//! Out of `spec.md`'s stated scope as a *framework* (§1 lists "CLI
//! wrappers" among the external collaborators the core is indifferent to),
//! but §6 still specifies the flag and exit-code contract this binary must
//! honour, so it is implemented as a thin driver over [`dynamica_core`].

use clap::Parser;
use dynamica_core::config;
use dynamica_core::error::EdmdError;
use dynamica_core::simulation::RunBudget;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Runs an event-driven molecular dynamics simulation from a configuration
/// document.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the `<Simulation>` XML configuration/state document.
    #[arg(long)]
    config: PathBuf,

    /// Path to the companion engine-settings TOML file (threads, log level,
    /// run budget, RNG seed). Falls back to defaults if omitted or absent.
    #[arg(long)]
    engine_config: Option<PathBuf>,

    /// Where to write the final state document. Defaults to `<config>` with
    /// a `.out.xml` suffix.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Force ASCII `Pt` particle blocks in the output document instead of
    /// the base64 binary encoding.
    #[arg(long)]
    text: bool,

    /// Stop after this many events, overriding the engine settings file.
    #[arg(long)]
    max_events: Option<u64>,

    /// Stop after this many wall-clock seconds, overriding the engine
    /// settings file.
    #[arg(long)]
    max_time_secs: Option<u64>,
}

/// Configuration errors abort with exit code 1; invariant violations,
/// unsupported-dynamics misconfiguration, and numeric fatals with 2; IO
/// failures with 3 — matching `spec.md` §6's "non-zero on configuration
/// error, numeric fatal, or signal" contract with the taxonomy split out.
fn exit_code_for(err: &EdmdError) -> u8 {
    match err {
        EdmdError::ConfigError(_) => 1,
        EdmdError::InvariantViolation(_) => 2,
        EdmdError::UnsupportedForThisDynamics { .. } => 2,
        EdmdError::NumericOverflow { .. } => 2,
        EdmdError::Io(_) => 3,
    }
}

fn run(cli: Cli) -> Result<(), EdmdError> {
    let engine_settings = match &cli.engine_config {
        Some(path) => config::toml_settings::load(path)?,
        None => config::EngineSettings::default(),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&engine_settings.log_level)).init();

    let _ = rayon::ThreadPoolBuilder::new()
        .num_threads(engine_settings.threads)
        .build_global();

    let (doc, loaded) = config::load_simulation_document(&cli.config, engine_settings.seed)?;
    let units = loaded.units;
    let mut sim = config::build_simulation(loaded)?;

    let budget = RunBudget {
        max_events: cli.max_events.or(engine_settings.max_events),
        max_wall_clock: cli
            .max_time_secs
            .or(engine_settings.max_wall_clock_secs)
            .map(Duration::from_secs),
        stop_flag: None,
    };

    let report = sim.run_until(budget)?;
    log::info!(
        "ran {} events, final reduced time {:.6} ({:.6} physical), stop reason {:?}",
        report.events_executed,
        report.final_time,
        units.time_to_physical(report.final_time),
        report.stop_reason
    );

    let out_path = cli.out.clone().unwrap_or_else(|| cli.config.with_extension("out.xml"));
    let out_doc = config::xml::with_updated_particles(&doc, sim.particles(), cli.text);
    config::save_simulation_document(&out_doc, &out_path)?;
    log::info!("wrote final state to {}", out_path.display());

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}
