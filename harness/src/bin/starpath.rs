//! `starpath`: solve a world document from the command line.
//!
//! Exit codes: 0 when a path is found, 2 when none exists, 1 on error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use starpath_harness::report_dir::write_report_dir;
use starpath_harness::runner::run_solve_file;
use starpath_search::{DominanceModeV1, GiantStarPolicyV1, SearchPolicyV1};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "starpath", version, about = "Energy-budget path search over a hazard grid")]
struct Cli {
    /// World description (JSON).
    world: PathBuf,

    /// Stop after this many paths.
    #[arg(long, default_value_t = 1)]
    max_solutions: u32,

    /// How a giant star picks the black hole to neutralize.
    #[arg(long, value_enum, default_value_t = GiantStarArg::Exhaustive)]
    giant_star: GiantStarArg,

    /// Seed for `--giant-star random`.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Pruning cache. `exact` and `energy` ignore the visited set, so
    /// "no path" under either can be a false negative; `off` is exhaustive.
    #[arg(long, value_enum, default_value_t = DominanceArg::Exact)]
    dominance: DominanceArg,

    /// Give up after expanding this many states.
    #[arg(long)]
    max_expansions: Option<u64>,

    /// Write report.json and report_digest.txt into this directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print each path step by step.
    #[arg(long)]
    narrate: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GiantStarArg {
    Exhaustive,
    Random,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DominanceArg {
    /// No cache; every simple path is explored.
    Off,
    /// Prune exact repeats of (cell, energy, neutralized, consumed).
    Exact,
    /// Prune when the same configuration was reached with more energy.
    Energy,
}

impl Cli {
    fn policy(&self) -> SearchPolicyV1 {
        SearchPolicyV1 {
            max_solutions: self.max_solutions,
            giant_star: match self.giant_star {
                GiantStarArg::Exhaustive => GiantStarPolicyV1::Exhaustive,
                GiantStarArg::Random => GiantStarPolicyV1::SingleRandom { seed: self.seed },
            },
            dominance: match self.dominance {
                DominanceArg::Off => DominanceModeV1::Disabled,
                DominanceArg::Exact => DominanceModeV1::ExactSignature,
                DominanceArg::Energy => DominanceModeV1::EnergyDominance,
            },
            max_expansions: self.max_expansions,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let report = match run_solve_file(&cli.world, &cli.policy()) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    };

    if let Some(dir) = &cli.out {
        if let Err(e) = write_report_dir(&report, dir) {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    }

    let outcome = &report.outcome;
    println!("world_digest={}", report.world_digest);
    println!("policy_digest={}", report.policy_digest);
    println!("report_digest={}", report.digest());
    println!("termination={}", outcome.termination);
    println!("solutions={}", outcome.traces.len());
    for (index, trace) in outcome.traces.iter().enumerate() {
        let final_energy = trace.final_energy().unwrap_or_default();
        println!(
            "path {index}: {} moves, final energy {final_energy}",
            trace.moves()
        );
        if cli.narrate {
            for line in trace.narrative() {
                println!("  {line}");
            }
        }
    }

    if report.is_solved() {
        ExitCode::SUCCESS
    } else {
        println!("no path to the destination");
        ExitCode::from(2)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
