use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use u_turnaround::generate::{generate, GeneratorConfig};
use u_turnaround::io::{load_problem, load_schedule, write_outcome};
use u_turnaround::scheduler::{ScheduleKpi, Scheduler, DEFAULT_MAX_BACKTRACKS};
use u_turnaround::validator::{validate_schedule, ValidationReport};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a schedule and write it (or the infeasibility report) to OUTPUT
    Schedule {
        meta: PathBuf,
        aircraft: PathBuf,
        trucks: PathBuf,
        output: PathBuf,

        /// Validate the produced schedule before exiting
        #[arg(long)]
        validate: bool,

        /// Backtrack budget of the engine
        #[arg(long, default_value_t = DEFAULT_MAX_BACKTRACKS)]
        max_backtracks: usize,
    },
    /// Validate an existing schedule file
    Validate {
        meta: PathBuf,
        aircraft: PathBuf,
        trucks: PathBuf,
        schedule: PathBuf,

        /// Print every violation instead of the first
        #[arg(long)]
        all: bool,
    },
    /// Generate a random instance
    #[command(visible_alias = "g")]
    Generate {
        /// Output folder for meta.json, aircraft.json and trucks.json
        #[arg(long, short = 'o')]
        out: PathBuf,

        #[arg(long, default_value_t = 10)]
        aircraft: usize,

        #[arg(long, default_value_t = 6)]
        trucks: usize,

        #[arg(long, default_value_t = 4)]
        gates: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

/// Outcome of a successful command run.
enum Outcome {
    Pass,
    Fail,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(Outcome::Pass) => ExitCode::SUCCESS,
        Ok(Outcome::Fail) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> Result<Outcome, anyhow::Error> {
    match command {
        Commands::Schedule {
            meta,
            aircraft,
            trucks,
            output,
            validate,
            max_backtracks,
        } => {
            let loaded = load_problem(&meta, &aircraft, &trucks).context("failed to load input")?;
            let problem = &loaded.problem;

            let outcome = Scheduler::new()
                .with_max_backtracks(max_backtracks)
                .schedule(problem);
            write_outcome(&output, &outcome, loaded.clock)
                .with_context(|| format!("failed to write {}", output.display()))?;

            let schedule = match outcome {
                Ok(schedule) => schedule,
                Err(report) => {
                    println!("INFEASIBLE: {report}");
                    for rejection in &report.rejections {
                        println!("  {rejection}");
                    }
                    return Ok(Outcome::Fail);
                }
            };

            let kpi = ScheduleKpi::calculate(problem, &schedule);
            info!(
                makespan = kpi.makespan,
                trucks_used = kpi.trucks_used,
                avg_utilization = kpi.avg_utilization,
                total_transition = kpi.total_transition,
                min_slack = ?kpi.min_slack,
                "schedule written to {}",
                output.display()
            );

            if !validate {
                return Ok(Outcome::Pass);
            }
            let report = validate_schedule(problem, &schedule);
            Ok(print_report(&report, true))
        }
        Commands::Validate {
            meta,
            aircraft,
            trucks,
            schedule,
            all,
        } => {
            let loaded = load_problem(&meta, &aircraft, &trucks).context("failed to load input")?;
            let candidate = load_schedule(&schedule, loaded.clock)
                .with_context(|| format!("failed to load {}", schedule.display()))?;
            let report = validate_schedule(&loaded.problem, &candidate);
            Ok(print_report(&report, all))
        }
        Commands::Generate {
            out,
            aircraft,
            trucks,
            gates,
            seed,
        } => {
            let config = GeneratorConfig::new(seed)
                .with_aircraft(aircraft)
                .with_trucks(trucks)
                .with_gates(gates);
            generate(&config)
                .write_to(&out)
                .with_context(|| format!("failed to write instance to {}", out.display()))?;
            Ok(Outcome::Pass)
        }
    }
}

fn print_report(report: &ValidationReport, all: bool) -> Outcome {
    println!("{report}");
    if report.is_pass() {
        return Outcome::Pass;
    }

    let shown = if all { report.len() } else { 1 };
    for violation in report.violations.iter().take(shown) {
        println!("  {violation}");
    }
    if shown < report.len() {
        println!("  ... {} more (use --all)", report.len() - shown);
    }
    warn!(violations = report.len(), "schedule failed validation");
    Outcome::Fail
}
