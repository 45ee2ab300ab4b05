#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use fireshifts::{
    io::{self, GridFormat},
    model::{AvailabilityGrid, Role},
    report::{TableRenderer, TextRenderer},
    scheduler::{Plan, SchedError, Scheduler, SolveOptions},
};
use clap::{Parser, Subcommand};
use std::time::Duration;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Répartition équitable des téléphones de permanence
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(clap::Args, Debug)]
struct GridArgs {
    /// Grille de disponibilités (texte séparé par des blancs) ; grille d'exemple si absent
    #[arg(long)]
    grid: Option<String>,
    /// Lire la grille comme un CSV
    #[arg(long)]
    csv: bool,
    /// Jeton signifiant "disponible"
    #[arg(long, default_value = ".")]
    placeholder: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculer le planning et le bilan
    Solve {
        #[command(flatten)]
        input: GridArgs,
        /// liste "A,B,C"
        #[arg(long, default_value = "A,B,C")]
        roles: String,
        /// Budget de temps du solveur (secondes)
        #[arg(long)]
        time_limit_secs: Option<u64>,
        /// Écart maximal imposé entre charges (maxLoad - minLoad)
        #[arg(long)]
        max_spread: Option<i64>,
        #[arg(long)]
        out_schedule: Option<String>,
        #[arg(long)]
        out_summary: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Valider une grille et afficher les disponibilités par date
    Check {
        #[command(flatten)]
        input: GridArgs,
        #[arg(long, default_value = "A,B,C")]
        roles: String,
    },

    /// Afficher la grille d'exemple
    Sample,
}

fn load_grid(input: &GridArgs) -> Result<AvailabilityGrid> {
    let format = GridFormat {
        placeholder: input.placeholder.clone(),
    };
    match (&input.grid, input.csv) {
        (Some(path), true) => io::import_grid_csv(path, &format),
        (Some(path), false) => io::read_grid_file(path, &format),
        (None, true) => bail!("--csv requires --grid"),
        (None, false) => Ok(io::parse_grid(io::SAMPLE_GRID, &format)?),
    }
}

/// 0 = optimal prouvé, 2 = WARNING/INCOMPLETE (solution faisable seulement)
fn plan_exit_code(plan: &Plan) -> i32 {
    if plan.is_proven_optimal() {
        0
    } else {
        2
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }
    #[cfg(not(feature = "logging"))]
    let _ = cli.log;

    let code = match cli.cmd {
        Commands::Solve {
            input,
            roles,
            time_limit_secs,
            max_spread,
            out_schedule,
            out_summary,
            out_json,
        } => {
            let grid = load_grid(&input)?;
            let roles = Role::parse_list(&roles)?;
            let opts = SolveOptions {
                time_limit: time_limit_secs.map(Duration::from_secs),
            };
            let scheduler = Scheduler::new();
            let result = match max_spread {
                Some(k) => scheduler.plan_with_spread_limit(&grid, &roles, &opts, k),
                None => scheduler.plan(&grid, &roles, &opts),
            };
            let plan = match result {
                Ok(plan) => plan,
                Err(err @ SchedError::Infeasible { .. }) => {
                    eprintln!("{err}");
                    std::process::exit(3);
                }
                Err(err @ SchedError::SolveTimeout) => {
                    eprintln!("{err}");
                    std::process::exit(4);
                }
                Err(err) => return Err(err.into()),
            };

            let renderer = TextRenderer;
            println!("Schedule");
            print!("{}", renderer.render_schedule(&plan.schedule));
            println!();
            println!("Summary");
            print!("{}", renderer.render_summary(&plan.summary));

            if let Some(path) = out_schedule {
                io::export_schedule_csv(path, &plan.schedule)?;
            }
            if let Some(path) = out_summary {
                io::export_summary_csv(path, &plan.summary)?;
            }
            if let Some(path) = out_json {
                io::export_plan_json(path, &plan)?;
            }

            let code = plan_exit_code(&plan);
            if code != 0 {
                eprintln!("Warning: schedule is feasible but not proven optimal");
            }
            code
        }
        Commands::Check { input, roles } => {
            let grid = load_grid(&input)?;
            let roles = Role::parse_list(&roles)?;
            let mut short = 0usize;
            for (d, date) in grid.dates().iter().enumerate() {
                let available = grid.available_count(d);
                let flag = if available < roles.len() {
                    short += 1;
                    "  <- fewer available than roles"
                } else {
                    ""
                };
                println!("{date}: {available}/{} available{flag}", grid.persons().len());
            }
            if short == 0 {
                println!(
                    "OK: {} persons, {} dates",
                    grid.persons().len(),
                    grid.dates().len()
                );
                0
            } else {
                eprintln!("Found {short} date(s) that cannot be covered");
                2
            }
        }
        Commands::Sample => {
            print!("{}", io::SAMPLE_GRID);
            0
        }
    };

    std::process::exit(code);
}
