//! Command-line interface for the migration model.

use crate::scenario::Scenario;
use lexopt::prelude::*;
use std::path::PathBuf;

/// Command-line arguments for the simulation.
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
    pub scenario_name: String,
    pub scenario_file: Option<PathBuf>,
    pub steps: Option<usize>,
    pub random_seed: Option<u64>,
    pub recal_skip: Option<usize>,
    pub prevent_moves: bool,
    pub census_tracking: bool,
    /// Prefix for the timestamped migration CSV.
    pub migration_log: Option<PathBuf>,
    pub history_file: Option<PathBuf>,
    pub verbose: bool,
    pub quiet: bool,
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run,
    Analyze { file: PathBuf },
    Batch { config: PathBuf },
    Presets,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            command: Command::Run,
            scenario_name: "baseline".to_string(),
            scenario_file: None,
            steps: None,
            random_seed: None,
            recal_skip: None,
            prevent_moves: false,
            census_tracking: false,
            migration_log: None,
            history_file: None,
            verbose: false,
            quiet: false,
            output_file: None,
        }
    }
}

pub fn parse_args() -> Result<CliArgs, lexopt::Error> {
    parse_from(lexopt::Parser::from_env())
}

/// Parse an explicit argument list (without the program name).
pub fn parse_from_iter<I>(args: I) -> Result<CliArgs, lexopt::Error>
where
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString>,
{
    parse_from(lexopt::Parser::from_args(args))
}

fn parse_from(mut args: lexopt::Parser) -> Result<CliArgs, lexopt::Error> {
    let mut cli_args = CliArgs::default();
    let mut subcommand: Option<String> = None;
    let mut target: Option<PathBuf> = None;

    while let Some(arg) = args.next()? {
        match arg {
            Value(val) => {
                let val_str = val.string()?;
                if subcommand.is_none() {
                    subcommand = Some(val_str);
                } else if target.is_none() {
                    target = Some(PathBuf::from(val_str));
                } else {
                    return Err(lexopt::Error::from(format!(
                        "unexpected argument {}",
                        val_str
                    )));
                }
            }
            Long("scenario") => {
                cli_args.scenario_name = args.value()?.string()?;
            }
            Long("scenario-file") => {
                cli_args.scenario_file = Some(PathBuf::from(args.value()?.string()?));
            }
            Long("steps") | Short('n') => {
                cli_args.steps = Some(args.value()?.parse()?);
            }
            Long("seed") => {
                cli_args.random_seed = Some(args.value()?.parse()?);
            }
            Long("recal-skip") => {
                cli_args.recal_skip = Some(args.value()?.parse()?);
            }
            Long("prevent-moves") => cli_args.prevent_moves = true,
            Long("census-tracking") => cli_args.census_tracking = true,
            Long("migration-log") => {
                cli_args.migration_log = Some(PathBuf::from(args.value()?.string()?));
            }
            Long("history") => {
                cli_args.history_file = Some(PathBuf::from(args.value()?.string()?));
            }
            Long("output") | Short('o') => {
                cli_args.output_file = Some(PathBuf::from(args.value()?.string()?));
            }
            Long("verbose") | Short('v') => cli_args.verbose = true,
            Long("quiet") | Short('q') => cli_args.quiet = true,
            Long("help") | Short('h') => {
                print_help();
                std::process::exit(0);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    cli_args.command = match subcommand.as_deref() {
        Some("run") | None => Command::Run,
        Some("analyze") => Command::Analyze {
            file: target.unwrap_or_else(|| PathBuf::from("simulation_events.json")),
        },
        Some("batch") => match target {
            Some(config) => Command::Batch { config },
            None => {
                return Err(lexopt::Error::from(
                    "batch command requires a configuration file",
                ));
            }
        },
        Some("presets") => Command::Presets,
        Some(cmd) => {
            return Err(lexopt::Error::from(format!("unknown command: {}", cmd)));
        }
    };

    Ok(cli_args)
}

/// Apply CLI overrides to a scenario.
pub fn apply_overrides(scenario: &mut Scenario, args: &CliArgs) {
    if let Some(steps) = args.steps {
        scenario.steps = steps;
    }

    if let Some(seed) = args.random_seed {
        scenario.random_seed = Some(seed);
    }

    if let Some(skip) = args.recal_skip {
        scenario.parameters.world.recal_skip = skip;
    }

    if args.prevent_moves {
        scenario.parameters.policy.prevent_moves = true;
    }

    if args.census_tracking {
        scenario.parameters.census.tracking = true;
    }
}

/// Configuration smells that are legal but probably not what was meant.
pub fn scenario_warnings(scenario: &Scenario) -> Vec<String> {
    let params = &scenario.parameters;
    let mut warnings = Vec::new();

    if params.world.recal_skip > scenario.steps {
        warnings.push(format!(
            "wheel rebuild interval ({} steps) exceeds the run length ({} steps); destinations \
             will follow the initial desirability throughout",
            params.world.recal_skip, scenario.steps
        ));
    }

    if params.census.tracking && scenario.steps < params.census.ticks_per_year * 5 {
        warnings.push(format!(
            "census tracking is on but {} steps cover fewer than five years",
            scenario.steps
        ));
    }

    if params.policy.prevent_moves
        && (params.urban.movement_will > 0.0 || params.rural.movement_will > 0.0)
    {
        warnings.push("moves are prevented; movement will has no effect".to_string());
    }

    let final_density = params.world.initial_urban_density
        + params.world.density_increment
            * (scenario.steps / params.world.density_increment_interval.max(1)) as f64;
    if params.world.density_increment > 0.0
        && final_density > 10.0 * params.world.initial_urban_density
    {
        warnings.push(format!(
            "urban density threshold climbs from {} to {} over the run",
            params.world.initial_urban_density, final_density
        ));
    }

    warnings
}

/// Print warnings for a scenario.
pub fn validate_scenario(scenario: &Scenario) {
    for warning in scenario_warnings(scenario) {
        println!("WARNING: {}", warning);
    }
}

fn print_help() {
    println!("\nMigration Model Simulation\n");
    println!("USAGE:");
    println!("    migration-model-sim [COMMAND] [OPTIONS]\n");

    println!("COMMANDS:");
    println!("    run              Run the simulation (default)");
    println!("    analyze [FILE]   Summarize a saved event log");
    println!("    batch CONFIG     Run batch experiments from YAML config");
    println!("    presets          List the built-in scenarios\n");

    println!("SIMULATION OPTIONS:");
    println!("    --scenario <NAME>          Use a built-in scenario (default: baseline)");
    println!("    --scenario-file <FILE>     Load scenario from a JSON or YAML file");
    println!("    -n, --steps <N>            Number of steps to simulate");
    println!("    --seed <N>                 Random seed for reproducible runs");
    println!("    --recal-skip <N>           Steps between selection wheel rebuilds");
    println!("    --prevent-moves            Disable relocation (control run)");
    println!("    --census-tracking          Count moves between censuses only\n");

    println!("OUTPUT OPTIONS:");
    println!("    -o, --output <FILE>        Write the event log to FILE");
    println!("    --history <FILE>           Write per-step telemetry to FILE");
    println!("    --migration-log <PREFIX>   Write census rows to PREFIX-<timestamp>.csv");
    println!("    -v, --verbose              Enable debug logging");
    println!("    -q, --quiet                Only log warnings and errors");
    println!("    -h, --help                 Print help information\n");

    println!("Logging can also be configured with RUST_LOG.\n");

    println!("EXAMPLES:");
    println!("    # Run the warming scenario with a fixed seed");
    println!("    migration-model-sim run --scenario warming --seed 12345\n");

    println!("    # Analyze simulation results");
    println!("    migration-model-sim analyze simulation_events.json");
}
