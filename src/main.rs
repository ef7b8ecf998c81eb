use log::{error, info, warn};
use migration_model::analysis::{analyze_run, print_analysis};
use migration_model::cli::{self, CliArgs, Command};
use migration_model::error::{Result, SimError};
use migration_model::experiment::ExperimentBatch;
use migration_model::migration_log::{CsvMigrationLog, MigrationSink, NullMigrationLog};
use migration_model::scenario::{Scenario, create_standard_scenarios};
use migration_model::simulation::Simulation;

fn init_logging(args: &CliArgs) {
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_scenario(args: &CliArgs) -> Result<Scenario> {
    let mut scenario = match &args.scenario_file {
        Some(path) => Scenario::load_from_file(path)?,
        None => create_standard_scenarios()
            .remove(&args.scenario_name)
            .ok_or_else(|| {
                SimError::Config(format!(
                    "unknown scenario {} (see `presets`)",
                    args.scenario_name
                ))
            })?,
    };
    cli::apply_overrides(&mut scenario, args);
    Ok(scenario)
}

fn run(args: &CliArgs) -> Result<()> {
    let scenario = load_scenario(args)?;
    if !args.quiet {
        println!("{}", scenario);
        cli::validate_scenario(&scenario);
    }

    let sink: Box<dyn MigrationSink> = match &args.migration_log {
        Some(prefix) => {
            let log = CsvMigrationLog::create(prefix)?;
            info!("writing census rows to {}", log.path().display());
            Box::new(log)
        }
        None => Box::new(NullMigrationLog),
    };

    let mut simulation = Simulation::from_scenario(&scenario)?.with_sink(sink);
    let summary = simulation.run(scenario.steps);

    if let Some(path) = &args.history_file {
        simulation.collector().save_history(path)?;
        info!("telemetry history saved to {}", path.display());
    }
    let output = args
        .output_file
        .clone()
        .unwrap_or_else(|| "simulation_events.json".into());
    simulation.events().save_to_file(&output.to_string_lossy())?;
    info!("events saved to {}", output.display());

    println!("\n{}", summary);
    Ok(())
}

fn batch(config: &std::path::Path) -> Result<()> {
    let batch = ExperimentBatch::load_from_file(config)?;
    println!("Running batch: {}", batch.name);
    if !batch.description.is_empty() {
        println!("{}", batch.description);
    }

    let results = batch.run();
    let failed = results.iter().filter(|r| !r.success).count();
    println!("\n=== Batch Results ===");
    for result in &results {
        match (&result.summary, &result.error) {
            (Some(summary), _) => println!(
                "{} #{}: {} steps, {} -> {} households, {} moves, gini {:.3} ({} ms)",
                result.name,
                result.run,
                summary.steps,
                summary.initial_households,
                summary.final_households,
                summary.total_moves,
                summary.final_wealth_gini,
                result.duration_ms
            ),
            (None, Some(e)) => println!("{} #{}: FAILED: {}", result.name, result.run, e),
            (None, None) => println!("{} #{}: no result", result.name, result.run),
        }
    }
    if failed > 0 {
        warn!("{} of {} experiments failed", failed, results.len());
    }

    let summary_path = config.with_extension("results.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(&results)?)?;
    info!("batch results saved to {}", summary_path.display());
    Ok(())
}

fn presets() {
    let scenarios = create_standard_scenarios();
    let mut names: Vec<&String> = scenarios.keys().collect();
    names.sort();
    println!("Built-in scenarios:");
    for name in names {
        let scenario = &scenarios[name];
        println!("  {:<12} {} ({} steps)", name, scenario.description, scenario.steps);
    }
}

fn main() {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };
    init_logging(&args);

    let outcome = match &args.command {
        Command::Run => run(&args),
        Command::Analyze { file } => analyze_run(file).map(|analysis| print_analysis(&analysis)),
        Command::Batch { config } => batch(config),
        Command::Presets => {
            presets();
            Ok(())
        }
    };

    if let Err(e) = outcome {
        error!("{}", e);
        std::process::exit(1);
    }
}
