//! Batch experiment runner for systematic scenario comparison.

use crate::error::{Result, SimError};
use crate::migration_log::NullMigrationLog;
use crate::scenario::{Scenario, create_standard_scenarios};
use crate::simulation::{RunSummary, Simulation};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;

/// Configuration for a batch of experiments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentBatch {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub parallel: Option<usize>,
    pub experiments: Vec<ExperimentConfig>,
}

/// Configuration for a single experiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub name: String,
    /// Built-in scenario name, used when no file is given.
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub scenario: Option<PathBuf>,
    /// Event log destination. Repeats get a `-N` suffix.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub overrides: ExperimentOverrides,
    #[serde(default)]
    pub repeat: usize,
}

/// Parameter overrides for an experiment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentOverrides {
    pub steps: Option<usize>,
    pub random_seed: Option<u64>,
    pub recal_skip: Option<usize>,
    pub move_cost: Option<f64>,
    pub prevent_moves: Option<bool>,
    pub census_tracking: Option<bool>,
}

impl ExperimentOverrides {
    pub fn apply(&self, scenario: &mut Scenario) {
        if let Some(steps) = self.steps {
            scenario.steps = steps;
        }
        if let Some(seed) = self.random_seed {
            scenario.random_seed = Some(seed);
        }
        if let Some(skip) = self.recal_skip {
            scenario.parameters.world.recal_skip = skip;
        }
        if let Some(cost) = self.move_cost {
            scenario.parameters.household.move_cost = cost;
        }
        if let Some(prevent) = self.prevent_moves {
            scenario.parameters.policy.prevent_moves = prevent;
        }
        if let Some(tracking) = self.census_tracking {
            scenario.parameters.census.tracking = tracking;
        }
    }
}

/// Result of running an experiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub name: String,
    pub run: usize,
    pub success: bool,
    pub error: Option<String>,
    pub summary: Option<RunSummary>,
    pub duration_ms: u64,
}

impl ExperimentBatch {
    /// Load experiment configuration from YAML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Expand repeats into individual jobs.
    fn jobs(&self) -> Vec<(&ExperimentConfig, usize)> {
        self.experiments
            .iter()
            .flat_map(|exp| (0..exp.repeat.max(1)).map(move |run| (exp, run)))
            .collect()
    }

    /// Run all experiments in the batch
    pub fn run(&self) -> Vec<ExperimentResult> {
        let parallel = self.parallel.unwrap_or(1).max(1);
        let jobs = self.jobs();
        info!(
            "running batch {} ({} jobs, {} at a time)",
            self.name,
            jobs.len(),
            parallel
        );

        if parallel == 1 {
            return jobs
                .into_iter()
                .map(|(exp, run)| run_single_experiment(exp, run))
                .collect();
        }

        let queue = Mutex::new(jobs.into_iter().enumerate());
        let results = Mutex::new(Vec::new());
        thread::scope(|scope| {
            for _ in 0..parallel {
                scope.spawn(|| {
                    loop {
                        let next = match queue.lock() {
                            Ok(mut jobs) => jobs.next(),
                            Err(_) => None,
                        };
                        let Some((order, (exp, run))) = next else {
                            break;
                        };
                        let result = run_single_experiment(exp, run);
                        if let Ok(mut results) = results.lock() {
                            results.push((order, result));
                        }
                    }
                });
            }
        });

        let mut results = results.into_inner().unwrap_or_else(|e| e.into_inner());
        results.sort_by_key(|(order, _)| *order);
        results.into_iter().map(|(_, result)| result).collect()
    }
}

/// Resolve the scenario an experiment refers to and apply its overrides.
pub fn resolve_scenario(config: &ExperimentConfig, run: usize) -> Result<Scenario> {
    let mut scenario = match (&config.scenario, &config.preset) {
        (Some(path), _) => Scenario::load_from_file(path)?,
        (None, Some(preset)) => create_standard_scenarios()
            .remove(preset)
            .ok_or_else(|| SimError::Config(format!("unknown preset {}", preset)))?,
        (None, None) => {
            return Err(SimError::Config(format!(
                "experiment {} names neither a preset nor a scenario file",
                config.name
            )));
        }
    };
    config.overrides.apply(&mut scenario);
    if let Some(seed) = scenario.random_seed {
        scenario.random_seed = Some(seed.wrapping_add(run as u64));
    }
    Ok(scenario)
}

fn output_path(config: &ExperimentConfig, run: usize) -> Option<PathBuf> {
    let output = config.output.as_ref()?;
    if config.repeat <= 1 {
        return Some(output.clone());
    }
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.name.clone());
    let file = match output.extension() {
        Some(ext) => format!("{}-{}.{}", stem, run, ext.to_string_lossy()),
        None => format!("{}-{}", stem, run),
    };
    Some(output.with_file_name(file))
}

/// Run a single experiment
fn run_single_experiment(config: &ExperimentConfig, run: usize) -> ExperimentResult {
    let start = std::time::Instant::now();
    info!("running experiment {} (run {})", config.name, run);

    let outcome = resolve_scenario(config, run).and_then(|scenario| {
        let mut simulation =
            Simulation::from_scenario(&scenario)?.with_sink(Box::new(NullMigrationLog));
        let summary = simulation.run(scenario.steps);
        if let Some(path) = output_path(config, run) {
            simulation.events().save_to_file(&path.to_string_lossy())?;
        }
        Ok(summary)
    });

    let duration_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok(summary) => ExperimentResult {
            name: config.name.clone(),
            run,
            success: true,
            error: None,
            summary: Some(summary),
            duration_ms,
        },
        Err(e) => {
            warn!("experiment {} (run {}) failed: {}", config.name, run, e);
            ExperimentResult {
                name: config.name.clone(),
                run,
                success: false,
                error: Some(e.to_string()),
                summary: None,
                duration_ms,
            }
        }
    }
}
