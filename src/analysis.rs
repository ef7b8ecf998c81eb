//! Analysis tools for saved event logs.

use crate::error::Result;
use crate::events::{Event, EventType, StopReason};
use std::fs;
use std::path::Path;

/// Summary of one run reconstructed from its event log.
#[derive(Debug, Clone, PartialEq)]
pub struct RunAnalysis {
    pub scenario: Option<String>,
    pub seed: Option<u64>,
    pub total_events: usize,
    pub total_steps: usize,
    pub initial_households: usize,
    pub final_households: Option<usize>,
    /// `(step, urban, rural)` from each step summary.
    pub population: Vec<(usize, u64, u64)>,
    pub peak_households: u64,
    pub sampled_moves: u64,
    pub sampled_trapped: u64,
    pub sampled_births: u64,
    pub censuses: Vec<(f64, i64)>,
    pub perturbations_started: usize,
    pub wheel_rebuilds: usize,
    pub sink_failures: usize,
    pub final_threshold: Option<f64>,
    pub final_wealth_gini: Option<f64>,
    pub stop_reason: Option<StopReason>,
    pub insights: Vec<String>,
}

/// Load and analyze a JSON event log.
pub fn analyze_run(path: &Path) -> Result<RunAnalysis> {
    let contents = fs::read_to_string(path)?;
    let events: Vec<Event> = serde_json::from_str(&contents)?;
    Ok(analyze_events(&events))
}

pub fn analyze_events(events: &[Event]) -> RunAnalysis {
    let mut analysis = RunAnalysis {
        scenario: None,
        seed: None,
        total_events: events.len(),
        total_steps: 0,
        initial_households: 0,
        final_households: None,
        population: Vec::new(),
        peak_households: 0,
        sampled_moves: 0,
        sampled_trapped: 0,
        sampled_births: 0,
        censuses: Vec::new(),
        perturbations_started: 0,
        wheel_rebuilds: 0,
        sink_failures: 0,
        final_threshold: None,
        final_wealth_gini: None,
        stop_reason: None,
        insights: Vec::new(),
    };

    for event in events {
        analysis.total_steps = analysis.total_steps.max(event.step);

        match &event.event_type {
            EventType::RunStarted {
                scenario,
                households,
                seed,
                ..
            } => {
                analysis.scenario = Some(scenario.clone());
                analysis.seed = Some(*seed);
                analysis.initial_households = *households;
            }
            EventType::DensityThresholdRaised { threshold } => {
                analysis.final_threshold = Some(*threshold);
            }
            EventType::PerturbationStarted { .. } => analysis.perturbations_started += 1,
            EventType::PerturbationEnded { .. } => {}
            EventType::WheelsRebuilt { .. } => analysis.wheel_rebuilds += 1,
            EventType::CensusTaken {
                time,
                total_migrants,
            } => analysis.censuses.push((*time, *total_migrants)),
            EventType::SinkFailure { .. } => analysis.sink_failures += 1,
            EventType::StepSummary {
                urban_households,
                rural_households,
                moved,
                trapped,
                births,
                wealth_gini,
                ..
            } => {
                analysis
                    .population
                    .push((event.step, *urban_households, *rural_households));
                analysis.peak_households = analysis
                    .peak_households
                    .max(urban_households + rural_households);
                analysis.sampled_moves += moved;
                analysis.sampled_trapped += trapped;
                analysis.sampled_births += births;
                analysis.final_wealth_gini = Some(*wealth_gini);
            }
            EventType::RunStopped { reason, households } => {
                analysis.stop_reason = Some(*reason);
                analysis.final_households = Some(*households);
            }
        }
    }

    analysis.insights = generate_insights(&analysis);
    analysis
}

fn generate_insights(analysis: &RunAnalysis) -> Vec<String> {
    let mut insights = Vec::new();

    if let (Some(&(_, u0, r0)), Some(&(_, u1, r1))) =
        (analysis.population.first(), analysis.population.last())
    {
        let share = |u: u64, r: u64| {
            if u + r == 0 {
                0.0
            } else {
                u as f64 / (u + r) as f64
            }
        };
        let change = share(u1, r1) - share(u0, r0);
        if change > 0.05 {
            insights.push(format!(
                "Urban share rose by {:.1} points over the run",
                change * 100.0
            ));
        } else if change < -0.05 {
            insights.push(format!(
                "Urban share fell by {:.1} points; the density threshold may be outpacing growth",
                -change * 100.0
            ));
        }
    }

    let attempts = analysis.sampled_moves + analysis.sampled_trapped;
    if attempts > 0 && analysis.sampled_trapped as f64 / attempts as f64 > 0.5 {
        insights.push(
            "Most sampled relocation attempts were trapped; move cost dominates wealth".to_string(),
        );
    }

    if analysis.sink_failures > 0 {
        insights.push(format!(
            "{} census rows could not be written to the migration log",
            analysis.sink_failures
        ));
    }

    if analysis.stop_reason == Some(StopReason::ClimateExhausted) {
        insights.push("The run ended early because the temperature input ran out".to_string());
    }

    insights
}

pub fn print_analysis(analysis: &RunAnalysis) {
    println!("\n=== Run Analysis ===\n");
    if let Some(scenario) = &analysis.scenario {
        println!("Scenario: {}", scenario);
    }
    if let Some(seed) = analysis.seed {
        println!("Seed: {}", seed);
    }
    println!("Events: {}", analysis.total_events);
    println!("Steps: {}", analysis.total_steps);
    match analysis.stop_reason {
        Some(reason) => println!("Stopped: {}", reason),
        None => println!("Stopped: log ends without a stop event"),
    }

    println!("\n--- Population ---");
    println!("Initial households: {}", analysis.initial_households);
    if let Some(final_households) = analysis.final_households {
        println!("Final households: {}", final_households);
    }
    println!("Peak households (sampled): {}", analysis.peak_households);
    for (step, urban, rural) in &analysis.population {
        println!("  [{:>5}] urban {:>8} rural {:>8}", step, urban, rural);
    }

    println!("\n--- Movement (sampled steps) ---");
    println!("Moves: {}", analysis.sampled_moves);
    println!("Trapped: {}", analysis.sampled_trapped);
    println!("Births: {}", analysis.sampled_births);
    if let Some(gini) = analysis.final_wealth_gini {
        println!("Wealth Gini: {:.3}", gini);
    }
    if let Some(threshold) = analysis.final_threshold {
        println!("Urban density threshold: {}", threshold);
    }

    if !analysis.censuses.is_empty() {
        println!("\n--- Censuses ---");
        for (time, migrants) in &analysis.censuses {
            println!("  {:>7.1}: {} inter-province migrants", time, migrants);
        }
    }

    println!("\n--- World ---");
    println!("Perturbations started: {}", analysis.perturbations_started);
    println!("Perturbation wheel rebuilds: {}", analysis.wheel_rebuilds);
    if analysis.sink_failures > 0 {
        println!("Migration log failures: {}", analysis.sink_failures);
    }

    if !analysis.insights.is_empty() {
        println!("\n--- Insights ---");
        for insight in &analysis.insights {
            println!("- {}", insight);
        }
    }
}
