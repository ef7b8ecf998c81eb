use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub step: usize,
    pub event_type: EventType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventType {
    RunStarted {
        scenario: String,
        cells: usize,
        households: usize,
        seed: u64,
    },
    DensityThresholdRaised {
        threshold: f64,
    },
    PerturbationStarted {
        name: String,
    },
    PerturbationEnded {
        name: String,
    },
    WheelsRebuilt {
        reason: RebuildReason,
    },
    CensusTaken {
        time: f64,
        total_migrants: i64,
    },
    SinkFailure {
        message: String,
    },
    StepSummary {
        urban_households: u64,
        rural_households: u64,
        moved: u64,
        trapped: u64,
        births: u64,
        infrastructure_expense: f64,
        wealth_gini: f64,
        mean_satisfaction: f64,
    },
    RunStopped {
        reason: StopReason,
        households: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebuildReason {
    Scheduled,
    Perturbation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    StepLimit,
    ClimateExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::StepLimit => write!(f, "step limit reached"),
            StopReason::ClimateExhausted => write!(f, "temperature input exhausted"),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.step)?;

        match &self.event_type {
            EventType::RunStarted {
                scenario,
                cells,
                households,
                seed,
            } => write!(
                f,
                "Run of {} started with {} households on {} cells (seed {})",
                scenario, households, cells, seed
            ),
            EventType::DensityThresholdRaised { threshold } => {
                write!(f, "Urban density threshold raised to {}", threshold)
            }
            EventType::PerturbationStarted { name } => write!(f, "Perturbation {} started", name),
            EventType::PerturbationEnded { name } => write!(f, "Perturbation {} ended", name),
            EventType::WheelsRebuilt { reason } => {
                write!(f, "Selection wheels rebuilt ({:?})", reason)
            }
            EventType::CensusTaken {
                time,
                total_migrants,
            } => write!(
                f,
                "Census at {}: {} inter-province migrants",
                time, total_migrants
            ),
            EventType::SinkFailure { message } => write!(f, "Migration log failure: {}", message),
            EventType::StepSummary {
                urban_households,
                rural_households,
                moved,
                trapped,
                births,
                infrastructure_expense,
                wealth_gini,
                mean_satisfaction,
            } => write!(
                f,
                "Urban:{} Rural:{} Moved:{} Trapped:{} Births:{} Infra:{:.1} Gini:{:.3} Sat:{:.3}",
                urban_households,
                rural_households,
                moved,
                trapped,
                births,
                infrastructure_expense,
                wealth_gini,
                mean_satisfaction
            ),
            EventType::RunStopped { reason, households } => {
                write!(f, "Run stopped: {} ({} households)", reason, households)
            }
        }
    }
}

#[derive(Default)]
pub struct EventLogger {
    events: Vec<Event>,
}

impl EventLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, step: usize, event_type: EventType) {
        self.events.push(Event {
            timestamp: Utc::now(),
            step,
            event_type,
        });
    }

    pub fn get_events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn save_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let events: Vec<Event> = serde_json::from_str(&json)?;
        Ok(Self { events })
    }
}
