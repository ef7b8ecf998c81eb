use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid spatial domain: {0}")]
    Domain(String),

    #[error("Temperature series exhausted at step {step}")]
    ClimateExhausted { step: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;
