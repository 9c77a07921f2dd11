use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdjustError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("probe error: {0}")]
    Probe(String),
    #[error("invalid state: {0}")]
    State(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing probe helper")]
    MissingProbe,
    #[error("missing stepper enable registry")]
    MissingSteppers,
    #[error("missing toolhead")]
    MissingToolhead,
    #[error("missing responder")]
    MissingResponder,
    #[error("missing reference points")]
    MissingPoints,
    #[error("expected exactly 2 reference points, got {0}")]
    PointCount(usize),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
