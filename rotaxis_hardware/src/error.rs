use rotaxis_traits::ParamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("unknown stepper '{0}'")]
    UnknownStepper(String),
    #[error("probe fault: {0}")]
    Probe(String),
    #[error("invalid move: {0}")]
    InvalidMove(String),
    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),
    #[error(transparent)]
    Param(#[from] ParamError),
}

pub type Result<T> = std::result::Result<T, HwError>;
