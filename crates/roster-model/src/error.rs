use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid code {value:?}: expected a non-negative integer")]
    InvalidCode { value: String },
    #[error("unknown diagnosis {value:?}")]
    UnknownDiagnosis { value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
