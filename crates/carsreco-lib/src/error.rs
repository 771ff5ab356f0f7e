//! Error types for the prediction library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Invalid price range: lower bound {lower} exceeds upper bound {upper}")]
    InvalidPriceRange { lower: f64, upper: f64 },

    #[error("Invalid confidence level {0}: must lie strictly between 0 and 1")]
    InvalidConfidence(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Dataset error: {0}")]
    Dataset(String),
}

impl From<serde_json::Error> for PredictError {
    fn from(err: serde_json::Error) -> Self {
        PredictError::Dataset(err.to_string())
    }
}

pub type PredictResult<T> = Result<T, PredictError>;
