use crate::domain::campaign::CampaignId;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("campaign {0} not found or not accepting donations")]
    NotFound(CampaignId),
    #[error("insufficient contract balance: required {required}, available {available}")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
    },
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
