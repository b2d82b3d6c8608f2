use divscan_model::error::DataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to build struct due to missing attributes: {0}")]
    BuilderIncomplete(&'static str),

    #[error("Failed to fetch market data: {0}")]
    Data(#[from] DataError),
}
