//! Survey error types

use thiserror::Error;

use crate::store::StoreError;
use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, SurveyError>;
