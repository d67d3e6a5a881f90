use thiserror::Error;

use crate::mail::MailError;
use crate::table::TableError;

#[derive(Debug, Error)]
pub enum TourError {
    #[error("{0} not configured")]
    MissingConfig(&'static str),

    #[error("{0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TourError>;
