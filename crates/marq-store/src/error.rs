//! Store error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store transport error: {0}")]
    Transport(String),

    #[error("store request rejected: {0}")]
    Rejected(String),

    #[error("malformed store response: {0}")]
    Decode(String),
}
