//! Remote setup error types
//!
//! Request-level failures map into the contract crates' own error types;
//! this enum only covers configuration and connection setup.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("invalid remote URL: {0}")]
    InvalidUrl(String),

    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
}
