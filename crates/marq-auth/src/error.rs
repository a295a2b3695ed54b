//! Auth error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("auth transport error: {0}")]
    Transport(String),

    #[error("auth provider error: {0}")]
    Provider(String),

    #[error("malformed auth response: {0}")]
    Decode(String),
}
