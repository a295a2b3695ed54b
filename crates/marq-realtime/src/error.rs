//! Realtime error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RealtimeError {
    #[error("malformed change line: {0}")]
    Decode(String),

    #[error("unknown change kind: {0}")]
    UnknownKind(String),
}
