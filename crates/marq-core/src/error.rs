//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("auth error: {0}")]
    Auth(#[from] marq_auth::AuthError),

    #[error("store error: {0}")]
    Store(#[from] marq_store::StoreError),

    #[error("realtime error: {0}")]
    Realtime(#[from] marq_realtime::RealtimeError),

    #[error("not authenticated")]
    NotAuthenticated,
}
