//! Unified error type.

use thiserror::Error;

/// The error type returned by restive's fallible operations.
///
/// Request-level failures (404, 422, 401, …) are expressed as JSON envelopes,
/// never as `Error`s. This type surfaces startup and infrastructure problems:
/// loading keys, registering routes, binding a port.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("key: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),

    #[error("invalid route `{path}`: {source}")]
    Route {
        path: String,
        #[source]
        source: matchit::InsertError,
    },

    #[error("invalid socket address `{0}`")]
    Addr(String),

    #[error("config: {0}")]
    Config(String),
}
