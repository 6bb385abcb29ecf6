// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("transport error on {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: ureq::Error,
    },

    #[error("HTTP {status} for {path}")]
    Status { status: u16, path: String },

    #[error("could not decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("server refused: {0}")]
    Server(String),

    #[error("no canned response for {0}")]
    NoRoute(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
