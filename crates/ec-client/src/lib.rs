//! ec-client: remote procedure client for the evaluation service.
//!
//! A thin synchronous wrapper over the service's endpoint family. Every
//! operation builds one URL, attaches query parameters, performs a single
//! blocking HTTP request and decodes the response as JSON, a split-oriented
//! table or a wire-encoded domain object. When a body fails to decode the
//! server's text is handed back verbatim via [`Reply::Raw`]; only transport
//! failures are errors. No retries, no caching, no shared state between
//! operations.

pub mod client;
pub mod codec;
pub mod reply;
pub mod setup;

pub use client::{CleanupTarget, RemoteClient};
pub use reply::Reply;
pub use setup::{SetupOutcome, SetupRequest, SetupSection};

use std::path::PathBuf;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Failed to read {what} file: {path}")]
    FileRead {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Wire encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Table encoding failed: {0}")]
    Frame(#[from] ec_frame::FrameError),
}
