use crate::token::TokenError;
use std::error::Error as _;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The token fetcher failed. The inner error is exactly what the fetcher returned.
    #[error("Failed to fetch token: {0}")]
    Token(#[source] TokenError),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Serde error: {error}\nMsg: {msg}")]
    Serde {
        error: serde_json::Error,
        msg: String,
    },

    #[error("Invalid request. Received status {0}. Message: {1}")]
    ClientError(reqwest::StatusCode, String),

    #[error("Server error. Received status {0}. Message: {1}")]
    ServerError(reqwest::StatusCode, String),

    #[error("API gateway URL {url:?} was invalid: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Missing required parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Recovered from panic: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error came from the token fetcher rather than the API.
    pub fn is_token(&self) -> bool {
        matches!(self, Error::Token(_))
    }

    /// The HTTP status the API answered with, if the call got that far.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::ClientError(status, _) | Error::ServerError(status, _) => Some(*status),
            Error::Reqwest(e) => e.status(),
            _ => None,
        }
    }

    /// Whether a retrying client would have retried this outcome.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::ClientError(..) | Error::ServerError(..) => true,
            Error::Reqwest(e) => is_temporary(e),
            _ => false,
        }
    }
}

/// Connection failures, timeouts and connections dropped by the peer before a
/// response arrived. Builder errors and body decoding failures are permanent.
pub(crate) fn is_temporary(e: &reqwest::Error) -> bool {
    if e.is_timeout() || e.is_connect() {
        return true;
    }
    if !e.is_request() {
        return false;
    }
    let mut source = e.source();
    while let Some(cause) = source {
        if let Some(err) = cause.downcast_ref::<hyper::Error>() {
            if err.is_incomplete_message() || err.is_closed() {
                return true;
            }
        }
        if let Some(err) = cause.downcast_ref::<io::Error>() {
            if matches!(
                err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

pub type Result<T> = std::result::Result<T, Error>;
