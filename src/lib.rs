//! organization-client is a typed async client for the organization API: organizations,
//! subscriptions, plans and organization users.
//!
//! Every authenticated call asks a [`TokenFetcher`] for a fresh bearer token for the configured
//! audience. Clients built with [`Client::with_retry`] or [`Client::retry_policy`] re-issue
//! idempotent requests that fail with a 4xx/5xx status or a temporary network error, backing off
//! exponentially with jitter until the retry budget runs out.
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade and stays silent unless the
//! application installs a logger.
mod client;
mod environment;
mod error;
pub mod models;
pub mod operations;
mod request;
mod retry;
mod token;

pub use client::Client;
pub use environment::{Environment, ORGANIZATION_API_BASE_PATH};
pub use error::{Error, Result};
pub use request::*;
pub use retry::RetryPolicy;
pub use reqwest::header;
pub use reqwest::Method;
pub use reqwest::StatusCode;
pub use token::{StaticToken, TokenError, TokenFetcher};
pub use tokio_util::sync::CancellationToken;
