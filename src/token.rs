use async_trait::async_trait;
use std::sync::Arc;

/// Error type returned by token fetchers. The client hands it back to the
/// caller untouched inside [`Error::Token`](crate::Error::Token).
pub type TokenError = Box<dyn std::error::Error + Send + Sync>;

/// Source of bearer tokens for outgoing requests.
///
/// The client calls `token` once per authenticated request and never caches the
/// result. Implementations that want caching own it, along with whatever locking
/// that requires.
#[async_trait]
pub trait TokenFetcher: Send + Sync {
    /// Fetch a token valid for `audience`.
    async fn token(&self, audience: &str) -> Result<String, TokenError>;
}

#[async_trait]
impl<T: TokenFetcher + ?Sized> TokenFetcher for Arc<T> {
    async fn token(&self, audience: &str) -> Result<String, TokenError> {
        (**self).token(audience).await
    }
}

#[async_trait]
impl<T: TokenFetcher + ?Sized> TokenFetcher for Box<T> {
    async fn token(&self, audience: &str) -> Result<String, TokenError> {
        (**self).token(audience).await
    }
}

/// A fetcher that always hands out the same token. Useful for scripts and tests
/// where a token has already been obtained elsewhere.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new<S: ToString>(token: S) -> Self {
        Self(token.to_string())
    }
}

#[async_trait]
impl TokenFetcher for StaticToken {
    async fn token(&self, _audience: &str) -> Result<String, TokenError> {
        Ok(self.0.clone())
    }
}
