use crate::environment::{Environment, ORGANIZATION_API_BASE_PATH};
use crate::error::{Error, Result};
use crate::models::{Organization, Plan, Subscription, User};
use crate::operations::{
    FindOrganizationById, GetOrganizations, GetPlan, GetSubscriptions, GetUsersByOrganization,
    PostOrganization, PutSubscription,
};
use crate::request::Request;
use crate::retry::{self, RetryPolicy};
use crate::token::TokenFetcher;
use futures::prelude::*;
use log::{debug, error};
use reqwest::{Client as ReqwestClient, Method, Response, Url};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// The main client used for talking to the organization API.
///
/// `Client` stores an async Reqwest client together with the gateway url, the API base path,
/// the token fetcher and audience used to authenticate, and the optional retry policy.
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ReqwestClient>,
    gateway: Url,
    base_path: String,
    audience: String,
    token_fetcher: Arc<dyn TokenFetcher>,
    retry: Option<RetryPolicy>,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl Client {
    /// Create a new `Client` that makes a single attempt per request.
    ///
    /// Only the scheme, host and port of `gateway_url` are used; requests go to
    /// `<gateway>/<base path>/<endpoint>`. Fails if `gateway_url` cannot be parsed or has no host.
    pub fn new<F, S>(token_fetcher: F, gateway_url: &str, audience: S) -> Result<Self>
    where
        F: TokenFetcher + 'static,
        S: ToString,
    {
        let gateway = parse_gateway(gateway_url)?;
        Ok(Self {
            inner: Arc::new(ReqwestClient::new()),
            gateway,
            base_path: ORGANIZATION_API_BASE_PATH.to_string(),
            audience: audience.to_string(),
            token_fetcher: Arc::new(token_fetcher),
            retry: None,
            timeout: None,
            cancel: None,
        })
    }

    /// Create a `Client` that retries any 4xx/5xx response and any temporary network error for
    /// up to `retry_budget`. The budget is a deadline for the whole call: each attempt is cut off
    /// when it runs out and no attempt starts after it.
    pub fn with_retry<F, S>(
        token_fetcher: F,
        gateway_url: &str,
        audience: S,
        retry_budget: Duration,
    ) -> Result<Self>
    where
        F: TokenFetcher + 'static,
        S: ToString,
    {
        Ok(Self::new(token_fetcher, gateway_url, audience)?
            .retry_policy(RetryPolicy::new(retry_budget))
            .request_timeout(retry_budget))
    }

    /// Create a non-retrying `Client` for one of the known deployments.
    pub fn for_environment<F>(token_fetcher: F, environment: Environment) -> Result<Self>
    where
        F: TokenFetcher + 'static,
    {
        Self::new(
            token_fetcher,
            environment.gateway_url(),
            environment.audience(),
        )
    }

    /// Override the API base path. Defaults to `organization-api`.
    pub fn base_path<S: ToString>(mut self, base_path: S) -> Self {
        self.base_path = base_path.to_string();
        self
    }

    /// Retry idempotent requests according to `policy`. POST requests are never retried.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Fail any single attempt that takes longer than `timeout`.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Abort in-flight requests and pending retries once `token` is cancelled. Requests started
    /// after cancellation fail immediately with [`Error::Cancelled`].
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Audience tokens are requested for.
    pub fn audience(&self) -> &str {
        &self.audience
    }

    fn format_request<R: Request>(
        &self,
        request: &R,
        token: Option<&str>,
    ) -> Result<reqwest::Request> {
        let endpoint = request.endpoint();
        let segments: Vec<&str> = [self.base_path.trim_matches('/'), endpoint.trim_matches('/')]
            .iter()
            .copied()
            .filter(|s| !s.is_empty())
            .collect();
        let mut url = self.gateway.clone();
        url.set_path(&segments.join("/"));

        let req = self.inner.request(R::METHOD, url).headers(request.headers());
        let req = request.data().apply(req);
        let req = match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let req = match self.timeout {
            Some(timeout) => req.timeout(timeout),
            None => req,
        };
        req.build().map_err(From::from)
    }

    async fn fetch_token(&self) -> Result<String> {
        self.token_fetcher
            .token(&self.audience)
            .await
            .map_err(Error::Token)
    }

    async fn execute<R: Request>(&self, request: &R) -> Result<R::Response> {
        let token = if R::AUTHENTICATED {
            Some(self.fetch_token().await?)
        } else {
            None
        };
        let req = self.format_request(request, token.as_deref())?;
        debug!("Sending {} {}", req.method(), req.url());
        let policy = if R::IDEMPOTENT && R::METHOD != Method::POST {
            self.retry.as_ref()
        } else {
            None
        };
        let res = retry::execute(&self.inner, req, policy).await?;
        decode(res).await
    }

    /// Send a single `Request`.
    ///
    /// A panic raised while the request is built, sent or decoded is caught and returned as
    /// [`Error::Internal`].
    pub async fn send<R: Request>(&self, request: &R) -> Result<R::Response> {
        let call = AssertUnwindSafe(self.execute(request))
            .catch_unwind()
            .map(|outcome| outcome.unwrap_or_else(|panic| Err(internal_fault(panic))));
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(Error::Cancelled),
                    res = call => res,
                }
            }
            None => call.await,
        }
    }

    /// List all organizations visible to the caller.
    pub async fn organizations(&self) -> Result<Vec<Organization>> {
        self.send(&GetOrganizations).await
    }

    /// Fetch a single organization by id.
    pub async fn organization(&self, organization_id: i32) -> Result<Organization> {
        self.send(&FindOrganizationById {
            id: organization_id,
        })
        .await
    }

    /// Create an organization. Not idempotent, so never retried, even on a retrying client.
    pub async fn create_organization(&self, organization: &Organization) -> Result<Organization> {
        self.send(&PostOrganization { organization }).await
    }

    /// List subscriptions, at most `limit` of them when given.
    pub async fn subscriptions(&self, limit: Option<i32>) -> Result<Vec<Subscription>> {
        self.send(&GetSubscriptions { limit }).await
    }

    /// Replace a subscription. Both `id` and `organization_id` must be set on `subscription`.
    pub async fn update_subscription(&self, subscription: &Subscription) -> Result<Subscription> {
        let request = PutSubscription::for_subscription(subscription)?;
        self.send(&request).await
    }

    /// Fetch a plan. This endpoint does not take a bearer token.
    pub async fn plan(&self, plan_id: i32) -> Result<Plan> {
        self.send(&GetPlan { id: plan_id }).await
    }

    /// List the users belonging to an organization.
    pub async fn organization_users(&self, organization_id: i32) -> Result<Vec<User>> {
        self.send(&GetUsersByOrganization {
            id: organization_id,
        })
        .await
    }
}

fn parse_gateway(gateway_url: &str) -> Result<Url> {
    let invalid = |reason: String| {
        error!("API Gateway URL was invalid: {:?} ({})", gateway_url, reason);
        Error::InvalidUrl {
            url: gateway_url.to_string(),
            reason,
        }
    };
    let mut url = Url::parse(gateway_url).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    url.set_path("");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    let body = res.text().await?;
    if status.is_success() {
        let text = if body.trim().is_empty() {
            "null"
        } else {
            body.as_str()
        };
        serde_json::from_str(text).map_err(|error| Error::Serde {
            error,
            msg: body.clone(),
        })
    } else if status.is_client_error() {
        Err(Error::ClientError(status, body))
    } else {
        Err(Error::ServerError(status, body))
    }
}

fn internal_fault(panic: Box<dyn Any + Send>) -> Error {
    let msg = if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    error!("Recovered from panic: {}", msg);
    Error::Internal(msg)
}
