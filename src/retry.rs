use crate::error::is_temporary;
use log::{debug, warn};
use rand::Rng;
use reqwest::{Client as ReqwestClient, Request, Response, StatusCode};
use std::time::{Duration, Instant};

/// Largest exponent applied to the base delay.
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Policy for re-issuing failed requests.
///
/// A request is retried while its outcome is retryable and the total time spent
/// since the first attempt is below `budget`. The wait between attempts grows
/// exponentially from `base_delay`, with random jitter. Neither a sleep nor an
/// attempt runs past the budget.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub budget: Duration,
    pub jitter: bool,
    pub retry_on_client_error: bool,
    pub retry_on_server_error: bool,
    pub retry_on_temporary_error: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            budget: Duration::from_secs(30),
            jitter: true,
            retry_on_client_error: true,
            retry_on_server_error: true,
            retry_on_temporary_error: true,
        }
    }
}

impl RetryPolicy {
    /// Retry any 4xx/5xx response or temporary network error for up to `budget`.
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            ..Default::default()
        }
    }

    /// Set the minimum wait between attempts.
    pub fn base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Whether a response with `status` is retried under this policy.
    pub fn should_retry_status(&self, status: StatusCode) -> bool {
        (status.is_client_error() && self.retry_on_client_error)
            || (status.is_server_error() && self.retry_on_server_error)
    }

    /// Whether a transport error is retried under this policy.
    pub fn should_retry_error(&self, error: &reqwest::Error) -> bool {
        self.retry_on_temporary_error && is_temporary(error)
    }

    /// Wait before the retry following attempt number `attempt` (zero based).
    ///
    /// Without jitter this is `base_delay * 2^attempt`. With jitter a value is
    /// drawn uniformly between `base_delay` and that bound.
    pub fn delay(&self, attempt: u32) -> Duration {
        let base_ms = as_millis_u64(self.base_delay);
        let max_ms = base_ms.saturating_mul(1_u64 << attempt.min(MAX_BACKOFF_EXPONENT));
        if !self.jitter || max_ms <= base_ms {
            return Duration::from_millis(max_ms);
        }
        Duration::from_millis(rand::thread_rng().gen_range(base_ms..=max_ms))
    }

    fn retryable(&self, outcome: &Result<Response, reqwest::Error>) -> bool {
        match outcome {
            Ok(res) => self.should_retry_status(res.status()),
            Err(e) => self.should_retry_error(e),
        }
    }
}

fn as_millis_u64(duration: Duration) -> u64 {
    duration.as_millis().min(u64::MAX as u128) as u64
}

/// Execute `request`, retrying according to `policy`.
///
/// With no policy exactly one attempt is made. Otherwise the budget is a deadline: no attempt
/// starts once it has passed, and every attempt is cut off at it. The most recent received
/// outcome is returned as soon as it is not retryable or the deadline is reached.
pub(crate) async fn execute(
    http: &ReqwestClient,
    request: Request,
    policy: Option<&RetryPolicy>,
) -> Result<Response, reqwest::Error> {
    let policy = match policy {
        Some(policy) if !policy.budget.is_zero() => policy,
        _ => return http.execute(request).await,
    };

    let started = Instant::now();
    let mut attempt: u32 = 0;
    let mut previous: Option<Result<Response, reqwest::Error>> = None;
    loop {
        let remaining = policy.budget.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            if let Some(outcome) = previous {
                give_up(&request, attempt, started);
                return outcome;
            }
        }

        let mut current = match request.try_clone() {
            Some(current) => current,
            // Streaming bodies cannot be replayed.
            None => return http.execute(request).await,
        };
        let cut_by_deadline = current.timeout().map_or(true, |t| *t > remaining);
        if cut_by_deadline {
            *current.timeout_mut() = Some(remaining);
        }

        debug!("{} {} (attempt {})", current.method(), current.url(), attempt + 1);
        let outcome = http.execute(current).await;
        if cut_by_deadline && matches!(&outcome, Err(e) if e.is_timeout()) {
            give_up(&request, attempt + 1, started);
            return previous.unwrap_or(outcome);
        }
        if !policy.retryable(&outcome) {
            return outcome;
        }

        let elapsed = started.elapsed();
        if elapsed >= policy.budget {
            give_up(&request, attempt + 1, started);
            return outcome;
        }

        let wait = policy.delay(attempt).min(policy.budget - elapsed);
        match &outcome {
            Ok(res) => warn!("{} returned {}, retrying in {:?}", request.url(), res.status(), wait),
            Err(e) => warn!("{} failed: {}, retrying in {:?}", request.url(), e, wait),
        }
        previous = Some(outcome);
        tokio::time::sleep(wait).await;
        attempt = attempt.saturating_add(1);
    }
}

fn give_up(request: &Request, attempts: u32, started: Instant) {
    warn!(
        "Giving up on {} {} after {} attempts in {:?}",
        request.method(),
        request.url(),
        attempts,
        started.elapsed()
    );
}
