//! Per-client request throttling.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use http::{HeaderMap, HeaderValue, StatusCode, header};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use warden_logging::targets::RATE_LIMIT_TARGET;

use crate::config::RateLimitConfig;
use crate::error::GatewayError;
use crate::problem::Problem;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Keyed token-bucket limiter, one bucket per client address.
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    trust_forwarded_for: bool,
}

impl ClientRateLimiter {
    /// A zero `burst` falls back to `rps`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRateLimit` if `rps` is zero.
    pub fn new(cfg: &RateLimitConfig, trust_forwarded_for: bool) -> Result<Self, GatewayError> {
        let rps = NonZeroU32::new(cfg.rps).ok_or(GatewayError::InvalidRateLimit)?;
        let burst = NonZeroU32::new(cfg.burst).unwrap_or(rps);
        let quota = Quota::per_second(rps).allow_burst(burst);

        Ok(Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            trust_forwarded_for,
        })
    }

    /// Consume one request for `client`; on refusal returns how long to wait.
    ///
    /// # Errors
    ///
    /// Returns the earliest time the client may retry.
    pub fn check(&self, client: IpAddr) -> Result<(), Duration> {
        self.limiter
            .check_key(&client)
            .map_err(|not_until| not_until.wait_time_from(DefaultClock::default().now()))
    }

    /// First `X-Forwarded-For` hop when trusted, otherwise the peer address.
    #[must_use]
    pub fn client_ip(&self, req: &Request) -> IpAddr {
        self.trust_forwarded_for
            .then(|| forwarded_for(req.headers()))
            .flatten()
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip())
            })
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }

    /// Drop buckets that have fully replenished.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of tracked client addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.limiter.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limiter.is_empty()
    }

    /// Prune on every `period` tick until `cancel` fires.
    #[must_use]
    pub fn spawn_pruning(&self, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let before = limiter.len();
                        limiter.prune();
                        tracing::trace!(
                            target: RATE_LIMIT_TARGET,
                            before,
                            after = limiter.len(),
                            "pruned idle rate-limit buckets"
                        );
                    }
                }
            }
        })
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

fn retry_after_secs(wait: Duration) -> u64 {
    (wait.as_secs() + u64::from(wait.subsec_nanos() > 0)).max(1)
}

pub async fn rate_limit_middleware(
    State(limiter): State<ClientRateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let client = limiter.client_ip(&req);
    match limiter.check(client) {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            let retry_after = retry_after_secs(wait);
            tracing::info!(
                target: RATE_LIMIT_TARGET,
                client = %client,
                path = %req.uri().path(),
                retry_after_secs = retry_after,
                "request throttled"
            );
            too_many_requests(retry_after)
        }
    }
}

fn too_many_requests(retry_after: u64) -> Response {
    let mut response = Problem::new(
        StatusCode::TOO_MANY_REQUESTS,
        "Too Many Requests",
        "Rate limit exceeded",
    )
    .into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}
