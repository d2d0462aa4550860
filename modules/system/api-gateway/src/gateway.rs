use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::middleware::from_fn_with_state;
use http::{Request, Response};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use authn_resolver_sdk::AuthNResolverClient;
use authz_resolver_sdk::{AuthZResolverClient, AuthZResolverError};

use crate::auth::{self, AuthState, PolicyState};
use crate::config::ApiGatewayConfig;
use crate::error::GatewayError;
use crate::middleware::rate_limit::{ClientRateLimiter, rate_limit_middleware};
use crate::scheme::TokenSchemeResolver;
use crate::web;

/// Assembles the HTTP surface: route groups guarded by named policies,
/// bearer authentication, throttling and request tracing.
pub struct ApiGateway {
    config: ApiGatewayConfig,
    resolver: Arc<TokenSchemeResolver>,
    authn_client: Arc<dyn AuthNResolverClient>,
    authz_client: Arc<dyn AuthZResolverClient>,
    router: Router,
}

impl ApiGateway {
    /// Validate the scheme bindings and start an empty router.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if a scheme binding is invalid.
    pub fn new(
        config: ApiGatewayConfig,
        authn_client: Arc<dyn AuthNResolverClient>,
        authz_client: Arc<dyn AuthZResolverClient>,
    ) -> Result<Self, GatewayError> {
        let resolver = Arc::new(TokenSchemeResolver::from_config(&config)?);
        Ok(Self {
            config,
            resolver,
            authn_client,
            authz_client,
            router: web::public_router(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiGatewayConfig {
        &self.config
    }

    #[must_use]
    pub fn resolver(&self) -> &TokenSchemeResolver {
        &self.resolver
    }

    /// Add routes that need no policy.
    #[must_use]
    pub fn public(mut self, routes: Router) -> Self {
        self.router = self.router.merge(routes);
        self
    }

    /// Add routes guarded by the named policy.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPolicy` if `policy` was never declared, so a typo
    /// fails at startup instead of denying at request time.
    pub fn require_policy(mut self, policy: &str, routes: Router) -> Result<Self, GatewayError> {
        if self.authz_client.policy(policy).is_none() {
            return Err(AuthZResolverError::UnknownPolicy(policy.to_owned()).into());
        }
        tracing::debug!(policy, "route group guarded by policy");

        let state = PolicyState {
            authz_client: Arc::clone(&self.authz_client),
            policy: Arc::from(policy),
        };
        self.router = self
            .router
            .merge(routes.layer(from_fn_with_state(state, auth::policy_middleware)));
        Ok(self)
    }

    /// Apply the middleware stack and return the final router.
    ///
    /// Request order (outermost first): Trace -> RateLimit -> AuthN -> Policy -> handler.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRateLimit` if throttling is enabled with a zero rate.
    pub fn finalize(self) -> Result<Router, GatewayError> {
        self.assemble().map(|(router, _)| router)
    }

    fn assemble(self) -> Result<(Router, Option<ClientRateLimiter>), GatewayError> {
        // `Router::layer` wraps everything added so far, so layers are added
        // innermost first.
        let auth_state = AuthState {
            authn_client: self.authn_client,
            resolver: self.resolver,
        };
        let mut router = self
            .router
            .layer(from_fn_with_state(auth_state, auth::authn_middleware));

        let limiter = if self.config.self_hosted {
            tracing::info!("self-hosted installation: request throttling disabled");
            None
        } else {
            let limiter =
                ClientRateLimiter::new(&self.config.rate_limit, self.config.trust_forwarded_for)?;
            router = router.layer(from_fn_with_state(limiter.clone(), rate_limit_middleware));
            Some(limiter)
        };

        router = router.layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        version = ?req.version(),
                        module = "api_gateway",
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(
                    |res: &Response<Body>, latency: Duration, span: &tracing::Span| {
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", latency.as_millis());
                    },
                ),
        );

        Ok((router, limiter))
    }

    /// Bind, serve until `cancel` fires, then drain in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the bind address is invalid, binding fails, or
    /// the server stops abnormally.
    pub async fn serve(self, cancel: CancellationToken) -> anyhow::Result<()> {
        let addr = parse_bind_address(&self.config.bind_addr)?;
        let prune_every = Duration::from_secs(self.config.rate_limit.prune_interval_secs.max(1));
        let (router, limiter) = self.assemble()?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", addr);

        let pruning = limiter.map(|limiter| limiter.spawn_pruning(prune_every, cancel.clone()));

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        let served = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!(e));

        if let Some(task) = pruning {
            task.abort();
        }
        served
    }
}

fn parse_bind_address(bind_addr: &str) -> anyhow::Result<SocketAddr> {
    bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{bind_addr}': {e}"))
}
